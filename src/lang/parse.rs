use super::{ast::*, token::*, Error, LineNumber};

type Result<T> = std::result::Result<T, Error>;

const MAX_ARGUMENTS: usize = 255;

pub fn parse(tokens: &[Token]) -> std::result::Result<Program, Error> {
    let mut parser = Parser::new(tokens);
    let program = parser.parse();
    match parser.error() {
        Some(error) => Err(error.clone()),
        None => Ok(program),
    }
}

/// ## Recursive descent over a token slice
///
/// The first syntax error stops the parse. Whatever was complete up to
/// that point is still returned by `parse()`; `had_error()` says whether
/// it can be trusted.

pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
    eof: Token,
    error: Option<Error>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Parser<'a> {
        let line = tokens.last().map_or(1, |t| t.line);
        Parser {
            tokens,
            current: 0,
            eof: Token::eof(line),
            error: None,
        }
    }

    pub fn parse(&mut self) -> Program {
        self.current = 0;
        self.error = None;
        let mut statements: Vec<Stmt> = vec![];
        while !self.is_at_end() {
            match self.declaration() {
                Ok(stmt) => statements.push(stmt),
                Err(error) => {
                    self.error = Some(error);
                    break;
                }
            }
        }
        Program::new(statements)
    }

    pub fn had_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.current).unwrap_or(&self.eof)
    }

    fn peek_next(&self) -> &Token {
        self.tokens.get(self.current + 1).unwrap_or(&self.eof)
    }

    fn previous(&self) -> &Token {
        match self.current {
            0 => self.peek(),
            n => self.tokens.get(n - 1).unwrap_or(&self.eof),
        }
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn matches(&mut self, kinds: &[TokenKind]) -> bool {
        if kinds.iter().any(|k| self.check(*k)) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> Result<Token> {
        if self.check(kind) {
            return Ok(self.advance().clone());
        }
        Err(self.syntax_error(message))
    }

    fn syntax_error(&self, message: &str) -> Error {
        let token = self.peek();
        let message = if token.kind == TokenKind::Eof {
            format!("{} at end", message)
        } else {
            format!("{} at '{}'", message, token.lexeme)
        };
        error!(SyntaxError, token.line; message)
    }

    fn line(&self) -> LineNumber {
        self.previous().line
    }

    fn declaration(&mut self) -> Result<Stmt> {
        if self.matches(&[TokenKind::Scene]) {
            return self.function();
        }
        if self.matches(&[TokenKind::Take]) {
            return self.var_declaration();
        }
        self.statement()
    }

    fn function(&mut self) -> Result<Stmt> {
        let line = self.line();
        let name = self.consume(TokenKind::Identifier, "Expected function name")?;
        self.consume(TokenKind::LParen, "Expected '(' after function name")?;
        let mut params: Vec<String> = vec![];
        if !self.check(TokenKind::RParen) {
            loop {
                if params.len() >= MAX_ARGUMENTS {
                    return Err(self.syntax_error("Cannot have more than 255 parameters"));
                }
                let param = self.consume(TokenKind::Identifier, "Expected parameter name")?;
                params.push(param.lexeme);
                if !self.matches(&[TokenKind::Comma]) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RParen, "Expected ')' after parameters")?;
        self.consume(TokenKind::LBrace, "Expected '{' before function body")?;
        let body = self.block()?;
        Ok(Stmt::Function(line, name.lexeme, params, body))
    }

    fn var_declaration(&mut self) -> Result<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expected variable name")?;
        self.consume(TokenKind::Equal, "Expected '=' after variable name")?;
        let init = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expected ';' after variable declaration")?;
        Ok(Stmt::Declaration(name.line, name.lexeme, init))
    }

    fn statement(&mut self) -> Result<Stmt> {
        use TokenKind::*;
        let kind = self.peek().kind;
        match kind {
            Pour => {
                self.advance();
                let line = self.line();
                let value = self.expression()?;
                self.consume(Semicolon, "Expected ';' after POUR statement")?;
                Ok(Stmt::Print(line, value))
            }
            If => {
                self.advance();
                self.if_statement()
            }
            Loop => {
                self.advance();
                let line = self.line();
                let cond = self.expression()?;
                self.consume(LBrace, "Expected '{' after LOOP condition")?;
                let body = self.block()?;
                Ok(Stmt::Loop(line, cond, body))
            }
            Break => {
                self.advance();
                let line = self.line();
                self.consume(Semicolon, "Expected ';' after BREAK")?;
                Ok(Stmt::Break(line))
            }
            Continue => {
                self.advance();
                let line = self.line();
                self.consume(Semicolon, "Expected ';' after CONTINUE")?;
                Ok(Stmt::Continue(line))
            }
            Shot => {
                self.advance();
                let line = self.line();
                let value = if self.check(Semicolon) {
                    None
                } else {
                    Some(self.expression()?)
                };
                self.consume(Semicolon, "Expected ';' after SHOT statement")?;
                Ok(Stmt::Return(line, value))
            }
            LBrace => {
                self.advance();
                let line = self.line();
                Ok(Stmt::Block(line, self.block()?))
            }
            Identifier if self.peek_next().kind == Equal => {
                let name = self.advance().clone();
                self.advance();
                let value = self.expression()?;
                self.consume(Semicolon, "Expected ';' after assignment")?;
                Ok(Stmt::Assignment(name.line, name.lexeme, value))
            }
            _ => {
                let expr = self.expression()?;
                self.consume(Semicolon, "Expected ';' after expression")?;
                Ok(Stmt::Expression(expr.line(), expr))
            }
        }
    }

    fn if_statement(&mut self) -> Result<Stmt> {
        let line = self.line();
        let cond = self.expression()?;
        self.consume(TokenKind::LBrace, "Expected '{' after IF condition")?;
        let then_branch = self.block()?;
        let else_branch = if self.matches(&[TokenKind::Else]) {
            self.consume(TokenKind::LBrace, "Expected '{' after ELSE")?;
            Some(self.block()?)
        } else {
            None
        };
        Ok(Stmt::If(line, cond, then_branch, else_branch))
    }

    fn block(&mut self) -> Result<Vec<Stmt>> {
        let mut statements: Vec<Stmt> = vec![];
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            statements.push(self.declaration()?);
        }
        self.consume(TokenKind::RBrace, "Expected '}' after block")?;
        Ok(statements)
    }

    fn expression(&mut self) -> Result<Expr> {
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr> {
        use TokenKind::*;
        let mut expr = self.additive()?;
        loop {
            let op = match self.peek().kind {
                EqualEqual => BinaryOp::Equal,
                BangEqual => BinaryOp::NotEqual,
                Greater => BinaryOp::Greater,
                GreaterEqual => BinaryOp::GreaterEqual,
                Less => BinaryOp::Less,
                LessEqual => BinaryOp::LessEqual,
                _ => break,
            };
            let line = self.advance().line;
            let rhs = self.additive()?;
            expr = Expr::Binary(line, op, Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    fn additive(&mut self) -> Result<Expr> {
        let mut expr = self.multiplicative()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Subtract,
                _ => break,
            };
            let line = self.advance().line;
            let rhs = self.multiplicative()?;
            expr = Expr::Binary(line, op, Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    fn multiplicative(&mut self) -> Result<Expr> {
        let mut expr = self.unary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Multiply,
                TokenKind::Slash => BinaryOp::Divide,
                _ => break,
            };
            let line = self.advance().line;
            let rhs = self.unary()?;
            expr = Expr::Binary(line, op, Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.matches(&[TokenKind::Minus]) {
            let line = self.line();
            let operand = self.unary()?;
            return Ok(Expr::Unary(line, UnaryOp::Negate, Box::new(operand)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr> {
        use TokenKind::*;
        let token = self.peek().clone();
        match token.kind {
            Number => {
                self.advance();
                let text = token.literal.as_deref().unwrap_or(&token.lexeme);
                match text.parse::<i64>() {
                    Ok(n) => Ok(Expr::Literal(token.line, Literal::Integer(n))),
                    Err(_) => Err(error!(Overflow, token.line;
                        format!("Integer literal '{}' out of range", text))),
                }
            }
            String => {
                self.advance();
                let text = token.literal.unwrap_or_default();
                Ok(Expr::Literal(token.line, Literal::Str(text)))
            }
            True => {
                self.advance();
                Ok(Expr::Literal(token.line, Literal::Bool(true)))
            }
            False => {
                self.advance();
                Ok(Expr::Literal(token.line, Literal::Bool(false)))
            }
            Identifier => {
                self.advance();
                if self.matches(&[LParen]) {
                    let args = self.arguments()?;
                    return Ok(Expr::Call(token.line, token.lexeme, args));
                }
                Ok(Expr::Variable(token.line, token.lexeme))
            }
            LParen => {
                self.advance();
                let expr = self.expression()?;
                self.consume(RParen, "Expected ')' after expression")?;
                Ok(expr)
            }
            _ => Err(self.syntax_error("Expected expression")),
        }
    }

    fn arguments(&mut self) -> Result<Vec<Expr>> {
        let mut args: Vec<Expr> = vec![];
        if !self.check(TokenKind::RParen) {
            loop {
                if args.len() >= MAX_ARGUMENTS {
                    return Err(self.syntax_error("Cannot have more than 255 arguments"));
                }
                args.push(self.expression()?);
                if !self.matches(&[TokenKind::Comma]) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RParen, "Expected ')' after arguments")?;
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::lex;

    fn parse_str(source: &str) -> Program {
        let keywords = Keywords::new();
        parse(&lex(source, &keywords).unwrap()).unwrap()
    }

    #[test]
    fn test_precedence() {
        let program = parse_str("1 + 2 * 3 == 7;");
        assert_eq!(program.statements[0].to_string(), "(== (+ 1 (* 2 3)) 7)\n");
    }

    #[test]
    fn test_missing_brace_stops() {
        let keywords = Keywords::new();
        let tokens = lex("TAKE a = 1;\nIF a { POUR a;", &keywords).unwrap();
        let mut parser = Parser::new(&tokens);
        let program = parser.parse();
        assert!(parser.had_error());
        assert_eq!(program.len(), 1);
        assert_eq!(
            parser.error().map(|e| e.to_string()),
            Some("PARSER SYNTAX ERROR IN LINE 2; Expected '}' after block at end".to_string())
        );
    }
}
