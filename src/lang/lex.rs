use super::{token::*, Error, LineNumber};

pub fn lex(source: &str, keywords: &Keywords) -> Result<Vec<Token>, Error> {
    let mut lexer = Lexer::new(source, keywords);
    let tokens = lexer.tokenize();
    match lexer.error() {
        Some(error) => Err(error.clone()),
        None => Ok(tokens),
    }
}

fn is_cinebrew_alphabetic(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_cinebrew_alphanumeric(c: char) -> bool {
    is_cinebrew_alphabetic(c) || c.is_ascii_digit()
}

/// ## Source text to tokens
///
/// Scanning stops at the first lexical error. The token list handed back
/// always ends with `Eof`, so check `had_error()` before trusting it.

pub struct Lexer<'a> {
    source: &'a str,
    keywords: &'a Keywords,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: LineNumber,
    error: Option<Error>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, keywords: &'a Keywords) -> Lexer<'a> {
        Lexer {
            source,
            keywords,
            tokens: vec![],
            start: 0,
            current: 0,
            line: 1,
            error: None,
        }
    }

    pub fn tokenize(&mut self) -> Vec<Token> {
        self.tokens.clear();
        self.start = 0;
        self.current = 0;
        self.line = 1;
        self.error = None;
        while !self.is_at_end() && self.error.is_none() {
            self.start = self.current;
            self.scan_token();
        }
        self.tokens.push(Token::eof(self.line));
        std::mem::take(&mut self.tokens)
    }

    pub fn had_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn peek(&self) -> Option<char> {
        self.source[self.current..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        self.source[self.current..].chars().nth(1)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.current += ch.len_utf8();
        Some(ch)
    }

    fn matches(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.current += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn peek_is_digit(&self) -> bool {
        self.peek().map_or(false, |c| c.is_ascii_digit())
    }

    fn lexeme(&self) -> &'a str {
        &self.source[self.start..self.current]
    }

    fn add_token(&mut self, kind: TokenKind) {
        self.add_literal(kind, None);
    }

    fn add_literal(&mut self, kind: TokenKind, literal: Option<String>) {
        let token = Token::new(kind, self.lexeme(), literal, self.line);
        self.tokens.push(token);
    }

    fn fail(&mut self, error: Error) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn scan_token(&mut self) {
        use TokenKind::*;
        let ch = match self.advance() {
            Some(ch) => ch,
            None => return,
        };
        match ch {
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,
            '#' => {
                while let Some(pk) = self.peek() {
                    if pk == '\n' {
                        break;
                    }
                    self.advance();
                }
            }
            ';' => self.add_token(Semicolon),
            '(' => self.add_token(LParen),
            ')' => self.add_token(RParen),
            '{' => self.add_token(LBrace),
            '}' => self.add_token(RBrace),
            ',' => self.add_token(Comma),
            '+' => self.add_token(Plus),
            '*' => self.add_token(Star),
            '/' => self.add_token(Slash),
            '-' => {
                if self.peek_is_digit() {
                    self.number();
                } else {
                    self.add_token(Minus);
                }
            }
            '=' => {
                let kind = if self.matches('=') { EqualEqual } else { Equal };
                self.add_token(kind);
            }
            '>' => {
                let kind = if self.matches('=') { GreaterEqual } else { Greater };
                self.add_token(kind);
            }
            '<' => {
                let kind = if self.matches('=') { LessEqual } else { Less };
                self.add_token(kind);
            }
            '!' => {
                if self.matches('=') {
                    self.add_token(BangEqual);
                } else {
                    let line = self.line;
                    self.fail(error!(UnexpectedCharacter, line;
                        "Unexpected character '!', did you mean '!='?"));
                }
            }
            '"' => self.string(),
            c if c.is_ascii_digit() => self.number(),
            c if is_cinebrew_alphabetic(c) => self.identifier(),
            c => {
                let line = self.line;
                self.fail(error!(UnexpectedCharacter, line;
                    format!("Unexpected character '{}'", c)));
            }
        }
    }

    fn string(&mut self) {
        loop {
            match self.peek() {
                None => {
                    let line = self.line;
                    self.fail(error!(UnterminatedString, line; "Unterminated string"));
                    return;
                }
                Some('"') => break,
                Some(ch) => {
                    if ch == '\n' {
                        self.line += 1;
                    }
                    self.advance();
                }
            }
        }
        self.advance();
        let text = &self.source[self.start + 1..self.current - 1];
        self.add_literal(TokenKind::String, Some(text.to_string()));
    }

    fn number(&mut self) {
        while self.peek_is_digit() {
            self.advance();
        }
        if self.peek() == Some('.') && self.peek_next().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
            while self.peek_is_digit() {
                self.advance();
            }
            let line = self.line;
            self.fail(error!(UnsupportedFloat, line;
                "Floating point numbers not yet supported"));
            return;
        }
        let literal = self.lexeme().to_string();
        self.add_literal(TokenKind::Number, Some(literal));
    }

    fn identifier(&mut self) {
        while self.peek().map_or(false, is_cinebrew_alphanumeric) {
            self.advance();
        }
        match self.keywords.get(self.lexeme()) {
            Some(kind) => self.add_token(kind),
            None => self.add_token(TokenKind::Identifier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let keywords = Keywords::new();
        lex(source, &keywords)
            .unwrap()
            .iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_minus_folds_into_number() {
        use TokenKind::*;
        assert_eq!(kinds("x-1"), vec![Identifier, Number, Eof]);
        assert_eq!(kinds("x - 1"), vec![Identifier, Minus, Number, Eof]);
        assert_eq!(kinds("x -y"), vec![Identifier, Minus, Identifier, Eof]);
    }

    #[test]
    fn test_first_error_halts() {
        let keywords = Keywords::new();
        let mut lexer = Lexer::new("TAKE a = 1; @ $ TAKE", &keywords);
        let tokens = lexer.tokenize();
        assert!(lexer.had_error());
        assert_eq!(tokens.len(), 6);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        assert_eq!(
            lexer.error().map(|e| e.to_string()),
            Some("LEXER UNEXPECTED CHARACTER IN LINE 1; Unexpected character '@'".to_string())
        );
    }
}
