use super::LineNumber;
use std::collections::HashMap;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Take,
    Pour,
    Scene,
    Shot,
    If,
    Else,
    Loop,
    Break,
    Continue,
    True,
    False,
    Identifier,
    Number,
    String,
    Equal,
    Plus,
    Minus,
    Star,
    Slash,
    EqualEqual,
    BangEqual,
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
    Semicolon,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Comma,
    Eof,
}

impl TokenKind {
    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Take | Pour | Scene | Shot | If | Else | Loop | Break | Continue | True | False
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use TokenKind::*;
        let s = match self {
            Take => "TAKE",
            Pour => "POUR",
            Scene => "SCENE",
            Shot => "SHOT",
            If => "IF",
            Else => "ELSE",
            Loop => "LOOP",
            Break => "BREAK",
            Continue => "CONTINUE",
            True => "TRUE",
            False => "FALSE",
            Identifier => "IDENTIFIER",
            Number => "NUMBER",
            String => "STRING",
            Equal => "EQUAL",
            Plus => "PLUS",
            Minus => "MINUS",
            Star => "STAR",
            Slash => "SLASH",
            EqualEqual => "EQUAL_EQUAL",
            BangEqual => "BANG_EQUAL",
            Greater => "GREATER",
            Less => "LESS",
            GreaterEqual => "GREATER_EQUAL",
            LessEqual => "LESS_EQUAL",
            Semicolon => "SEMICOLON",
            LBrace => "LBRACE",
            RBrace => "RBRACE",
            LParen => "LPAREN",
            RParen => "RPAREN",
            Comma => "COMMA",
            Eof => "EOF",
        };
        write!(f, "{}", s)
    }
}

/// One lexical unit. Immutable once the lexer hands it out.
#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub literal: Option<String>,
    pub line: LineNumber,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: &str, literal: Option<String>, line: LineNumber) -> Token {
        Token {
            kind,
            lexeme: lexeme.to_string(),
            literal,
            line,
        }
    }

    pub fn eof(line: LineNumber) -> Token {
        Token::new(TokenKind::Eof, "", None, line)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.literal {
            Some(literal) => write!(f, "{:>4} {} '{}' {}", self.line, self.kind, self.lexeme, literal),
            None => write!(f, "{:>4} {} '{}'", self.line, self.kind, self.lexeme),
        }
    }
}

/// ## Reserved words
///
/// Case-sensitive table built once and handed to every lexer.

#[derive(Debug, Clone)]
pub struct Keywords {
    words: HashMap<&'static str, TokenKind>,
}

impl Default for Keywords {
    fn default() -> Keywords {
        use TokenKind::*;
        let words = [
            ("TAKE", Take),
            ("POUR", Pour),
            ("SCENE", Scene),
            ("SHOT", Shot),
            ("IF", If),
            ("ELSE", Else),
            ("LOOP", Loop),
            ("BREAK", Break),
            ("CONTINUE", Continue),
            ("true", True),
            ("false", False),
        ]
        .iter()
        .cloned()
        .collect();
        Keywords { words }
    }
}

impl Keywords {
    pub fn new() -> Keywords {
        Keywords::default()
    }

    pub fn get(&self, word: &str) -> Option<TokenKind> {
        self.words.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_case_sensitive() {
        let keywords = Keywords::new();
        assert_eq!(keywords.len(), 11);
        assert_eq!(keywords.get("TAKE"), Some(TokenKind::Take));
        assert_eq!(keywords.get("take"), None);
        assert_eq!(keywords.get("true"), Some(TokenKind::True));
        assert_eq!(keywords.get("TRUE"), None);
        assert!(TokenKind::Continue.is_keyword());
        assert!(!TokenKind::Identifier.is_keyword());
    }
}
