//! Token types produced by the reader.

use crate::{Span, Symbol};
use bitflags::bitflags;
use std::fmt;

/// Reserved words. A name matching one of these is read as a keyword.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Keyword {
    If,
    Then,
    Else,
    For,
    In,
    Switch,
    Case,
    Default,
    End,
    And,
    Or,
    Not,
    Do,
    Export,
    Return,
    Break,
    Continue,
}

impl Keyword {
    /// Look up a keyword by its source text.
    pub fn from_bytes(name: &[u8]) -> Option<Keyword> {
        Some(match name {
            b"if" => Keyword::If,
            b"then" => Keyword::Then,
            b"else" => Keyword::Else,
            b"for" => Keyword::For,
            b"in" => Keyword::In,
            b"switch" => Keyword::Switch,
            b"case" => Keyword::Case,
            b"default" => Keyword::Default,
            b"end" => Keyword::End,
            b"and" => Keyword::And,
            b"or" => Keyword::Or,
            b"not" => Keyword::Not,
            b"do" => Keyword::Do,
            b"export" => Keyword::Export,
            b"return" => Keyword::Return,
            b"break" => Keyword::Break,
            b"continue" => Keyword::Continue,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::If => "if",
            Keyword::Then => "then",
            Keyword::Else => "else",
            Keyword::For => "for",
            Keyword::In => "in",
            Keyword::Switch => "switch",
            Keyword::Case => "case",
            Keyword::Default => "default",
            Keyword::End => "end",
            Keyword::And => "and",
            Keyword::Or => "or",
            Keyword::Not => "not",
            Keyword::Do => "do",
            Keyword::Export => "export",
            Keyword::Return => "return",
            Keyword::Break => "break",
            Keyword::Continue => "continue",
        }
    }
}

/// One- and two-character operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Operator {
    Assign,
    Eq,
    Arrow,
    Plus,
    PlusAssign,
    Minus,
    MinusAssign,
    Star,
    StarAssign,
    Slash,
    SlashAssign,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Bang,
    NotEq,
    Percent,
    Pipe,
    Dot,
    Comma,
    Colon,
    Question,
}

impl Operator {
    /// Whether `byte` can start an operator.
    #[inline]
    pub fn is_operator_byte(byte: u8) -> bool {
        matches!(
            byte,
            b'+' | b'-' | b'*' | b'/' | b'%' | b'!' | b'<' | b'>' | b'=' | b'|' | b'.' | b','
                | b':' | b'?'
        )
    }

    /// Single-character operator for `byte`.
    pub fn single(byte: u8) -> Option<Operator> {
        Some(match byte {
            b'=' => Operator::Assign,
            b'+' => Operator::Plus,
            b'-' => Operator::Minus,
            b'*' => Operator::Star,
            b'/' => Operator::Slash,
            b'<' => Operator::Lt,
            b'>' => Operator::Gt,
            b'!' => Operator::Bang,
            b'%' => Operator::Percent,
            b'|' => Operator::Pipe,
            b'.' => Operator::Dot,
            b',' => Operator::Comma,
            b':' => Operator::Colon,
            b'?' => Operator::Question,
            _ => return None,
        })
    }

    /// Two-character operator formed by `self` followed by `next`.
    pub fn extend(self, next: u8) -> Option<Operator> {
        Some(match (self, next) {
            (Operator::Assign, b'=') => Operator::Eq,
            (Operator::Assign, b'>') => Operator::Arrow,
            (Operator::Plus, b'=') => Operator::PlusAssign,
            (Operator::Minus, b'=') => Operator::MinusAssign,
            (Operator::Star, b'=') => Operator::StarAssign,
            (Operator::Slash, b'=') => Operator::SlashAssign,
            (Operator::Lt, b'=') => Operator::LtEq,
            (Operator::Gt, b'=') => Operator::GtEq,
            (Operator::Bang, b'=') => Operator::NotEq,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Assign => "=",
            Operator::Eq => "==",
            Operator::Arrow => "=>",
            Operator::Plus => "+",
            Operator::PlusAssign => "+=",
            Operator::Minus => "-",
            Operator::MinusAssign => "-=",
            Operator::Star => "*",
            Operator::StarAssign => "*=",
            Operator::Slash => "/",
            Operator::SlashAssign => "/=",
            Operator::Lt => "<",
            Operator::LtEq => "<=",
            Operator::Gt => ">",
            Operator::GtEq => ">=",
            Operator::Bang => "!",
            Operator::NotEq => "!=",
            Operator::Percent => "%",
            Operator::Pipe => "|",
            Operator::Dot => ".",
            Operator::Comma => ",",
            Operator::Colon => ":",
            Operator::Question => "?",
        }
    }
}

/// Bracket punctuation.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Punct {
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
}

impl Punct {
    pub fn from_byte(byte: u8) -> Option<Punct> {
        Some(match byte {
            b'(' => Punct::LParen,
            b')' => Punct::RParen,
            b'[' => Punct::LBracket,
            b']' => Punct::RBracket,
            b'{' => Punct::LBrace,
            b'}' => Punct::RBrace,
            _ => return None,
        })
    }

    pub fn as_char(self) -> char {
        match self {
            Punct::LParen => '(',
            Punct::RParen => ')',
            Punct::LBracket => '[',
            Punct::RBracket => ']',
            Punct::LBrace => '{',
            Punct::RBrace => '}',
        }
    }
}

bitflags! {
    /// Per-token metadata.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct TokenFlags: u8 {
        /// The token carried a lexical error; its payload is best-effort.
        const MALFORMED = 1 << 0;
        /// A `"""` string: no escape processing was applied.
        const VERBATIM = 1 << 1;
    }
}

/// Token payload.
#[derive(Clone, PartialEq, Debug)]
pub enum TokenKind {
    Name(Symbol),
    Keyword(Keyword),
    Operator(Operator),
    Int(i64),
    Float(f64),
    /// Single-quoted or verbatim string, escapes already decoded.
    String(Box<[u8]>),
    /// Literal output between code blocks, or the literal part of an
    /// interpolated string.
    Text(Box<[u8]>),
    /// Statement separator at command level.
    LineFeed,
    StartQuote,
    EndQuote,
    Punct(Punct),
    Eof,
}

impl TokenKind {
    /// Human-readable description for error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Name(_) => "name".to_owned(),
            TokenKind::Keyword(kw) => format!("'{}'", kw.as_str()),
            TokenKind::Operator(op) => format!("'{}'", op.as_str()),
            TokenKind::Int(_) => "integer".to_owned(),
            TokenKind::Float(_) => "float".to_owned(),
            TokenKind::String(_) => "string".to_owned(),
            TokenKind::Text(_) => "text".to_owned(),
            TokenKind::LineFeed => "line feed".to_owned(),
            TokenKind::StartQuote => "start of string".to_owned(),
            TokenKind::EndQuote => "end of string".to_owned(),
            TokenKind::Punct(p) => format!("'{}'", p.as_char()),
            TokenKind::Eof => "end of input".to_owned(),
        }
    }

    #[inline]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, TokenKind::Keyword(kw) if *kw == keyword)
    }

    #[inline]
    pub fn is_operator(&self, operator: Operator) -> bool {
        matches!(self, TokenKind::Operator(op) if *op == operator)
    }

    #[inline]
    pub fn is_punct(&self, punct: Punct) -> bool {
        matches!(self, TokenKind::Punct(p) if *p == punct)
    }
}

/// A token with its source span.
#[derive(Clone, PartialEq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub flags: TokenFlags,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token {
            kind,
            span,
            flags: TokenFlags::empty(),
        }
    }

    #[inline]
    pub fn is_malformed(&self) -> bool {
        self.flags.contains(TokenFlags::MALFORMED)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.span.start, self.kind.describe())
    }
}
