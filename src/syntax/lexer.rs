//! Logos-based lexer for outline statements
//!
//! A statement is a single line, so the token set is tiny: words, the
//! comma separator, the `:` joint, and runs of whitespace.

use logos::Logos;
use text_size::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: TextSize,
}

impl Token<'_> {
    /// Offset one past the last byte of this token.
    pub fn end(&self) -> TextSize {
        self.offset + TextSize::of(self.text)
    }
}

/// Token classification exposed to the statement reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Whitespace,
    Comma,
    Joint,
    Word,
    Error,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }

    /// Start counting offsets at `base` (used when lexing the content that
    /// follows a statement's indent).
    pub fn with_offset(input: &'a str, base: TextSize) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: base.into(),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => TokenKind::Error,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire line into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to TokenKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    #[regex(r"[ \t\r]+")]
    Whitespace,

    #[token(",")]
    Comma,

    #[token(":")]
    Joint,

    #[regex(r"[^ \t\r\n,:]+")]
    Word,
}

impl From<LogosToken> for TokenKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Whitespace => TokenKind::Whitespace,
            LogosToken::Comma => TokenKind::Comma,
            LogosToken::Joint => TokenKind::Joint,
            LogosToken::Word => TokenKind::Word,
        }
    }
}
