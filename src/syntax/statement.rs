//! Statements and spans: one outline line and the names it declares or
//! annotates.

use text_size::{TextRange, TextSize};

use super::lexer::{Lexer, TokenKind};
use crate::base::{Name, StatementId};

/// Which side of the joint a span sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SpanRole {
    Declaration,
    Annotation,
}

/// Stable identity of a span: its statement, its side of the joint, and its
/// position on that side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpanId {
    pub statement: StatementId,
    pub role: SpanRole,
    pub index: u32,
}

/// A declared or annotated name within a statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    pub id: SpanId,
    pub subject: Name,
    /// Byte range of the subject within the statement text.
    pub range: TextRange,
}

/// One line of a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statement {
    pub id: StatementId,
    pub text: String,
    /// Indent width in columns; a tab counts `tab_size` columns.
    pub indent: u32,
    /// The indent mixes tabs and spaces.
    pub mixed_indent: bool,
    pub declarations: Vec<Span>,
    pub annotations: Vec<Span>,
    noop: bool,
}

impl Statement {
    /// Read a single line.
    ///
    /// `decl, decl : ann, ann`: the first `:` is the joint, terms are comma
    /// separated. Names may contain inner spaces; empty terms are dropped.
    /// Blank lines and `//` comments are no-op statements.
    pub fn read(id: StatementId, text: &str, tab_size: usize) -> Self {
        let content = text.trim_start_matches([' ', '\t']);
        let indent_text = &text[..text.len() - content.len()];
        let indent = indent_text
            .chars()
            .map(|c| if c == '\t' { tab_size as u32 } else { 1 })
            .sum();
        let mixed_indent = indent_text.contains(' ') && indent_text.contains('\t');

        let mut statement = Self {
            id,
            text: text.to_string(),
            indent,
            mixed_indent,
            declarations: Vec::new(),
            annotations: Vec::new(),
            noop: false,
        };

        if content.trim().is_empty() || content.starts_with("//") {
            statement.noop = true;
            return statement;
        }

        let base = TextSize::of(indent_text);
        let mut role = SpanRole::Declaration;
        let mut term: Option<TextRange> = None;

        for token in Lexer::with_offset(content, base) {
            match token.kind {
                TokenKind::Whitespace => {}
                TokenKind::Word | TokenKind::Error => {
                    let range = TextRange::new(token.offset, token.end());
                    term = Some(match term {
                        Some(open) => open.cover(range),
                        None => range,
                    });
                }
                TokenKind::Comma => statement.push_term(role, term.take()),
                TokenKind::Joint => {
                    statement.push_term(role, term.take());
                    role = SpanRole::Annotation;
                }
            }
        }
        statement.push_term(role, term.take());
        statement
    }

    fn push_term(&mut self, role: SpanRole, range: Option<TextRange>) {
        let Some(range) = range else {
            return;
        };
        let subject = Name::new(&self.text[range]);
        let spans = match role {
            SpanRole::Declaration => &mut self.declarations,
            SpanRole::Annotation => &mut self.annotations,
        };
        let id = SpanId {
            statement: self.id,
            role,
            index: spans.len() as u32,
        };
        spans.push(Span { id, subject, range });
    }

    /// Blank or comment line. No-op statements never take part in the
    /// hierarchy.
    pub fn is_noop(&self) -> bool {
        self.noop
    }

    /// Look up one of this statement's spans by id.
    pub fn span(&self, id: SpanId) -> Option<&Span> {
        if id.statement != self.id {
            return None;
        }
        let spans = match id.role {
            SpanRole::Declaration => &self.declarations,
            SpanRole::Annotation => &self.annotations,
        };
        spans.get(id.index as usize)
    }

    /// Range of the statement's content, excluding the indent.
    pub fn content_range(&self) -> TextRange {
        let content = self.text.trim();
        let start = self.text.len() - self.text.trim_start().len();
        TextRange::at(TextSize::new(start as u32), TextSize::of(content))
    }
}
