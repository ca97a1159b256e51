//! Syntax: the statement layer the resolution core consumes.
//!
//! Documents are outlines. Each non-blank line is a [`Statement`] that
//! declares one or more names and optionally annotates them after a `:`
//! joint; indentation expresses containment.
//!
//! ```text
//! Animal
//!     Sound
//! Dog : Animal
//!     Sound : Bark
//! ```

mod document;
mod edit;
mod lexer;
mod statement;

pub use document::{Document, Documents, Spine};
pub use edit::{EditError, EditOp, EditTransaction};
pub use lexer::{Lexer, Token, TokenKind, tokenize};
pub use statement::{Span, SpanId, SpanRole, Statement};
