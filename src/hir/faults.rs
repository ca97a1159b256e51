//! Faults: data errors found in input documents.
//!
//! Faults are values, never panics. They are collected per resolution
//! session and paired with cruft marks so later walks skip the offending
//! objects.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use text_size::TextRange;

use crate::base::{DocumentId, StatementId};
use crate::syntax::{Document, SpanId};

// ============================================================================
// FAULT TYPES
// ============================================================================

/// Severity level of a fault.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The faulty object is excluded from type construction.
    Error,
    /// The type is still constructed, but flagged.
    Warning,
}

/// Fault codes.
///
/// - **E0001-E0099**: errors that exclude an object from resolution
/// - **W0001-W0099**: warnings
pub mod codes {
    /// Annotation with no candidate target.
    pub const UNRESOLVED_ANNOTATION: &str = "E0001";
    /// Base chain that leads back to itself.
    pub const CIRCULAR_TYPE_REFERENCE: &str = "E0002";
    /// Indent mixing tabs and spaces.
    pub const TABS_AND_SPACES: &str = "E0003";

    /// Override whose bases do not satisfy the bases of what it overrides.
    pub const CONTRACT_VIOLATION: &str = "W0001";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaultKind {
    UnresolvedAnnotation,
    CircularTypeReference,
    ContractViolation,
    TabsAndSpaces,
}

impl FaultKind {
    pub fn code(self) -> &'static str {
        match self {
            FaultKind::UnresolvedAnnotation => codes::UNRESOLVED_ANNOTATION,
            FaultKind::CircularTypeReference => codes::CIRCULAR_TYPE_REFERENCE,
            FaultKind::ContractViolation => codes::CONTRACT_VIOLATION,
            FaultKind::TabsAndSpaces => codes::TABS_AND_SPACES,
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            FaultKind::ContractViolation => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Default message, naming `subject` where the kind has one.
    pub fn describe(self, subject: &str) -> String {
        match self {
            FaultKind::UnresolvedAnnotation => {
                format!("cannot resolve `{subject}` from this scope")
            }
            FaultKind::CircularTypeReference => {
                format!("`{subject}` is part of a circular type reference")
            }
            FaultKind::ContractViolation => format!(
                "`{subject}` overrides a type whose bases are not satisfied by its own"
            ),
            FaultKind::TabsAndSpaces => {
                "statement is indented with both tabs and spaces".to_string()
            }
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A located fault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fault {
    pub kind: FaultKind,
    pub severity: Severity,
    /// Fault code (e.g., "E0001").
    pub code: &'static str,
    pub document: DocumentId,
    /// Statement index within the document (0-indexed).
    pub line: u32,
    /// Byte range within the statement text.
    pub range: TextRange,
    pub statement: StatementId,
    /// The span the fault is about, if narrower than the statement.
    pub span: Option<SpanId>,
    pub message: Arc<str>,
}

impl Fault {
    /// Create a fault covering a whole statement.
    pub fn new(
        kind: FaultKind,
        statement: StatementId,
        line: u32,
        range: TextRange,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            code: kind.code(),
            document: statement.document,
            line,
            range,
            statement,
            span: None,
            message: message.into(),
        }
    }

    /// Narrow the fault to one span.
    pub fn with_span(mut self, span: SpanId, range: TextRange) -> Self {
        self.span = Some(span);
        self.range = range;
        self
    }

    /// Locate a fault about `span` within `document`. Returns `None` if the
    /// span's statement is no longer in the document.
    pub fn at_span(kind: FaultKind, document: &Document, span: SpanId) -> Option<Self> {
        let line = document.position(span.statement)?;
        let statement = document.get(line)?;
        let located = statement.span(span)?;
        Some(
            Fault::new(
                kind,
                statement.id,
                line as u32,
                statement.content_range(),
                kind.describe(&located.subject),
            )
            .with_span(span, located.range),
        )
    }

    /// Locate a fault about a whole statement.
    pub fn at_statement(kind: FaultKind, document: &Document, id: StatementId) -> Option<Self> {
        let line = document.position(id)?;
        let statement = document.get(line)?;
        let subject = statement
            .declarations
            .first()
            .map(|s| s.subject.as_str())
            .unwrap_or_default();
        Some(Fault::new(
            kind,
            id,
            line as u32,
            statement.content_range(),
            kind.describe(subject),
        ))
    }

    pub fn with_message(mut self, message: impl Into<Arc<str>>) -> Self {
        self.message = message.into();
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: [{}] {}",
            self.document,
            self.line + 1,
            self.code,
            self.message
        )
    }
}

// ============================================================================
// FAULT COLLECTOR
// ============================================================================

/// Collects the faults of one resolution session.
///
/// Reporting the same (kind, statement, span) twice keeps the first report.
#[derive(Clone, Debug, Default)]
pub struct FaultCollector {
    faults: Vec<Fault>,
    seen: FxHashSet<(FaultKind, StatementId, Option<SpanId>)>,
}

impl FaultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fault. Returns `false` if an identical report was already made.
    pub fn report(&mut self, fault: Fault) -> bool {
        if !self.seen.insert((fault.kind, fault.statement, fault.span)) {
            return false;
        }
        tracing::debug!(
            code = fault.code,
            statement = %fault.statement,
            "{}",
            fault.message
        );
        self.faults.push(fault);
        true
    }

    pub fn faults(&self) -> &[Fault] {
        &self.faults
    }

    pub fn errors(&self) -> impl Iterator<Item = &Fault> {
        self.faults.iter().filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Fault> {
        self.faults.iter().filter(|f| f.severity == Severity::Warning)
    }

    pub fn of_kind(&self, kind: FaultKind) -> impl Iterator<Item = &Fault> {
        self.faults.iter().filter(move |f| f.kind == kind)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn len(&self) -> usize {
        self.faults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faults.is_empty()
    }
}
