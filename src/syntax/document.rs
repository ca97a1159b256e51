//! Documents: ordered statements whose indentation expresses containment.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use super::statement::{Span, Statement};
use crate::base::{DocumentId, StatementId, TypePath};

/// Every open document of a program, in the order they were added.
pub type Documents = IndexMap<DocumentId, Document>;

/// One interpretation of a declaration's position: the chain of declaration
/// spans from a root statement down to the span itself.
///
/// A statement that declares several names (`A, B`) fans its descendants out
/// into one spine per name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spine<'a> {
    document: DocumentId,
    pub vertebrae: Vec<&'a Span>,
}

impl Spine<'_> {
    /// The type path this spine addresses.
    pub fn path(&self) -> TypePath {
        let names = self.vertebrae.iter().map(|s| s.subject.clone()).collect();
        TypePath::new(self.document, names).unwrap_or_else(|| {
            unreachable!("a spine always ends in the span it was factored from")
        })
    }
}

/// An outline document.
#[derive(Clone, Debug)]
pub struct Document {
    id: DocumentId,
    statements: Vec<Arc<Statement>>,
    positions: FxHashMap<StatementId, usize>,
    next_local: u32,
    tab_size: usize,
}

impl Document {
    pub(crate) fn new(id: DocumentId, tab_size: usize) -> Self {
        Self {
            id,
            statements: Vec::new(),
            positions: FxHashMap::default(),
            next_local: 0,
            tab_size,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Read a line into a statement with a fresh id. The statement is not
    /// inserted into the document.
    pub(crate) fn read_statement(&mut self, text: &str) -> Arc<Statement> {
        let id = StatementId::new(self.id, self.next_local);
        self.next_local += 1;
        Arc::new(Statement::read(id, text, self.tab_size))
    }

    /// Swap in a new statement list (the mutation step of an edit).
    pub(crate) fn replace(&mut self, statements: Vec<Arc<Statement>>) {
        self.positions = statements
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id, i))
            .collect();
        self.statements = statements;
    }

    pub fn statements(&self) -> &[Arc<Statement>] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Statement> {
        self.statements.get(index).map(|s| s.as_ref())
    }

    /// Current index of a statement.
    pub fn position(&self, id: StatementId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    pub fn statement(&self, id: StatementId) -> Option<&Statement> {
        self.position(id).and_then(|i| self.get(i))
    }

    /// Reassemble the document text.
    pub fn text(&self) -> String {
        self.statements
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Index of the containing statement.
    pub fn parent_of(&self, index: usize) -> Option<usize> {
        parent_in(&self.statements, index)
    }

    /// Containing statements, nearest first.
    pub fn ancestors(&self, index: usize) -> Vec<usize> {
        let mut ancestors = Vec::new();
        let mut current = self.parent_of(index);
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.parent_of(parent);
        }
        ancestors
    }

    /// Nesting depth; root statements have depth 0.
    pub fn depth(&self, index: usize) -> usize {
        self.ancestors(index).len()
    }

    /// Indexes of every non-noop statement nested under `index`.
    pub fn descendants(&self, index: usize) -> Vec<usize> {
        descendants_in(&self.statements, index)
    }

    /// Indexes touched by an invalidate/revalidate notification: the
    /// descendants of each parent, or the whole document when `parents` is
    /// empty.
    pub fn region(&self, parents: &[StatementId]) -> Vec<usize> {
        if parents.is_empty() {
            return (0..self.statements.len()).collect();
        }
        let mut region: Vec<usize> = parents
            .iter()
            .flat_map(|parent| {
                let Some(index) = self.position(*parent) else {
                    panic!("notification names statement {parent} which is not in {}", self.id)
                };
                self.descendants(index)
            })
            .collect();
        region.sort_unstable();
        region.dedup();
        region
    }

    /// Every type path interpretation of a declaration span at `index`.
    ///
    /// Returns the cartesian product of the declaration spans of each
    /// ancestor (root first) followed by `span`. An ancestor that declares
    /// nothing breaks the chain and yields no spines.
    pub fn factor<'a>(&'a self, index: usize, span: &'a Span) -> Vec<Spine<'a>> {
        let mut chains: Vec<Vec<&'a Span>> = vec![Vec::new()];
        for ancestor in self.ancestors(index).into_iter().rev() {
            let declarations = &self.statements[ancestor].declarations;
            chains = chains
                .into_iter()
                .flat_map(|chain| {
                    declarations.iter().map(move |decl| {
                        let mut chain = chain.clone();
                        chain.push(decl);
                        chain
                    })
                })
                .collect();
            if chains.is_empty() {
                return Vec::new();
            }
        }
        chains
            .into_iter()
            .map(|mut vertebrae| {
                vertebrae.push(span);
                Spine {
                    document: self.id,
                    vertebrae,
                }
            })
            .collect()
    }
}

/// Parent of the statement at `index` within `statements`.
pub(crate) fn parent_in(statements: &[Arc<Statement>], index: usize) -> Option<usize> {
    let statement = statements.get(index)?;
    if statement.is_noop() {
        return None;
    }
    ancestor_for(statements, index, statement.indent)
}

/// The statement that would contain a statement with `indent` placed at
/// `index`: the nearest earlier non-noop statement with a smaller indent.
pub(crate) fn ancestor_for(
    statements: &[Arc<Statement>],
    index: usize,
    indent: u32,
) -> Option<usize> {
    statements[..index.min(statements.len())]
        .iter()
        .rposition(|s| !s.is_noop() && s.indent < indent)
}

pub(crate) fn descendants_in(statements: &[Arc<Statement>], index: usize) -> Vec<usize> {
    let Some(statement) = statements.get(index) else {
        return Vec::new();
    };
    let indent = statement.indent;
    let mut descendants = Vec::new();
    for (offset, s) in statements[index + 1..].iter().enumerate() {
        if s.is_noop() {
            continue;
        }
        if s.indent <= indent {
            break;
        }
        descendants.push(index + 1 + offset);
    }
    descendants
}
