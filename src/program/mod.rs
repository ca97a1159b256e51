//! Program: owns documents, the declaration graph and resolution state.
//!
//! The `Program` applies edits through paired graph notifications and hands
//! out [`ConstructionWorker`]s bound to a session for the current version.
//!
//! ## Usage
//!
//! ```
//! use truth::program::Program;
//!
//! let mut program = Program::new();
//! let doc = program.add_document("Animal\n\tSound\nDog : Animal\n\tSound : Bark\nBark");
//!
//! let path = program.path(doc, "Dog/Sound").unwrap();
//! let mut worker = program.worker();
//! let sound = worker.drill(&path).unwrap();
//! assert!(worker.parallel(sound).unwrap().is_explicit());
//! ```

mod error;
mod options;

use tracing::debug;

pub use error::ProgramError;
pub use options::ProgramOptions;

use crate::base::{DocumentId, TypePath};
use crate::graph::HyperGraph;
use crate::hir::{ConstructionWorker, FaultCollector, ParallelId, ResolutionSession};
use crate::syntax::{Document, Documents, EditTransaction};

/// Owns all mutable state of a set of documents.
///
/// Edits go through [`edit`](Self::edit), which brackets the mutation with
/// `invalidate`/`revalidate`. Resolution goes through
/// [`worker`](Self::worker), which rebuilds the session when the version has
/// advanced since it was built.
#[derive(Debug)]
pub struct Program {
    documents: Documents,
    graph: HyperGraph,
    options: ProgramOptions,
    next_document: u32,
    /// Advances on every successful mutation.
    version: u64,
    session: Option<ResolutionSession>,
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl Program {
    pub fn new() -> Self {
        Self::with_options(ProgramOptions::default())
    }

    pub fn with_options(options: ProgramOptions) -> Self {
        Self {
            documents: Documents::default(),
            graph: HyperGraph::new(),
            options,
            next_document: 0,
            version: 0,
            session: None,
        }
    }

    pub fn options(&self) -> &ProgramOptions {
        &self.options
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn graph(&self) -> &HyperGraph {
        &self.graph
    }

    pub fn documents(&self) -> &Documents {
        &self.documents
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(&id)
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Add a document and include its declarations.
    pub fn add_document(&mut self, text: &str) -> DocumentId {
        let id = DocumentId::new(self.next_document);
        self.next_document += 1;

        let mut document = Document::new(id, self.options.tab_size);
        self.graph.invalidate(&document, &[]);
        let statements = text.lines().map(|line| document.read_statement(line)).collect();
        document.replace(statements);
        self.graph.revalidate(&document, &[]);

        debug!(document = %id, statements = document.len(), "added document");
        self.documents.insert(id, document);
        self.version += 1;
        id
    }

    /// Remove a document, disposing of every node it declared.
    pub fn remove_document(&mut self, id: DocumentId) -> Result<Document, ProgramError> {
        let Some(mut document) = self.documents.shift_remove(&id) else {
            return Err(ProgramError::UnknownDocument(id));
        };
        self.graph.invalidate(&document, &[]);
        let statements = document.statements().to_vec();
        document.replace(Vec::new());
        self.graph.revalidate(&document, &[]);
        document.replace(statements);

        debug!(document = %id, "removed document");
        self.version += 1;
        Ok(document)
    }

    /// Apply one edit transaction to a document.
    ///
    /// The transaction is planned first; if planning fails nothing is
    /// applied and the version does not advance. An empty transaction still
    /// pairs its notifications.
    pub fn edit(
        &mut self,
        id: DocumentId,
        build: impl FnOnce(&mut EditTransaction),
    ) -> Result<(), ProgramError> {
        let Some(document) = self.documents.get_mut(&id) else {
            return Err(ProgramError::UnknownDocument(id));
        };
        let mut transaction = EditTransaction::new();
        build(&mut transaction);
        let plan = document.plan(transaction.into_ops())?;

        self.graph.invalidate(document, &plan.parents);
        document.replace(plan.statements);
        self.graph.revalidate(document, &plan.parents);

        debug!(
            document = %id,
            parents = plan.parents.len(),
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "applied edit"
        );
        self.version += 1;
        Ok(())
    }

    // ========================================================================
    // RESOLUTION
    // ========================================================================

    /// Parse `text` as a type path within a known document.
    pub fn path(&self, document: DocumentId, text: &str) -> Result<TypePath, ProgramError> {
        if !self.documents.contains_key(&document) {
            return Err(ProgramError::UnknownDocument(document));
        }
        TypePath::parse(document, text).ok_or_else(|| ProgramError::invalid_path(text))
    }

    /// A worker bound to the session for the current version.
    pub fn worker(&mut self) -> ConstructionWorker<'_> {
        let version = self.version;
        if self.session.as_ref().is_some_and(|s| s.version() != version) {
            self.session = None;
        }
        let session = self.session.get_or_insert_with(|| {
            debug!(version, "building resolution session");
            ResolutionSession::new(version)
        });
        ConstructionWorker::new(&self.graph, &self.documents, session, self.options.resolve)
    }

    /// Parse and drill a type path.
    pub fn drill(
        &mut self,
        document: DocumentId,
        text: &str,
    ) -> Result<Option<ParallelId>, ProgramError> {
        let path = self.path(document, text)?;
        Ok(self.worker().drill(&path))
    }

    /// The session built for the current version, if any.
    pub fn session(&self) -> Option<&ResolutionSession> {
        self.session
            .as_ref()
            .filter(|session| session.version() == self.version)
    }

    /// Faults found so far by the current session.
    pub fn faults(&mut self) -> &FaultCollector {
        self.worker();
        match &self.session {
            Some(session) => session.faults(),
            None => unreachable!("worker() always installs a session"),
        }
    }
}
