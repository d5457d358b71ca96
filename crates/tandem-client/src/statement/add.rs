//! Document addition on a collection.

use tracing::debug;

use crate::document::{Document, IntoDocument};
use crate::error::Result;
use crate::protocol::{CrudInsert, DbResult, InsertPayload, TargetRef};
use crate::session::Session;

/// A statement adding documents to a collection.
#[derive(Debug)]
pub struct AddStatement<'a> {
    session: &'a Session,
    target: TargetRef,
    documents: Vec<Document>,
    upsert: bool,
}

impl<'a> AddStatement<'a> {
    pub(crate) fn new(session: &'a Session, target: TargetRef) -> Self {
        Self {
            session,
            target,
            documents: Vec::new(),
            upsert: false,
        }
    }

    /// Adds one document, coercing object, value or JSON-text input into
    /// the document representation.
    pub fn add<D: IntoDocument>(mut self, doc: D) -> Result<Self> {
        self.documents.push(doc.into_document()?);
        Ok(self)
    }

    /// Sets the upsert flag: matched documents are updated with the
    /// provided value instead of rejected as duplicates.
    pub fn upsert(mut self, upsert: bool) -> Self {
        self.upsert = upsert;
        self
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn is_upsert(&self) -> bool {
        self.upsert
    }

    /// Executes the statement.
    ///
    /// With nothing accumulated this is a no-op: an empty result is
    /// returned and the connection is never contacted.
    pub fn execute(&self) -> Result<DbResult> {
        if self.documents.is_empty() {
            return Ok(DbResult::default());
        }
        debug!(
            schema = %self.target.schema,
            collection = %self.target.name,
            documents = self.documents.len(),
            "executing add"
        );
        self.session.connection().send_insert(&CrudInsert {
            target: self.target.clone(),
            payload: InsertPayload::Documents {
                documents: self.documents.clone(),
                upsert: self.upsert,
            },
        })
    }
}
