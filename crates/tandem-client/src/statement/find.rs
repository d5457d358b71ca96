//! Document selection on a collection.

use tracing::debug;

use crate::error::Result;
use crate::filter::FilterCriteria;
use crate::protocol::{CrudFind, DataModel, DbResult, TargetRef};
use crate::session::Session;
use crate::statement::{impl_filter_mutators, impl_read_mutators, IntoFields};

/// A statement retrieving documents from a collection.
///
/// A find without a condition returns every document, subject to any
/// limit; reads never require a filter.
pub struct FindStatement<'a> {
    session: &'a Session,
    target: TargetRef,
    criteria: FilterCriteria,
}

impl<'a> FindStatement<'a> {
    pub(crate) fn new(session: &'a Session, target: TargetRef) -> Self {
        Self {
            session,
            target,
            criteria: FilterCriteria::new(),
        }
    }

    /// Sets a document field filter: the fields to extract from each
    /// matching document.
    pub fn fields<F: IntoFields>(mut self, fields: F) -> Result<Self> {
        self.criteria.set_projection(
            self.session.parser(),
            DataModel::Document,
            fields.into_fields(),
        )?;
        Ok(self)
    }

    /// Executes the statement, delegating to the connection's find
    /// operation.
    pub fn execute(&self) -> Result<DbResult> {
        debug!(
            schema = %self.target.schema,
            collection = %self.target.name,
            "executing find"
        );
        self.session.connection().send_find(&CrudFind {
            target: self.target.clone(),
            data_model: DataModel::Document,
            criteria: self.criteria.clone(),
        })
    }
}

impl_filter_mutators!(FindStatement, DataModel::Document, "documents");
impl_read_mutators!(FindStatement, DataModel::Document);
