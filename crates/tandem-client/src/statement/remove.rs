//! Document removal from a collection.

use tracing::debug;

use crate::error::{Error, Result};
use crate::filter::FilterCriteria;
use crate::protocol::{CrudDelete, DataModel, DbResult, TargetRef};
use crate::session::Session;
use crate::statement::impl_filter_mutators;

/// A statement removing documents from a collection.
///
/// Execution requires an explicit filter.
pub struct RemoveStatement<'a> {
    session: &'a Session,
    target: TargetRef,
    criteria: FilterCriteria,
}

impl<'a> RemoveStatement<'a> {
    pub(crate) fn new(session: &'a Session, target: TargetRef) -> Self {
        Self {
            session,
            target,
            criteria: FilterCriteria::new(),
        }
    }

    /// Executes the statement, delegating to the connection's delete
    /// operation. Fails unless a filter was set.
    pub fn execute(&self) -> Result<DbResult> {
        if !self.criteria.has_filter() {
            return Err(Error::NoCondition {
                operation: "remove",
            });
        }
        debug!(
            schema = %self.target.schema,
            collection = %self.target.name,
            "executing remove"
        );
        self.session.connection().send_delete(&CrudDelete {
            target: self.target.clone(),
            data_model: DataModel::Document,
            criteria: self.criteria.clone(),
        })
    }
}

impl_filter_mutators!(RemoveStatement, DataModel::Document, "documents");
