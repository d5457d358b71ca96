//! Record deletion from a table.

use tracing::debug;

use crate::error::{Error, Result};
use crate::filter::FilterCriteria;
use crate::protocol::{CrudDelete, DataModel, DbResult, TargetRef};
use crate::session::Session;
use crate::statement::impl_filter_mutators;

/// A statement deleting records from a table.
///
/// Execution requires an explicit filter.
pub struct DeleteStatement<'a> {
    session: &'a Session,
    target: TargetRef,
    criteria: FilterCriteria,
}

impl<'a> DeleteStatement<'a> {
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
                operation: "delete",
            });
        }
        debug!(
            schema = %self.target.schema,
            table = %self.target.name,
            "executing delete"
        );
        self.session.connection().send_delete(&CrudDelete {
            target: self.target.clone(),
            data_model: DataModel::Table,
            criteria: self.criteria.clone(),
        })
    }
}

impl_filter_mutators!(DeleteStatement, DataModel::Table, "records");
