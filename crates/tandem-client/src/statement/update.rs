//! Record update operations on a table.

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::filter::FilterCriteria;
use crate::protocol::{CrudUpdate, DataModel, DbResult, TargetRef};
use crate::session::Session;
use crate::statement::impl_filter_mutators;
use crate::update_op::UpdateOperation;

/// A statement updating records in a table.
///
/// Only column assignment is supported; execution requires an explicit
/// filter.
pub struct UpdateStatement<'a> {
    session: &'a Session,
    target: TargetRef,
    criteria: FilterCriteria,
    operations: Vec<UpdateOperation>,
}

impl<'a> UpdateStatement<'a> {
    pub(crate) fn new(session: &'a Session, target: TargetRef) -> Self {
        Self {
            session,
            target,
            criteria: FilterCriteria::new(),
            operations: Vec::new(),
        }
    }

    /// Updates the column value on the matching records.
    pub fn set<V: Into<Value>>(mut self, field: &str, value: V) -> Result<Self> {
        self.operations.push(UpdateOperation::table_set(
            self.session.parser(),
            field,
            value.into(),
        )?);
        Ok(self)
    }

    pub fn operations(&self) -> &[UpdateOperation] {
        &self.operations
    }

    /// Executes the statement, delegating to the connection's update
    /// operation. Fails unless a filter was set.
    pub fn execute(&self) -> Result<DbResult> {
        if !self.criteria.has_filter() {
            return Err(Error::NoCondition {
                operation: "update",
            });
        }
        debug!(
            schema = %self.target.schema,
            table = %self.target.name,
            operations = self.operations.len(),
            "executing update"
        );
        self.session.connection().send_update(&CrudUpdate {
            target: self.target.clone(),
            data_model: DataModel::Table,
            criteria: self.criteria.clone(),
            operations: self.operations.clone(),
        })
    }
}

impl_filter_mutators!(UpdateStatement, DataModel::Table, "records");

#[cfg(test)]
mod tests {
    use crate::protocol::DataModel;
    use crate::test_support::{session, SentOp};
    use crate::update_op::{UpdateKind, UpdateSource};

    use super::*;

    #[test]
    fn execute_without_filter_fails() {
        let (session, log) = session();
        let err = session
            .schema("s")
            .table("t")
            .update()
            .set("a", 1)
            .unwrap()
            .execute()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::NoCondition {
                operation: "update"
            }
        ));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn set_resolves_a_column_reference() {
        let (session, _log) = session();
        let stmt = session
            .schema("s")
            .table("t")
            .update()
            .set("a.b", 1)
            .unwrap();
        assert_eq!(stmt.operations()[0].kind, UpdateKind::Set);
        match &stmt.operations()[0].source {
            UpdateSource::Column(column) => {
                assert_eq!(column.table.as_deref(), Some("a"));
                assert_eq!(column.name, "b");
            }
            other => panic!("expected a column reference, got {other:?}"),
        }
    }

    #[test]
    fn execute_with_filter_delegates_to_update() {
        let (session, log) = session();
        session
            .schema("s")
            .table("t")
            .update()
            .filter("id = :id")
            .unwrap()
            .set("a", 1)
            .unwrap()
            .bind(("id", 3))
            .unwrap()
            .execute()
            .unwrap();
        let ops = log.borrow();
        match &ops[0] {
            SentOp::Update(update) => {
                assert_eq!(update.data_model, DataModel::Table);
                assert_eq!(update.criteria.bindings().len(), 1);
            }
            other => panic!("expected an update, got {other:?}"),
        }
    }
}
