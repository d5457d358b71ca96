//! Row insertion on a table.

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::expr::ColumnIdent;
use crate::protocol::{CrudInsert, DbResult, InsertPayload, TargetRef};
use crate::session::Session;
use crate::statement::IntoFields;

/// A statement inserting value rows into a table.
#[derive(Debug)]
pub struct InsertStatement<'a> {
    session: &'a Session,
    target: TargetRef,
    columns: Vec<ColumnIdent>,
    rows: Vec<Vec<Value>>,
}

impl<'a> InsertStatement<'a> {
    pub(crate) fn new(session: &'a Session, target: TargetRef) -> Self {
        Self {
            session,
            target,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Names the columns the value rows map onto. Each name is parsed as a
    /// table-field reference; a malformed name fails here.
    pub fn fields<F: IntoFields>(mut self, fields: F) -> Result<Self> {
        for field in fields.into_fields() {
            let column = self.session.parser().parse_table_field(&field)?;
            self.columns.push(column);
        }
        Ok(self)
    }

    /// Appends one row of values.
    pub fn values<I, V>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
        self
    }

    pub fn columns(&self) -> &[ColumnIdent] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Executes the statement, delegating unconditionally to the
    /// connection's insert operation.
    pub fn execute(&self) -> Result<DbResult> {
        debug!(
            schema = %self.target.schema,
            table = %self.target.name,
            rows = self.rows.len(),
            "executing insert"
        );
        self.session.connection().send_insert(&CrudInsert {
            target: self.target.clone(),
            payload: InsertPayload::Rows {
                columns: self.columns.clone(),
                rows: self.rows.clone(),
            },
        })
    }
}
