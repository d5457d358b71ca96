//! Raw SQL pass-through.

use tracing::debug;

use crate::error::Result;
use crate::protocol::SqlResult;
use crate::session::Session;

/// A statement carrying raw SQL text.
pub struct SqlStatement<'a> {
    session: &'a Session,
    sql: String,
}

impl<'a> SqlStatement<'a> {
    pub(crate) fn new(session: &'a Session, sql: String) -> Self {
        Self { session, sql }
    }

    /// The SQL text to be executed.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Executes the statement over the connection.
    pub fn execute(&self) -> Result<SqlResult> {
        debug!(sql = %self.sql, "executing sql statement");
        self.session.connection().send_sql(&self.sql)
    }
}
