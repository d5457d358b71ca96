//! Record retrieval on a table.

use std::fmt::Write as _;

use tracing::{debug, trace};

use crate::error::Result;
use crate::filter::FilterCriteria;
use crate::protocol::{CrudFind, DataModel, DbResult, TargetRef};
use crate::session::Session;
use crate::statement::{impl_filter_mutators, impl_read_mutators, IntoFields};

/// A statement retrieving records from a table.
pub struct SelectStatement<'a> {
    session: &'a Session,
    target: TargetRef,
    criteria: FilterCriteria,
}

impl<'a> SelectStatement<'a> {
    pub(crate) fn new(
        session: &'a Session,
        target: TargetRef,
        fields: Vec<String>,
    ) -> Result<Self> {
        let mut criteria = FilterCriteria::new();
        criteria.set_projection(session.parser(), DataModel::Table, fields)?;
        Ok(Self {
            session,
            target,
            criteria,
        })
    }

    /// Sets the order-by criteria. Alias for `sort`.
    pub fn order_by<F: IntoFields>(self, clauses: F) -> Result<Self> {
        self.sort(clauses)
    }

    /// The generated single-table SELECT text for this statement.
    ///
    /// Clauses appear in fixed order, each included only when set.
    pub fn get_sql(&self) -> String {
        let c = &self.criteria;
        let projection = match c.projection_str() {
            Some(fields) if !fields.is_empty() => fields,
            _ => "*",
        };
        let mut sql = format!(
            "SELECT {} FROM {}.{}",
            projection, self.target.schema, self.target.name
        );
        if let Some(condition) = c.condition() {
            let _ = write!(sql, " WHERE {condition}");
        }
        if let Some(grouping) = c.grouping_str() {
            let _ = write!(sql, " GROUP BY {grouping}");
        }
        if let Some(having) = c.having_str() {
            let _ = write!(sql, " HAVING {having}");
        }
        if let Some(sort) = c.sort_str() {
            let _ = write!(sql, " ORDER BY {sort}");
        }
        if c.has_limit() {
            let _ = write!(
                sql,
                " LIMIT {} OFFSET {}",
                c.limit_row_count(),
                c.limit_offset()
            );
        }
        trace!(%sql, "generated select text");
        sql
    }

    /// Executes the statement, delegating to the connection's find
    /// operation.
    pub fn execute(&self) -> Result<DbResult> {
        debug!(
            schema = %self.target.schema,
            table = %self.target.name,
            "executing select"
        );
        self.session.connection().send_find(&CrudFind {
            target: self.target.clone(),
            data_model: DataModel::Table,
            criteria: self.criteria.clone(),
        })
    }
}

impl_filter_mutators!(SelectStatement, DataModel::Table, "records");
impl_read_mutators!(SelectStatement, DataModel::Table);
