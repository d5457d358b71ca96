//! Transport collaborator interface and operation descriptors.
//!
//! A statement's `execute()` assembles one of the descriptor values below
//! and hands it to the [`Connection`] implementation. Descriptors are
//! owned, wire-agnostic and fully validated; no partial descriptor is ever
//! sent.

use serde_json::Value;

use crate::document::Document;
use crate::error::Result;
use crate::expr::ColumnIdent;
use crate::filter::FilterCriteria;
use crate::update_op::UpdateOperation;

/// Namespace under which administrative commands are executed.
pub const ADMIN_NAMESPACE: &str = "tandem";

/// Access mode of a statement target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataModel {
    /// Schema-less document collections; field paths are document paths.
    Document,
    /// Relational tables; field paths are column references.
    Table,
}

/// Names the collection or table a statement operates on.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetRef {
    pub schema: String,
    pub name: String,
}

impl TargetRef {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }
}

/// Descriptor of a read operation.
#[derive(Debug, Clone, PartialEq)]
pub struct CrudFind {
    pub target: TargetRef,
    pub data_model: DataModel,
    pub criteria: FilterCriteria,
}

/// The rows-or-documents payload of an insert descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertPayload {
    /// Document insert into a collection.
    Documents {
        documents: Vec<Document>,
        upsert: bool,
    },
    /// Row insert into a table.
    Rows {
        columns: Vec<ColumnIdent>,
        rows: Vec<Vec<Value>>,
    },
}

/// Descriptor of an insert operation.
#[derive(Debug, Clone, PartialEq)]
pub struct CrudInsert {
    pub target: TargetRef,
    pub payload: InsertPayload,
}

/// Descriptor of an update operation.
#[derive(Debug, Clone, PartialEq)]
pub struct CrudUpdate {
    pub target: TargetRef,
    pub data_model: DataModel,
    pub criteria: FilterCriteria,
    pub operations: Vec<UpdateOperation>,
}

/// Descriptor of a delete operation.
#[derive(Debug, Clone, PartialEq)]
pub struct CrudDelete {
    pub target: TargetRef,
    pub data_model: DataModel,
    pub criteria: FilterCriteria,
}

/// Result of a CRUD or administrative operation.
///
/// Result decoding is owned by the transport; this carrier only exposes
/// what the one-shot helpers need.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DbResult {
    pub affected_items: u64,
    pub generated_ids: Vec<String>,
}

/// Result of a raw SQL round trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlResult {
    pub rows: Vec<Vec<Value>>,
}

impl SqlResult {
    /// First column of the first row, for scalar queries.
    pub fn scalar(&self) -> Option<&Value> {
        self.rows.first().and_then(|row| row.first())
    }
}

/// The transport collaborator.
///
/// Implementations execute a descriptor over the wire and return the
/// server's result, or a transport-level error, unchanged. Retries,
/// timeouts and cancellation are transport policy and opaque to the
/// statement layer.
pub trait Connection {
    fn send_sql(&self, sql: &str) -> Result<SqlResult>;

    fn send_insert(&self, insert: &CrudInsert) -> Result<DbResult>;

    fn send_update(&self, update: &CrudUpdate) -> Result<DbResult>;

    fn send_delete(&self, delete: &CrudDelete) -> Result<DbResult>;

    fn send_find(&self, find: &CrudFind) -> Result<DbResult>;

    /// Executes an administrative command in the given namespace.
    fn execute_admin(
        &self,
        namespace: &str,
        command: &str,
        must_succeed: bool,
        args: &Value,
    ) -> Result<DbResult>;
}
