//! Document update operations on a collection.

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::filter::FilterCriteria;
use crate::protocol::{CrudUpdate, DataModel, DbResult, TargetRef};
use crate::session::Session;
use crate::statement::{impl_filter_mutators, IntoFields};
use crate::update_op::UpdateOperation;

/// A statement updating documents in a collection.
///
/// Update operations accumulate in call order; execution requires an
/// explicit filter.
#[derive(Debug)]
pub struct ModifyStatement<'a> {
    session: &'a Session,
    target: TargetRef,
    criteria: FilterCriteria,
    operations: Vec<UpdateOperation>,
}

impl<'a> ModifyStatement<'a> {
    pub(crate) fn new(session: &'a Session, target: TargetRef) -> Self {
        Self {
            session,
            target,
            criteria: FilterCriteria::new(),
            operations: Vec::new(),
        }
    }

    /// Sets or creates the attribute at the document path.
    pub fn set<V: Into<Value>>(mut self, doc_path: &str, value: V) -> Result<Self> {
        self.operations.push(UpdateOperation::item_set(
            self.session.parser(),
            doc_path,
            value.into(),
        )?);
        Ok(self)
    }

    /// Updates the attribute at the document path only when it exists.
    pub fn change<V: Into<Value>>(mut self, doc_path: &str, value: V) -> Result<Self> {
        self.operations.push(UpdateOperation::item_replace(
            self.session.parser(),
            doc_path,
            value.into(),
        )?);
        Ok(self)
    }

    /// Removes the attributes at the given document paths.
    pub fn unset<F: IntoFields>(mut self, doc_paths: F) -> Result<Self> {
        for path in doc_paths.into_fields() {
            self.operations
                .push(UpdateOperation::item_remove(self.session.parser(), &path)?);
        }
        Ok(self)
    }

    /// Inserts a value at the array position named by the document path.
    pub fn array_insert<V: Into<Value>>(mut self, field: &str, value: V) -> Result<Self> {
        self.operations.push(UpdateOperation::array_insert(
            self.session.parser(),
            field,
            value.into(),
        )?);
        Ok(self)
    }

    /// Appends a value to the array attribute at the document path.
    pub fn array_append<V: Into<Value>>(mut self, doc_path: &str, value: V) -> Result<Self> {
        self.operations.push(UpdateOperation::array_append(
            self.session.parser(),
            doc_path,
            value.into(),
        )?);
        Ok(self)
    }

    /// Merges a patch into the matching documents.
    ///
    /// The payload must be a mapping, a document or a JSON string; null is
    /// treated as an empty value. Anything else fails before an operation
    /// is constructed.
    pub fn patch<V: Into<Value>>(mut self, doc: V) -> Result<Self> {
        let value = match doc.into() {
            Value::Null => Value::String(String::new()),
            value @ (Value::Object(_) | Value::String(_)) => value,
            _ => return Err(Error::InvalidPatch),
        };
        self.operations.push(UpdateOperation::merge_patch(value));
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
                operation: "modify",
            });
        }
        debug!(
            schema = %self.target.schema,
            collection = %self.target.name,
            operations = self.operations.len(),
            "executing modify"
        );
        self.session.connection().send_update(&CrudUpdate {
            target: self.target.clone(),
            data_model: DataModel::Document,
            criteria: self.criteria.clone(),
            operations: self.operations.clone(),
        })
    }
}

impl_filter_mutators!(ModifyStatement, DataModel::Document, "documents");
