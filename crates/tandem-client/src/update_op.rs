//! Canonical update operations.
//!
//! Modify and update statements accumulate these; each constructor resolves
//! the source path for its own variant. Table-column sets parse a table
//! update-field reference as-is, document-path kinds strip one leading `$`
//! and parse the remainder as a document-field identifier, and a merge
//! patch carries no path at all.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::expr::{ColumnIdent, DocumentPath, ExprParser};

/// Kind of a single update operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    /// Table-column assignment.
    Set,
    /// Set a document item, creating it when absent.
    ItemSet,
    /// Replace a document item only when it exists.
    ItemReplace,
    /// Remove a document item.
    ItemRemove,
    /// Insert a value at an array position.
    ArrayInsert,
    /// Append a value to an array.
    ArrayAppend,
    /// Merge a patch document into the matching documents.
    MergePatch,
}

/// The resolved source of an update operation.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateSource {
    Column(ColumnIdent),
    Path(DocumentPath),
}

/// One canonical (kind, path, value) edit instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOperation {
    pub kind: UpdateKind,
    pub source: UpdateSource,
    /// Absent only for [`UpdateKind::ItemRemove`].
    pub value: Option<Value>,
}

impl UpdateOperation {
    /// Table-column assignment; the field is a table update-field
    /// reference, no `$` handling applies.
    pub(crate) fn table_set(
        parser: &dyn ExprParser,
        field: &str,
        value: Value,
    ) -> Result<Self> {
        let column = parser
            .parse_table_update_field(field)
            .map_err(|_| Error::InvalidUpdatePath {
                path: field.to_string(),
            })?;
        Ok(Self {
            kind: UpdateKind::Set,
            source: UpdateSource::Column(column),
            value: Some(value),
        })
    }

    pub(crate) fn item_set(parser: &dyn ExprParser, path: &str, value: Value) -> Result<Self> {
        Ok(Self {
            kind: UpdateKind::ItemSet,
            source: resolve_document_path(parser, path)?,
            value: Some(value),
        })
    }

    pub(crate) fn item_replace(
        parser: &dyn ExprParser,
        path: &str,
        value: Value,
    ) -> Result<Self> {
        Ok(Self {
            kind: UpdateKind::ItemReplace,
            source: resolve_document_path(parser, path)?,
            value: Some(value),
        })
    }

    pub(crate) fn item_remove(parser: &dyn ExprParser, path: &str) -> Result<Self> {
        Ok(Self {
            kind: UpdateKind::ItemRemove,
            source: resolve_document_path(parser, path)?,
            value: None,
        })
    }

    pub(crate) fn array_insert(
        parser: &dyn ExprParser,
        path: &str,
        value: Value,
    ) -> Result<Self> {
        Ok(Self {
            kind: UpdateKind::ArrayInsert,
            source: resolve_document_path(parser, path)?,
            value: Some(value),
        })
    }

    pub(crate) fn array_append(
        parser: &dyn ExprParser,
        path: &str,
        value: Value,
    ) -> Result<Self> {
        Ok(Self {
            kind: UpdateKind::ArrayAppend,
            source: resolve_document_path(parser, path)?,
            value: Some(value),
        })
    }

    /// Merge patch; carries an empty path and skips path parsing.
    pub(crate) fn merge_patch(value: Value) -> Self {
        Self {
            kind: UpdateKind::MergePatch,
            source: UpdateSource::Path(DocumentPath::default()),
            value: Some(value),
        }
    }
}

fn resolve_document_path(parser: &dyn ExprParser, path: &str) -> Result<UpdateSource> {
    let trimmed = path.strip_prefix('$').unwrap_or(path);
    let resolved = parser
        .parse_document_field(trimmed)
        .map_err(|_| Error::InvalidUpdatePath {
            path: path.to_string(),
        })?;
    Ok(UpdateSource::Path(resolved))
}
