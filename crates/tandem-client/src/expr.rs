//! Expression-parser collaborator interface.
//!
//! Condition, projection, sort and grouping text is handed to an external
//! parser; this module defines the trait at that seam and the structured
//! values the parser returns. The client only carries these values into
//! descriptors, it never interprets them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::protocol::DataModel;

/// Error raised by the expression parser on malformed text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("parse error at offset {position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// One element of a document path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PathElement {
    /// A named member, `a` in `a.b`.
    Member(String),
    /// An array position, `0` in `a[0]`.
    Index(u32),
    /// A `*` wildcard.
    Wildcard,
}

/// A parsed document-field identifier path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentPath {
    pub elements: Vec<PathElement>,
}

impl DocumentPath {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// A parsed table column reference, optionally table-qualified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnIdent {
    pub table: Option<String>,
    pub name: String,
}

/// A parsed expression tree.
///
/// The variants mirror the wire protocol's expression message; only
/// [`ExprTree::is_identifier`] is ever inspected by this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprTree {
    /// A document-mode identifier.
    Ident(DocumentPath),
    /// A table-mode column reference.
    Column(ColumnIdent),
    /// A literal scalar.
    Literal(Value),
    /// A named placeholder, `:name`.
    Placeholder(String),
    /// An operator application.
    Operator { name: String, args: Vec<ExprTree> },
    /// A function call.
    FunctionCall { name: String, args: Vec<ExprTree> },
}

impl ExprTree {
    /// Whether this expression is a plain identifier, not a computed one.
    pub fn is_identifier(&self) -> bool {
        matches!(self, ExprTree::Ident(_) | ExprTree::Column(_))
    }
}

/// A parsed condition together with the placeholder positions the parser
/// discovered while parsing it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCondition {
    pub expr: ExprTree,
    /// Placeholder name to position within the condition.
    pub placeholders: HashMap<String, usize>,
}

/// Sort direction of one order-spec entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One parsed entry of an order specification.
#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    pub expr: ExprTree,
    pub direction: SortDirection,
}

/// One parsed entry of a projection list.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionItem {
    pub source: ExprTree,
    pub alias: Option<String>,
}

/// The expression parser collaborator.
///
/// Implementations parse in the statement's data model: a field path means
/// a nested document path in [`DataModel::Document`] and a column reference
/// in [`DataModel::Table`]. Projection lists additionally use a
/// mode-specific grammar entry point (document field extraction vs. table
/// select projection).
pub trait ExprParser {
    /// Parses a full condition expression, extracting placeholder positions.
    fn parse_condition(&self, text: &str, model: DataModel)
        -> Result<ParsedCondition, ParseError>;

    /// Parses a comma-separated expression list (grouping criteria).
    fn parse_expr_list(&self, text: &str, model: DataModel)
        -> Result<Vec<ExprTree>, ParseError>;

    /// Parses an order specification list.
    fn parse_order_spec(&self, text: &str, model: DataModel)
        -> Result<Vec<SortSpec>, ParseError>;

    /// Parses a projection list with the mode-specific grammar entry point.
    fn parse_projection(
        &self,
        text: &str,
        model: DataModel,
    ) -> Result<Vec<ProjectionItem>, ParseError>;

    /// Parses a document-field identifier path.
    fn parse_document_field(&self, path: &str) -> Result<DocumentPath, ParseError>;

    /// Parses a table-field reference.
    fn parse_table_field(&self, text: &str) -> Result<ColumnIdent, ParseError>;

    /// Parses a table update-field reference.
    fn parse_table_update_field(&self, text: &str) -> Result<ColumnIdent, ParseError>;
}
