//! Shared filter-criteria state for filterable statements.
//!
//! Every statement kind that supports filtering owns one [`FilterCriteria`]
//! and surfaces the mutator subset it supports. Mutators that consult the
//! expression parser fail at the offending call; nothing invalid is ever
//! stored.

use std::collections::HashMap;

use serde_json::Value;
use tracing::trace;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::expr::{ExprParser, ExprTree, ProjectionItem, SortSpec};
use crate::protocol::DataModel;

/// Row-lock mode of a read statement. A single field makes the
/// shared/exclusive exclusivity structural: setting one replaces the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockMode {
    #[default]
    None,
    Shared,
    Exclusive,
}

/// One named bind value.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub value: Value,
}

/// A bind payload, decoded once at the call boundary.
#[derive(Debug, Clone)]
pub enum BindArg {
    /// One (placeholder, value) pair.
    Pair { name: String, value: Value },
    /// A document whose fields are each registered as a binding.
    Doc(Document),
    /// JSON text that must decode to an object; each key/value pair is
    /// registered as a binding.
    Json(String),
}

impl<N: Into<String>, V: Into<Value>> From<(N, V)> for BindArg {
    fn from((name, value): (N, V)) -> Self {
        BindArg::Pair {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl From<Document> for BindArg {
    fn from(doc: Document) -> Self {
        BindArg::Doc(doc)
    }
}

impl From<&str> for BindArg {
    fn from(json: &str) -> Self {
        BindArg::Json(json.to_string())
    }
}

impl From<String> for BindArg {
    fn from(json: String) -> Self {
        BindArg::Json(json)
    }
}

/// Filter state shared by every filterable statement kind.
///
/// Raw clause text is kept next to its parsed form: the text feeds SQL
/// generation, the parsed form feeds the wire descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    condition: Option<String>,
    condition_expr: Option<ExprTree>,
    placeholder_map: HashMap<String, usize>,
    bindings: Vec<Binding>,
    sort_str: Option<String>,
    sort_spec: Vec<SortSpec>,
    row_count: i64,
    offset: i64,
    has_limit: bool,
    grouping_str: Option<String>,
    grouping: Vec<ExprTree>,
    having_str: Option<String>,
    having: Option<ExprTree>,
    projection_str: Option<String>,
    projection: Vec<ProjectionItem>,
    lock_mode: LockMode,
}

impl FilterCriteria {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Parses and stores the filter condition.
    ///
    /// The has-filter flag is set only on a successful parse.
    pub(crate) fn set_filter(
        &mut self,
        parser: &dyn ExprParser,
        model: DataModel,
        condition: &str,
    ) -> Result<()> {
        let parsed = parser
            .parse_condition(condition, model)
            .map_err(|_| Error::InvalidCondition)?;
        self.condition = Some(condition.to_string());
        self.condition_expr = Some(parsed.expr);
        self.placeholder_map = parsed.placeholders;
        Ok(())
    }

    pub(crate) fn set_limit(&mut self, row_count: i64) {
        self.row_count = row_count;
        self.has_limit = true;
    }

    pub(crate) fn set_offset(&mut self, offset: i64) {
        self.offset = offset;
    }

    pub(crate) fn set_sort(
        &mut self,
        parser: &dyn ExprParser,
        model: DataModel,
        clauses: Vec<String>,
    ) -> Result<()> {
        let joined = clauses.join(",");
        self.sort_spec = parser.parse_order_spec(&joined, model)?;
        self.sort_str = Some(joined);
        Ok(())
    }

    pub(crate) fn set_group_by(
        &mut self,
        parser: &dyn ExprParser,
        model: DataModel,
        fields: Vec<String>,
    ) -> Result<()> {
        let joined = fields.join(",");
        self.grouping = parser.parse_expr_list(&joined, model)?;
        self.grouping_str = Some(joined);
        Ok(())
    }

    pub(crate) fn set_having(
        &mut self,
        parser: &dyn ExprParser,
        model: DataModel,
        condition: &str,
    ) -> Result<()> {
        let parsed = parser.parse_condition(condition, model)?;
        self.having = Some(parsed.expr);
        self.having_str = Some(condition.to_string());
        Ok(())
    }

    pub(crate) fn set_projection(
        &mut self,
        parser: &dyn ExprParser,
        model: DataModel,
        fields: Vec<String>,
    ) -> Result<()> {
        let joined = fields.join(",");
        self.projection = parser.parse_projection(&joined, model)?;
        self.projection_str = Some(joined);
        Ok(())
    }

    /// Registers bind values.
    ///
    /// Binding before the condition is legal; names are associated with
    /// positions by the transport at execute time.
    pub(crate) fn bind(&mut self, arg: BindArg) -> Result<()> {
        match arg {
            BindArg::Pair { name, value } => {
                trace!(placeholder = %name, "registering binding");
                self.bindings.push(Binding { name, value });
            }
            BindArg::Doc(doc) => {
                for (name, value) in doc.iter() {
                    self.bindings.push(Binding {
                        name: name.clone(),
                        value: value.clone(),
                    });
                }
            }
            BindArg::Json(text) => {
                let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&text) else {
                    return Err(Error::InvalidBind);
                };
                for (name, value) in map {
                    self.bindings.push(Binding { name, value });
                }
            }
        }
        Ok(())
    }

    pub(crate) fn set_lock(&mut self, mode: LockMode) {
        self.lock_mode = mode;
    }

    pub fn has_filter(&self) -> bool {
        self.condition.is_some()
    }

    pub fn has_limit(&self) -> bool {
        self.has_limit
    }

    pub fn has_sort(&self) -> bool {
        self.sort_str.is_some()
    }

    pub fn has_group_by(&self) -> bool {
        self.grouping_str.is_some()
    }

    pub fn has_having(&self) -> bool {
        self.having_str.is_some()
    }

    pub fn has_projection(&self) -> bool {
        self.projection_str.is_some()
    }

    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    pub fn condition_expr(&self) -> Option<&ExprTree> {
        self.condition_expr.as_ref()
    }

    pub fn placeholder_map(&self) -> &HashMap<String, usize> {
        &self.placeholder_map
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn sort_str(&self) -> Option<&str> {
        self.sort_str.as_deref()
    }

    pub fn sort_spec(&self) -> &[SortSpec] {
        &self.sort_spec
    }

    pub fn limit_row_count(&self) -> i64 {
        self.row_count
    }

    pub fn limit_offset(&self) -> i64 {
        self.offset
    }

    pub fn grouping_str(&self) -> Option<&str> {
        self.grouping_str.as_deref()
    }

    pub fn grouping(&self) -> &[ExprTree] {
        &self.grouping
    }

    pub fn having_str(&self) -> Option<&str> {
        self.having_str.as_deref()
    }

    pub fn having(&self) -> Option<&ExprTree> {
        self.having.as_ref()
    }

    pub fn projection_str(&self) -> Option<&str> {
        self.projection_str.as_deref()
    }

    pub fn projection(&self) -> &[ProjectionItem] {
        &self.projection
    }

    pub fn lock_mode(&self) -> LockMode {
        self.lock_mode
    }
}
