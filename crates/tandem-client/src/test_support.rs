//! In-crate test doubles for the collaborator traits.
//!
//! `MockParser` understands just enough text to exercise the builders:
//! plain dotted identifiers, `:name` placeholders, `desc`/`asc` order
//! suffixes and ` as ` projection aliases. Any text containing `@!` is a
//! parse error. `MockConnection` records every descriptor it receives.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use serde_json::Value;

use crate::error::Result;
use crate::expr::{
    ColumnIdent, DocumentPath, ExprParser, ExprTree, ParseError, ParsedCondition, PathElement,
    ProjectionItem, SortDirection, SortSpec,
};
use crate::protocol::{
    Connection, CrudDelete, CrudFind, CrudInsert, CrudUpdate, DataModel, DbResult, SqlResult,
};
use crate::session::Session;

pub(crate) struct MockParser;

fn check(text: &str) -> std::result::Result<(), ParseError> {
    match text.find("@!") {
        Some(position) => Err(ParseError::new("unexpected token", position)),
        None => Ok(()),
    }
}

fn is_plain_path(text: &str) -> bool {
    !text.is_empty()
        && text.split('.').all(|segment| {
            let mut chars = segment.chars();
            matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
                && chars.all(|c| c.is_alphanumeric() || c == '_')
        })
}

fn document_path(text: &str) -> DocumentPath {
    if text.is_empty() {
        return DocumentPath::default();
    }
    let elements = text
        .split('.')
        .map(|segment| {
            if segment == "*" {
                PathElement::Wildcard
            } else if let Ok(index) = segment.parse::<u32>() {
                PathElement::Index(index)
            } else {
                PathElement::Member(segment.to_string())
            }
        })
        .collect();
    DocumentPath { elements }
}

fn column_ident(text: &str) -> ColumnIdent {
    match text.split_once('.') {
        Some((table, name)) => ColumnIdent {
            table: Some(table.to_string()),
            name: name.to_string(),
        },
        None => ColumnIdent {
            table: None,
            name: text.to_string(),
        },
    }
}

fn expr_of(text: &str, model: DataModel) -> ExprTree {
    let trimmed = text.trim();
    if is_plain_path(trimmed) {
        match model {
            DataModel::Document => ExprTree::Ident(document_path(trimmed)),
            DataModel::Table => ExprTree::Column(column_ident(trimmed)),
        }
    } else {
        ExprTree::Operator {
            name: "expr".to_string(),
            args: vec![ExprTree::Literal(Value::String(trimmed.to_string()))],
        }
    }
}

fn placeholders_of(text: &str) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    let mut rest = text;
    while let Some(at) = rest.find(':') {
        rest = &rest[at + 1..];
        let name: String = rest
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if !name.is_empty() && !map.contains_key(&name) {
            let position = map.len();
            map.insert(name, position);
        }
    }
    map
}

impl ExprParser for MockParser {
    fn parse_condition(
        &self,
        text: &str,
        model: DataModel,
    ) -> std::result::Result<ParsedCondition, ParseError> {
        check(text)?;
        if text.trim().is_empty() {
            return Err(ParseError::new("empty expression", 0));
        }
        Ok(ParsedCondition {
            expr: expr_of(text, model),
            placeholders: placeholders_of(text),
        })
    }

    fn parse_expr_list(
        &self,
        text: &str,
        model: DataModel,
    ) -> std::result::Result<Vec<ExprTree>, ParseError> {
        check(text)?;
        Ok(text
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(|part| expr_of(part, model))
            .collect())
    }

    fn parse_order_spec(
        &self,
        text: &str,
        model: DataModel,
    ) -> std::result::Result<Vec<SortSpec>, ParseError> {
        check(text)?;
        Ok(text
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(|part| {
                let trimmed = part.trim();
                let lower = trimmed.to_lowercase();
                let (head, direction) = if let Some(head) = lower.strip_suffix(" desc") {
                    (&trimmed[..head.len()], SortDirection::Desc)
                } else if let Some(head) = lower.strip_suffix(" asc") {
                    (&trimmed[..head.len()], SortDirection::Asc)
                } else {
                    (trimmed, SortDirection::Asc)
                };
                SortSpec {
                    expr: expr_of(head, model),
                    direction,
                }
            })
            .collect())
    }

    fn parse_projection(
        &self,
        text: &str,
        model: DataModel,
    ) -> std::result::Result<Vec<ProjectionItem>, ParseError> {
        check(text)?;
        Ok(text
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(|part| {
                let trimmed = part.trim();
                match trimmed.split_once(" as ") {
                    Some((source, alias)) => ProjectionItem {
                        source: expr_of(source, model),
                        alias: Some(alias.trim().to_string()),
                    },
                    None => ProjectionItem {
                        source: expr_of(trimmed, model),
                        alias: None,
                    },
                }
            })
            .collect())
    }

    fn parse_document_field(&self, path: &str) -> std::result::Result<DocumentPath, ParseError> {
        check(path)?;
        Ok(document_path(path.trim()))
    }

    fn parse_table_field(&self, text: &str) -> std::result::Result<ColumnIdent, ParseError> {
        check(text)?;
        if !is_plain_path(text.trim()) {
            return Err(ParseError::new("expected a column reference", 0));
        }
        Ok(column_ident(text.trim()))
    }

    fn parse_table_update_field(
        &self,
        text: &str,
    ) -> std::result::Result<ColumnIdent, ParseError> {
        self.parse_table_field(text)
    }
}

/// One operation the mock connection received.
#[derive(Debug)]
pub(crate) enum SentOp {
    Sql(String),
    Insert(CrudInsert),
    Update(CrudUpdate),
    Delete(CrudDelete),
    Find(CrudFind),
    Admin {
        namespace: String,
        command: String,
        must_succeed: bool,
        args: Value,
    },
}

pub(crate) struct MockConnection {
    log: Rc<RefCell<Vec<SentOp>>>,
    sql_rows: RefCell<VecDeque<Vec<Vec<Value>>>>,
}

impl Connection for MockConnection {
    fn send_sql(&self, sql: &str) -> Result<SqlResult> {
        self.log.borrow_mut().push(SentOp::Sql(sql.to_string()));
        let rows = self.sql_rows.borrow_mut().pop_front().unwrap_or_default();
        Ok(SqlResult { rows })
    }

    fn send_insert(&self, insert: &CrudInsert) -> Result<DbResult> {
        self.log.borrow_mut().push(SentOp::Insert(insert.clone()));
        Ok(DbResult::default())
    }

    fn send_update(&self, update: &CrudUpdate) -> Result<DbResult> {
        self.log.borrow_mut().push(SentOp::Update(update.clone()));
        Ok(DbResult::default())
    }

    fn send_delete(&self, delete: &CrudDelete) -> Result<DbResult> {
        self.log.borrow_mut().push(SentOp::Delete(delete.clone()));
        Ok(DbResult::default())
    }

    fn send_find(&self, find: &CrudFind) -> Result<DbResult> {
        self.log.borrow_mut().push(SentOp::Find(find.clone()));
        Ok(DbResult::default())
    }

    fn execute_admin(
        &self,
        namespace: &str,
        command: &str,
        must_succeed: bool,
        args: &Value,
    ) -> Result<DbResult> {
        self.log.borrow_mut().push(SentOp::Admin {
            namespace: namespace.to_string(),
            command: command.to_string(),
            must_succeed,
            args: args.clone(),
        });
        Ok(DbResult::default())
    }
}

/// A session over the mock collaborators, plus the shared operation log.
pub(crate) fn session() -> (Session, Rc<RefCell<Vec<SentOp>>>) {
    session_with_sql_rows(Vec::new())
}

/// Like [`session`], with scripted row sets answered to `send_sql` in
/// order.
pub(crate) fn session_with_sql_rows(
    rows: Vec<Vec<Vec<Value>>>,
) -> (Session, Rc<RefCell<Vec<SentOp>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let connection = MockConnection {
        log: log.clone(),
        sql_rows: RefCell::new(rows.into()),
    };
    let session = Session::new(Box::new(connection), Box::new(MockParser));
    (session, log)
}
