//! Statement builders for the Tandem database wire protocol.
//!
//! Tandem exposes schema-less document collections and relational tables
//! over a single wire protocol. This crate is the statement-construction
//! and validation layer of the client: fluent builders accumulate filter
//! conditions, projections, sort and grouping clauses, update operations
//! and index descriptors, and `execute()` hands one fully validated,
//! canonical descriptor to the transport connection.
//!
//! The expression parser and the transport are external collaborators,
//! consumed through the [`expr::ExprParser`] and [`protocol::Connection`]
//! traits. All structural validation happens here, before anything is
//! sent; transport and parser errors pass through unchanged.
//!
//! # Example
//!
//! ```ignore
//! use tandem_client::Session;
//!
//! let session = Session::new(connection, parser);
//! let docs = session
//!     .schema("store")
//!     .collection("products")
//!     .find()
//!     .filter("price < :max")?
//!     .bind(("max", 100))?
//!     .sort("name")?
//!     .limit(10)
//!     .execute()?;
//! ```

pub mod crud;
pub mod document;
pub mod error;
pub mod expr;
pub mod filter;
pub mod protocol;
pub mod quoting;
pub mod session;
pub mod statement;
pub mod update_op;

#[cfg(test)]
pub(crate) mod test_support;

pub use crud::{Collection, Schema, Table};
pub use document::{Document, IntoDocument};
pub use error::{Error, Result};
pub use filter::{BindArg, Binding, FilterCriteria, LockMode};
pub use protocol::{
    Connection, CrudDelete, CrudFind, CrudInsert, CrudUpdate, DataModel, DbResult, InsertPayload,
    SqlResult, TargetRef, ADMIN_NAMESPACE,
};
pub use quoting::{
    is_quoted_identifier, parse_table_name, quote_identifier, quote_multipart_identifier,
    unquote_identifier, QuoteMode,
};
pub use session::Session;
pub use statement::{
    AddStatement, CreateCollectionIndexStatement, DeleteStatement, FindStatement, InsertStatement,
    IntoFields, ModifyStatement, RemoveStatement, SelectStatement, SqlStatement, UpdateStatement,
};
pub use update_op::{UpdateKind, UpdateOperation, UpdateSource};
