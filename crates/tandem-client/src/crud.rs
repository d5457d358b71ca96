//! Database object handles.
//!
//! A [`Schema`] names a server-side schema; [`Collection`] and [`Table`]
//! name one target inside it and mint the statement builders. The handles
//! are cheap values over a borrowed session and perform no I/O until a
//! statement executes.

use serde_json::{json, Value};
use tracing::debug;

use crate::document::IntoDocument;
use crate::error::{Error, Result};
use crate::protocol::{DbResult, TargetRef, ADMIN_NAMESPACE};
use crate::quoting::quote_multipart_identifier;
use crate::session::Session;
use crate::statement::{
    AddStatement, CreateCollectionIndexStatement, DeleteStatement, FindStatement,
    InsertStatement, IntoFields, ModifyStatement, RemoveStatement, SelectStatement,
    UpdateStatement,
};

const COUNT_TABLES_QUERY: &str = "SELECT COUNT(*) FROM information_schema.tables \
     WHERE table_schema = '{schema}' AND table_name = '{name}'";
const COUNT_VIEWS_QUERY: &str = "SELECT COUNT(*) FROM information_schema.views \
     WHERE table_schema = '{schema}' AND table_name = '{name}'";

/// A client-side handle to a database schema.
pub struct Schema<'a> {
    session: &'a Session,
    name: String,
}

impl<'a> Schema<'a> {
    pub(crate) fn new(session: &'a Session, name: String) -> Self {
        Self { session, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a handle to the named collection.
    pub fn collection(&self, name: impl Into<String>) -> Collection<'a> {
        Collection {
            session: self.session,
            schema: self.name.clone(),
            name: name.into(),
        }
    }

    /// Returns a handle to the named collection, verifying it exists.
    pub fn collection_checked(&self, name: impl Into<String>) -> Result<Collection<'a>> {
        let collection = self.collection(name);
        if !collection.exists_in_database()? {
            return Err(Error::NotFound {
                what: "Collection",
                name: collection.name.clone(),
            });
        }
        Ok(collection)
    }

    /// Returns a handle to the named table.
    pub fn table(&self, name: impl Into<String>) -> Table<'a> {
        Table {
            session: self.session,
            schema: self.name.clone(),
            name: name.into(),
        }
    }

    /// Returns a handle to the named table, verifying it exists.
    pub fn table_checked(&self, name: impl Into<String>) -> Result<Table<'a>> {
        let table = self.table(name);
        if !table.exists_in_database()? {
            return Err(Error::NotFound {
                what: "Table",
                name: table.name.clone(),
            });
        }
        Ok(table)
    }

    /// Creates a collection in this schema and returns a handle to it.
    ///
    /// An existing collection is an error unless `reuse` is set.
    pub fn create_collection(&self, name: &str, reuse: bool) -> Result<Collection<'a>> {
        if name.is_empty() {
            return Err(Error::InvalidCollectionName);
        }
        let collection = self.collection(name);
        if !collection.exists_in_database()? {
            debug!(schema = %self.name, collection = %name, "creating collection");
            self.session.connection().execute_admin(
                ADMIN_NAMESPACE,
                "create_collection",
                true,
                &json!({"schema": self.name, "name": name}),
            )?;
        } else if !reuse {
            return Err(Error::AlreadyExists {
                what: "Collection",
                name: name.to_string(),
            });
        }
        Ok(collection)
    }

    /// Drops a collection. Dropping a collection that does not exist is
    /// not an error.
    pub fn drop_collection(&self, name: &str) -> Result<()> {
        let target = quote_multipart_identifier(&[self.name.as_str(), name], self.session.quote_mode());
        self.session
            .connection()
            .send_sql(&format!("DROP TABLE IF EXISTS {target}"))?;
        Ok(())
    }
}

/// A collection of documents in a schema.
#[derive(Debug)]
pub struct Collection<'a> {
    session: &'a Session,
    schema: String,
    name: String,
}

impl<'a> Collection<'a> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    fn target(&self) -> TargetRef {
        TargetRef::new(self.schema.clone(), self.name.clone())
    }

    /// Whether this collection exists in the database.
    pub fn exists_in_database(&self) -> Result<bool> {
        exists_query(self.session, COUNT_TABLES_QUERY, &self.schema, &self.name)
    }

    /// Starts a document retrieval.
    pub fn find(&self) -> FindStatement<'a> {
        FindStatement::new(self.session, self.target())
    }

    /// Starts a document addition.
    pub fn add(&self) -> AddStatement<'a> {
        AddStatement::new(self.session, self.target())
    }

    /// Starts a document modification.
    pub fn modify(&self) -> ModifyStatement<'a> {
        ModifyStatement::new(self.session, self.target())
    }

    /// Starts a document removal.
    pub fn remove(&self) -> RemoveStatement<'a> {
        RemoveStatement::new(self.session, self.target())
    }

    /// Counts the documents in the collection.
    pub fn count(&self) -> Result<u64> {
        let target =
            quote_multipart_identifier(&[self.schema.as_str(), self.name.as_str()], self.session.quote_mode());
        let result = self
            .session
            .connection()
            .send_sql(&format!("SELECT COUNT(*) FROM {target}"))?;
        Ok(result.scalar().and_then(Value::as_u64).unwrap_or_default())
    }

    /// Starts an index creation over the given descriptor.
    pub fn create_index(
        &self,
        index_name: impl Into<String>,
        descriptor: Value,
    ) -> CreateCollectionIndexStatement<'a> {
        CreateCollectionIndexStatement::new(
            self.session,
            self.target(),
            index_name.into(),
            descriptor,
        )
    }

    /// Drops an index from the collection.
    pub fn drop_index(&self, index_name: &str) -> Result<()> {
        self.session.connection().execute_admin(
            ADMIN_NAMESPACE,
            "drop_collection_index",
            false,
            &json!({"schema": self.schema, "collection": self.name, "name": index_name}),
        )?;
        Ok(())
    }

    /// Replaces the document matching the given id with a new one.
    pub fn replace_one<D: IntoDocument>(&self, doc_id: &str, doc: D) -> Result<DbResult> {
        let doc = doc.into_document()?;
        self.modify()
            .filter("_id = :id")?
            .set("$", doc)?
            .bind(("id", doc_id))?
            .execute()
    }

    /// Upserts the document under the given id.
    pub fn add_or_replace_one<D: IntoDocument>(&self, doc_id: &str, doc: D) -> Result<DbResult> {
        let mut doc = doc.into_document()?;
        doc.insert("_id", doc_id);
        self.add().add(doc)?.upsert(true).execute()
    }

    /// Fetches the document matching the given id.
    pub fn get_one(&self, doc_id: &str) -> Result<DbResult> {
        self.find()
            .filter("_id = :id")?
            .bind(("id", doc_id))?
            .execute()
    }

    /// Removes the document matching the given id.
    pub fn remove_one(&self, doc_id: &str) -> Result<DbResult> {
        self.remove()
            .filter("_id = :id")?
            .bind(("id", doc_id))?
            .execute()
    }
}

/// A relational table in a schema.
pub struct Table<'a> {
    session: &'a Session,
    schema: String,
    name: String,
}

impl<'a> Table<'a> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    fn target(&self) -> TargetRef {
        TargetRef::new(self.schema.clone(), self.name.clone())
    }

    /// Whether this table exists in the database.
    pub fn exists_in_database(&self) -> Result<bool> {
        exists_query(self.session, COUNT_TABLES_QUERY, &self.schema, &self.name)
    }

    /// Starts a record retrieval over the given projection. Pass `()` to
    /// select every column.
    pub fn select<F: IntoFields>(&self, fields: F) -> Result<SelectStatement<'a>> {
        SelectStatement::new(self.session, self.target(), fields.into_fields())
    }

    /// Starts a row insertion.
    pub fn insert(&self) -> InsertStatement<'a> {
        InsertStatement::new(self.session, self.target())
    }

    /// Starts a record update.
    pub fn update(&self) -> UpdateStatement<'a> {
        UpdateStatement::new(self.session, self.target())
    }

    /// Starts a record deletion.
    pub fn delete(&self) -> DeleteStatement<'a> {
        DeleteStatement::new(self.session, self.target())
    }

    /// Counts the rows in the table.
    pub fn count(&self) -> Result<u64> {
        let target =
            quote_multipart_identifier(&[self.schema.as_str(), self.name.as_str()], self.session.quote_mode());
        let result = self
            .session
            .connection()
            .send_sql(&format!("SELECT COUNT(*) FROM {target}"))?;
        Ok(result.scalar().and_then(Value::as_u64).unwrap_or_default())
    }

    /// Whether the underlying object is a view.
    pub fn is_view(&self) -> Result<bool> {
        exists_query(self.session, COUNT_VIEWS_QUERY, &self.schema, &self.name)
    }
}

fn exists_query(session: &Session, query: &str, schema: &str, name: &str) -> Result<bool> {
    let sql = query.replace("{schema}", schema).replace("{name}", name);
    let result = session.connection().send_sql(&sql)?;
    Ok(result.scalar().and_then(Value::as_u64) == Some(1))
}
