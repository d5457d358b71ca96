//! Session handle owning the collaborator objects.

use crate::crud::Schema;
use crate::expr::ExprParser;
use crate::protocol::Connection;
use crate::quoting::QuoteMode;
use crate::statement::SqlStatement;

/// An established client session.
///
/// Owns the transport connection and the expression parser; statements
/// borrow the session and reach both collaborators through it. The session
/// itself performs no I/O.
pub struct Session {
    connection: Box<dyn Connection>,
    parser: Box<dyn ExprParser>,
    quote_mode: QuoteMode,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("quote_mode", &self.quote_mode)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(connection: Box<dyn Connection>, parser: Box<dyn ExprParser>) -> Self {
        Self {
            connection,
            parser,
            quote_mode: QuoteMode::default(),
        }
    }

    /// Builds a session honoring the server-reported SQL mode, which
    /// selects the identifier-quoting dialect.
    pub fn with_sql_mode(
        connection: Box<dyn Connection>,
        parser: Box<dyn ExprParser>,
        sql_mode: &str,
    ) -> Self {
        Self {
            connection,
            parser,
            quote_mode: QuoteMode::from_sql_mode(sql_mode),
        }
    }

    pub fn quote_mode(&self) -> QuoteMode {
        self.quote_mode
    }

    /// Starts a raw SQL statement.
    pub fn sql(&self, statement: impl Into<String>) -> SqlStatement<'_> {
        SqlStatement::new(self, statement.into())
    }

    /// Returns a handle to the named schema.
    pub fn schema(&self, name: impl Into<String>) -> Schema<'_> {
        Schema::new(self, name.into())
    }

    pub(crate) fn connection(&self) -> &dyn Connection {
        self.connection.as_ref()
    }

    pub(crate) fn parser(&self) -> &dyn ExprParser {
        self.parser.as_ref()
    }
}
