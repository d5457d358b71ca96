//! Identifier quoting and table-name parsing.
//!
//! The server reports its SQL mode as a comma-separated string; the only
//! part this layer cares about is whether `ANSI_QUOTES` is active, which
//! switches the quote character from a backtick to a double quote.

/// Identifier-quoting dialect, derived once from the server SQL mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteMode {
    /// Backtick quoting, the server default.
    #[default]
    Backtick,
    /// Double-quote quoting, active when the SQL mode contains `ANSI_QUOTES`.
    AnsiQuotes,
}

impl QuoteMode {
    /// Derives the quoting dialect from a server SQL-mode string.
    pub fn from_sql_mode(sql_mode: &str) -> Self {
        if sql_mode.contains("ANSI_QUOTES") {
            QuoteMode::AnsiQuotes
        } else {
            QuoteMode::Backtick
        }
    }

    fn quote_char(self) -> char {
        match self {
            QuoteMode::Backtick => '`',
            QuoteMode::AnsiQuotes => '"',
        }
    }
}

/// Checks whether the given identifier is already quoted.
///
/// Under [`QuoteMode::AnsiQuotes`] both backtick and double-quote wrapping
/// count as quoted; otherwise only backtick wrapping does. An identifier
/// shorter than two characters is never quoted.
pub fn is_quoted_identifier(identifier: &str, mode: QuoteMode) -> bool {
    let wrapped = |quote: char| {
        identifier.len() >= 2 && identifier.starts_with(quote) && identifier.ends_with(quote)
    };
    match mode {
        QuoteMode::AnsiQuotes => wrapped('`') || wrapped('"'),
        QuoteMode::Backtick => wrapped('`'),
    }
}

/// Quotes the given identifier with the mode's quote character, doubling
/// any embedded quote character. An already-quoted identifier is returned
/// unchanged, and an empty identifier quotes to `` `` ``.
pub fn quote_identifier(identifier: &str, mode: QuoteMode) -> String {
    if identifier.is_empty() {
        return "``".to_string();
    }
    if is_quoted_identifier(identifier, mode) {
        return identifier.to_string();
    }
    let quote = mode.quote_char();
    let doubled = identifier.replace(quote, &format!("{quote}{quote}"));
    format!("{quote}{doubled}{quote}")
}

/// Quotes a multi-part identifier, joining the quoted parts with `.`.
pub fn quote_multipart_identifier<S: AsRef<str>>(parts: &[S], mode: QuoteMode) -> String {
    parts
        .iter()
        .map(|part| quote_identifier(part.as_ref(), mode))
        .collect::<Vec<_>>()
        .join(".")
}

/// Removes the quoting from an identifier, un-doubling embedded quote
/// characters. An unquoted identifier is returned unchanged.
pub fn unquote_identifier(identifier: &str, mode: QuoteMode) -> String {
    if !is_quoted_identifier(identifier, mode) {
        return identifier.to_string();
    }
    // is_quoted_identifier guarantees a wrapping pair exists.
    let quote = identifier.chars().next().unwrap_or('`');
    let inner = &identifier[1..identifier.len() - 1];
    inner.replace(&format!("{quote}{quote}"), &quote.to_string())
}

/// Splits a possibly schema-qualified, possibly quoted table reference into
/// `(schema, table)`.
///
/// The split happens once, on a `.` immediately followed by the active quote
/// character when that character occurs in the text, or on a plain `.`
/// otherwise. Without a separator the default schema is used.
pub fn parse_table_name(default_schema: &str, table_name: &str, mode: QuoteMode) -> (String, String) {
    let quote = mode.quote_char();
    let delimiter = if table_name.contains(quote) {
        format!(".{quote}")
    } else {
        ".".to_string()
    };
    match table_name.split_once(&delimiter) {
        None => (
            default_schema.to_string(),
            strip_quotes(table_name, quote),
        ),
        Some((schema, table)) => (strip_quotes(schema, quote), strip_quotes(table, quote)),
    }
}

fn strip_quotes(part: &str, quote: char) -> String {
    part.trim_matches(quote)
        .replace(&format!("{quote}{quote}"), &quote.to_string())
}
