//! The statement builders.
//!
//! Each statement kind is a fluent builder over one target collection or
//! table. Chainable mutators accumulate filter criteria and operation
//! payloads; `execute()` performs the final invariant checks and hands a
//! canonical descriptor to the transport connection.
//!
//! The kinds are:
//!
//! - [`FindStatement`] / [`SelectStatement`] — document and table reads.
//! - [`AddStatement`] / [`InsertStatement`] — document and table inserts.
//! - [`ModifyStatement`] / [`UpdateStatement`] — document and table
//!   updates; both require an explicit filter before execution.
//! - [`RemoveStatement`] / [`DeleteStatement`] — document and table
//!   deletes; same mandatory-filter rule.
//! - [`CreateCollectionIndexStatement`] — collection index creation with
//!   full descriptor validation.
//! - [`SqlStatement`] — raw SQL pass-through.
//!
//! Statement kinds share their filtering vocabulary through an embedded
//! [`crate::filter::FilterCriteria`]; each kind exposes only the mutator
//! subset it supports.

pub mod add;
pub mod create_index;
pub mod delete;
pub mod find;
pub mod insert;
pub mod modify;
pub mod remove;
pub mod select;
pub mod sql;
pub mod update;

pub use add::AddStatement;
pub use create_index::CreateCollectionIndexStatement;
pub use delete::DeleteStatement;
pub use find::FindStatement;
pub use insert::InsertStatement;
pub use modify::ModifyStatement;
pub use remove::RemoveStatement;
pub use select::SelectStatement;
pub use sql::SqlStatement;
pub use update::UpdateStatement;

/// Clause lists passed to fluent mutators: a single clause or a sequence.
pub trait IntoFields {
    fn into_fields(self) -> Vec<String>;
}

impl IntoFields for &str {
    fn into_fields(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoFields for String {
    fn into_fields(self) -> Vec<String> {
        vec![self]
    }
}

impl<S: Into<String>> IntoFields for Vec<S> {
    fn into_fields(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<S: Into<String> + Clone> IntoFields for &[S] {
    fn into_fields(self) -> Vec<String> {
        self.iter().cloned().map(Into::into).collect()
    }
}

impl<S: Into<String>, const N: usize> IntoFields for [S; N] {
    fn into_fields(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

impl IntoFields for () {
    fn into_fields(self) -> Vec<String> {
        Vec::new()
    }
}

/// Generates the filter mutators shared by every filterable statement
/// kind. The expanded methods delegate to the statement's embedded
/// [`crate::filter::FilterCriteria`].
macro_rules! impl_filter_mutators {
    ($stmt:ident, $model:expr, $doc:literal) => {
        impl<'a> $stmt<'a> {
            #[doc = concat!("Sets the search condition to filter the ", $doc, ".")]
            pub fn filter(mut self, condition: &str) -> $crate::error::Result<Self> {
                self.criteria
                    .set_filter(self.session.parser(), $model, condition)?;
                Ok(self)
            }

            #[doc = concat!("Sets the sorting criteria for the ", $doc, ".")]
            pub fn sort<F: $crate::statement::IntoFields>(
                mut self,
                clauses: F,
            ) -> $crate::error::Result<Self> {
                self.criteria
                    .set_sort(self.session.parser(), $model, clauses.into_fields())?;
                Ok(self)
            }

            #[doc = concat!("Sets the maximum number of ", $doc, " to return.")]
            pub fn limit(mut self, row_count: i64) -> Self {
                self.criteria.set_limit(row_count);
                self
            }

            #[doc = concat!("Sets the number of ", $doc, " to skip.")]
            pub fn offset(mut self, offset: i64) -> Self {
                self.criteria.set_offset(offset);
                self
            }

            /// Binds a value to a named placeholder. Accepts one
            /// (name, value) pair, a document, or a JSON object string.
            pub fn bind<B: Into<$crate::filter::BindArg>>(
                mut self,
                arg: B,
            ) -> $crate::error::Result<Self> {
                self.criteria.bind(arg.into())?;
                Ok(self)
            }

            /// The accumulated filter criteria.
            pub fn criteria(&self) -> &$crate::filter::FilterCriteria {
                &self.criteria
            }
        }
    };
}

/// Generates the read-only extensions: grouping, having and row locks.
macro_rules! impl_read_mutators {
    ($stmt:ident, $model:expr) => {
        impl<'a> $stmt<'a> {
            /// Sets a grouping criteria for the result set.
            pub fn group_by<F: $crate::statement::IntoFields>(
                mut self,
                fields: F,
            ) -> $crate::error::Result<Self> {
                self.criteria
                    .set_group_by(self.session.parser(), $model, fields.into_fields())?;
                Ok(self)
            }

            /// Sets a condition over the aggregate functions of the
            /// grouping criteria.
            pub fn having(mut self, condition: &str) -> $crate::error::Result<Self> {
                self.criteria
                    .set_having(self.session.parser(), $model, condition)?;
                Ok(self)
            }

            /// Executes the read with a shared row lock. Only one lock can
            /// be active at a time.
            pub fn lock_shared(mut self) -> Self {
                self.criteria.set_lock($crate::filter::LockMode::Shared);
                self
            }

            /// Executes the read with an exclusive row lock. Only one lock
            /// can be active at a time.
            pub fn lock_exclusive(mut self) -> Self {
                self.criteria.set_lock($crate::filter::LockMode::Exclusive);
                self
            }
        }
    };
}

pub(crate) use impl_filter_mutators;
pub(crate) use impl_read_mutators;
