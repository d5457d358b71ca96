//! Error types for tandem-client.

use miette::Diagnostic;
use thiserror::Error;

use crate::expr::ParseError;

/// Client error type for statement construction and validation.
///
/// Every structural check fails here, before anything is sent on the wire;
/// transport and parser failures outside the checked paths are passed
/// through unchanged.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Invalid condition")]
    #[diagnostic(
        code(tandem_client::invalid_condition),
        help("Check the filter expression syntax")
    )]
    InvalidCondition,

    #[error("Invalid JSON string to bind")]
    #[diagnostic(
        code(tandem_client::invalid_bind),
        help("A bind payload must decode to a JSON object")
    )]
    InvalidBind,

    #[error("Invalid document: {0}")]
    #[diagnostic(
        code(tandem_client::invalid_document),
        help("Documents are built from a JSON object or its text form")
    )]
    InvalidDocument(String),

    #[error("Invalid data for update operation on document collection")]
    #[diagnostic(
        code(tandem_client::invalid_patch),
        help("A patch payload must be a mapping, a document or a JSON string")
    )]
    InvalidPatch,

    #[error("No condition was found for {operation}")]
    #[diagnostic(
        code(tandem_client::no_condition),
        help("Destructive statements require an explicit filter before execute")
    )]
    NoCondition { operation: &'static str },

    #[error("Invalid update path: {path}")]
    #[diagnostic(code(tandem_client::invalid_update_path))]
    InvalidUpdatePath { path: String },

    #[error("The given index name \"{name}\" is not valid")]
    #[diagnostic(
        code(tandem_client::invalid_index_name),
        help("An index name must be a plain identifier")
    )]
    InvalidIndexName { name: String },

    #[error("Required member \"fields\" not found in the given index description")]
    #[diagnostic(code(tandem_client::index_fields_missing))]
    IndexFieldsMissing,

    #[error("Required member \"fields\" must contain a list")]
    #[diagnostic(code(tandem_client::index_fields_not_list))]
    IndexFieldsNotList,

    #[error("Unidentified fields: {fields}")]
    #[diagnostic(code(tandem_client::unidentified_fields))]
    UnidentifiedFields { fields: String },

    #[error("Required inner member \"{member}\" not found in constraint")]
    #[diagnostic(code(tandem_client::missing_constraint_member))]
    MissingConstraintMember { member: &'static str },

    #[error("Unidentified inner fields: {fields}")]
    #[diagnostic(code(tandem_client::unidentified_inner_fields))]
    UnidentifiedConstraintFields { fields: String },

    #[error("Field member \"required\" must be set to true when index type is \"SPATIAL\"")]
    #[diagnostic(code(tandem_client::spatial_field_not_required))]
    SpatialFieldNotRequired,

    #[error("Index type must be set to \"SPATIAL\" when field type is set to \"GEOJSON\"")]
    #[diagnostic(code(tandem_client::geojson_requires_spatial))]
    GeoJsonRequiresSpatial,

    #[error("The \"collation\" member can only be used when field type starts with \"TEXT\"")]
    #[diagnostic(code(tandem_client::collation_not_text))]
    CollationNotText,

    #[error("The \"options\" member can only be used when field type is set to \"GEOJSON\"")]
    #[diagnostic(code(tandem_client::options_require_geojson))]
    OptionsRequireGeoJson,

    #[error("The \"srid\" member can only be used when field type is set to \"GEOJSON\"")]
    #[diagnostic(code(tandem_client::srid_requires_geojson))]
    SridRequiresGeoJson,

    #[error("Unique indexes are not supported")]
    #[diagnostic(code(tandem_client::unique_index))]
    UniqueIndexNotSupported,

    #[error("Collection name is invalid")]
    #[diagnostic(code(tandem_client::invalid_collection_name))]
    InvalidCollectionName,

    #[error("{what} already exists: {name}")]
    #[diagnostic(
        code(tandem_client::already_exists),
        help("Pass reuse = true to get a handle to the existing object")
    )]
    AlreadyExists { what: &'static str, name: String },

    #[error("{what} does not exist: {name}")]
    #[diagnostic(code(tandem_client::not_found))]
    NotFound { what: &'static str, name: String },

    #[error(transparent)]
    #[diagnostic(code(tandem_client::parse))]
    Parse(#[from] ParseError),

    #[error("Transport error: {0}")]
    #[diagnostic(code(tandem_client::transport))]
    Transport(String),
}

/// Result type alias for tandem-client operations.
pub type Result<T> = std::result::Result<T, Error>;
