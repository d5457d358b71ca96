//! Collection index creation.
//!
//! The index descriptor arrives as a raw JSON object and goes through a
//! staged validation: index name, `fields` member, uniqueness, unconsumed
//! top-level keys, per-field constraint rules, unconsumed inner keys. Only
//! a descriptor that passes every stage is serialized into the canonical
//! argument structure and sent as an administrative command.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::protocol::{DataModel, DbResult, TargetRef, ADMIN_NAMESPACE};
use crate::session::Session;

const TOP_LEVEL_MEMBERS: [&str; 3] = ["fields", "type", "unique"];
const CONSTRAINT_MEMBERS: [&str; 6] = ["field", "type", "required", "collation", "options", "srid"];

/// Canonical, validated index-creation arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexArgs {
    pub name: String,
    pub collection: String,
    pub schema: String,
    #[serde(rename = "type")]
    pub index_type: String,
    pub unique: bool,
    pub constraint: Vec<IndexConstraint>,
}

/// One validated field constraint of an index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexConstraint {
    pub member: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub srid: Option<Value>,
}

/// A statement creating an index on a collection.
pub struct CreateCollectionIndexStatement<'a> {
    session: &'a Session,
    target: TargetRef,
    index_name: String,
    descriptor: Value,
}

impl<'a> CreateCollectionIndexStatement<'a> {
    pub(crate) fn new(
        session: &'a Session,
        target: TargetRef,
        index_name: String,
        descriptor: Value,
    ) -> Self {
        Self {
            session,
            target,
            index_name,
            descriptor,
        }
    }

    /// Validates the descriptor and produces the canonical arguments.
    ///
    /// The raw descriptor is never mutated; consumed keys are tracked
    /// against the recognized member lists and anything left over is
    /// reported by name.
    pub fn validate(&self) -> Result<IndexArgs> {
        let parsed = self
            .session
            .parser()
            .parse_condition(&self.index_name, DataModel::Document)
            .map_err(|_| Error::InvalidIndexName {
                name: self.index_name.clone(),
            })?;
        if !parsed.expr.is_identifier() {
            return Err(Error::InvalidIndexName {
                name: self.index_name.clone(),
            });
        }

        let empty = Map::new();
        let desc = self.descriptor.as_object().unwrap_or(&empty);

        let raw_fields = match desc.get("fields") {
            None | Some(Value::Null) => return Err(Error::IndexFieldsMissing),
            Some(Value::Array(entries)) if entries.is_empty() => {
                return Err(Error::IndexFieldsMissing)
            }
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(Error::IndexFieldsNotList),
        };

        let index_type = desc
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("INDEX")
            .to_string();
        let unique = desc.get("unique").and_then(Value::as_bool).unwrap_or(false);
        if unique {
            return Err(Error::UniqueIndexNotSupported);
        }

        let unidentified: Vec<&str> = desc
            .keys()
            .map(String::as_str)
            .filter(|key| !TOP_LEVEL_MEMBERS.contains(key))
            .collect();
        if !unidentified.is_empty() {
            return Err(Error::UnidentifiedFields {
                fields: unidentified.join(", "),
            });
        }

        let index_type_upper = index_type.to_uppercase();
        let mut constraints = Vec::with_capacity(raw_fields.len());
        for entry in raw_fields {
            let entry = entry.as_object().unwrap_or(&empty);
            let member = entry
                .get("field")
                .ok_or(Error::MissingConstraintMember { member: "field" })?;
            let field_type = entry
                .get("type")
                .ok_or(Error::MissingConstraintMember { member: "type" })?;
            let member = text_of(member);
            let field_type = text_of(field_type);
            let required = entry
                .get("required")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            let field_type_upper = field_type.to_uppercase();

            if index_type_upper == "SPATIAL" && !required {
                return Err(Error::SpatialFieldNotRequired);
            }
            if index_type_upper == "INDEX" && field_type_upper == "GEOJSON" {
                return Err(Error::GeoJsonRequiresSpatial);
            }
            let collation = match entry.get("collation") {
                Some(value) => {
                    if !field_type_upper.starts_with("TEXT") {
                        return Err(Error::CollationNotText);
                    }
                    Some(text_of(value))
                }
                None => None,
            };
            let options = match entry.get("options") {
                Some(value) => {
                    if field_type_upper != "GEOJSON" {
                        return Err(Error::OptionsRequireGeoJson);
                    }
                    Some(value.clone())
                }
                None => None,
            };
            let srid = match entry.get("srid") {
                Some(value) => {
                    if field_type_upper != "GEOJSON" {
                        return Err(Error::SridRequiresGeoJson);
                    }
                    Some(value.clone())
                }
                None => None,
            };

            trace!(member = %member, field_type = %field_type, "validated index constraint");
            constraints.push(IndexConstraint {
                member,
                field_type,
                required,
                collation,
                options,
                srid,
            });
        }

        for entry in raw_fields {
            let entry = entry.as_object().unwrap_or(&empty);
            let unidentified: Vec<&str> = entry
                .keys()
                .map(String::as_str)
                .filter(|key| !CONSTRAINT_MEMBERS.contains(key))
                .collect();
            if !unidentified.is_empty() {
                return Err(Error::UnidentifiedConstraintFields {
                    fields: unidentified.join(", "),
                });
            }
        }

        Ok(IndexArgs {
            name: self.index_name.clone(),
            collection: self.target.name.clone(),
            schema: self.target.schema.clone(),
            index_type,
            unique,
            constraint: constraints,
        })
    }

    /// Validates the descriptor and executes the administrative command.
    pub fn execute(&self) -> Result<DbResult> {
        let args = self.validate()?;
        debug!(
            schema = %self.target.schema,
            collection = %self.target.name,
            index = %self.index_name,
            "creating collection index"
        );
        let args = serde_json::to_value(&args).unwrap_or(Value::Null);
        self.session.connection().execute_admin(
            ADMIN_NAMESPACE,
            "create_collection_index",
            true,
            &args,
        )
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support::{session, SentOp};

    fn statement<'a>(session: &'a Session, name: &str, descriptor: Value) -> CreateCollectionIndexStatement<'a> {
        CreateCollectionIndexStatement::new(
            session,
            TargetRef::new("s", "coll"),
            name.to_string(),
            descriptor,
        )
    }

    #[test]
    fn well_formed_spatial_descriptor_passes() {
        let (session, log) = session();
        let stmt = statement(
            &session,
            "geo_idx",
            json!({
                "type": "SPATIAL",
                "fields": [
                    {"field": "$.a", "type": "GEOJSON", "required": true,
                     "options": 2, "srid": 4326},
                    {"field": "$.b", "type": "GEOJSON", "required": true}
                ]
            }),
        );
        let args = stmt.validate().unwrap();
        assert_eq!(args.index_type, "SPATIAL");
        assert_eq!(args.constraint.len(), 2);
        assert_eq!(args.constraint[0].member, "$.a");
        assert_eq!(args.constraint[1].member, "$.b");
        assert!(!args.unique);

        stmt.execute().unwrap();
        let ops = log.borrow();
        match &ops[0] {
            SentOp::Admin {
                namespace,
                command,
                must_succeed,
                args,
            } => {
                assert_eq!(namespace, ADMIN_NAMESPACE);
                assert_eq!(command, "create_collection_index");
                assert!(*must_succeed);
                assert_eq!(args["name"], json!("geo_idx"));
                assert_eq!(args["collection"], json!("coll"));
                assert_eq!(args["schema"], json!("s"));
                assert_eq!(args["constraint"].as_array().map(Vec::len), Some(2));
            }
            other => panic!("expected an admin command, got {other:?}"),
        }
    }

    #[test]
    fn plain_index_descriptor_passes() {
        let (session, _log) = session();
        let stmt = statement(
            &session,
            "name_idx",
            json!({"fields": [{"field": "$.name", "type": "TEXT(64)"}]}),
        );
        let args = stmt.validate().unwrap();
        assert_eq!(args.index_type, "INDEX");
        assert!(!args.constraint[0].required);
    }

    #[test]
    fn computed_index_name_is_rejected() {
        let (session, _log) = session();
        for name in ["", "1idx", "concat(a)"] {
            let stmt = statement(&session, name, json!({"fields": [{"field": "$.a", "type": "INT"}]}));
            assert!(matches!(
                stmt.validate(),
                Err(Error::InvalidIndexName { .. })
            ));
        }
    }

    #[test]
    fn missing_or_empty_fields_member_is_rejected() {
        let (session, _log) = session();
        let stmt = statement(&session, "idx", json!({"type": "INDEX"}));
        assert!(matches!(stmt.validate(), Err(Error::IndexFieldsMissing)));

        let stmt = statement(&session, "idx", json!({"fields": []}));
        assert!(matches!(stmt.validate(), Err(Error::IndexFieldsMissing)));

        let stmt = statement(&session, "idx", json!({"fields": "oops"}));
        assert!(matches!(stmt.validate(), Err(Error::IndexFieldsNotList)));
    }

    #[test]
    fn unique_index_is_not_supported() {
        let (session, _log) = session();
        let stmt = statement(
            &session,
            "idx",
            json!({"unique": true, "fields": [{"field": "$.a", "type": "INT"}]}),
        );
        assert!(matches!(
            stmt.validate(),
            Err(Error::UniqueIndexNotSupported)
        ));
    }

    #[test]
    fn unidentified_top_level_key_is_named() {
        let (session, _log) = session();
        let stmt = statement(
            &session,
            "idx",
            json!({"fields": [{"field": "$.a", "type": "INT"}], "sparse": true}),
        );
        match stmt.validate() {
            Err(Error::UnidentifiedFields { fields }) => assert_eq!(fields, "sparse"),
            other => panic!("expected unidentified fields, got {other:?}"),
        }
    }

    #[test]
    fn missing_constraint_member_is_named() {
        let (session, _log) = session();
        let stmt = statement(&session, "idx", json!({"fields": [{"type": "INT"}]}));
        assert!(matches!(
            stmt.validate(),
            Err(Error::MissingConstraintMember { member: "field" })
        ));

        let stmt = statement(&session, "idx", json!({"fields": [{"field": "$.a"}]}));
        assert!(matches!(
            stmt.validate(),
            Err(Error::MissingConstraintMember { member: "type" })
        ));
    }

    #[test]
    fn spatial_index_requires_required_fields() {
        let (session, _log) = session();
        let stmt = statement(
            &session,
            "idx",
            json!({
                "type": "SPATIAL",
                "fields": [{"field": "$.a", "type": "GEOJSON", "required": false}]
            }),
        );
        assert!(matches!(
            stmt.validate(),
            Err(Error::SpatialFieldNotRequired)
        ));
    }

    #[test]
    fn geojson_field_requires_spatial_index() {
        let (session, _log) = session();
        let stmt = statement(
            &session,
            "idx",
            json!({"fields": [{"field": "$.a", "type": "GEOJSON", "required": true}]}),
        );
        assert!(matches!(stmt.validate(), Err(Error::GeoJsonRequiresSpatial)));
    }

    #[test]
    fn collation_requires_text_field() {
        let (session, _log) = session();
        let stmt = statement(
            &session,
            "idx",
            json!({"fields": [{"field": "$.a", "type": "INT", "collation": "utf8_bin"}]}),
        );
        assert!(matches!(stmt.validate(), Err(Error::CollationNotText)));

        let stmt = statement(
            &session,
            "idx",
            json!({"fields": [{"field": "$.a", "type": "TEXT(32)", "collation": "utf8_bin"}]}),
        );
        let args = stmt.validate().unwrap();
        assert_eq!(args.constraint[0].collation.as_deref(), Some("utf8_bin"));
    }

    #[test]
    fn options_and_srid_require_geojson_field() {
        let (session, _log) = session();
        let stmt = statement(
            &session,
            "idx",
            json!({"fields": [{"field": "$.a", "type": "INT", "options": 2}]}),
        );
        assert!(matches!(stmt.validate(), Err(Error::OptionsRequireGeoJson)));

        let stmt = statement(
            &session,
            "idx",
            json!({"fields": [{"field": "$.a", "type": "INT", "srid": 4326}]}),
        );
        assert!(matches!(stmt.validate(), Err(Error::SridRequiresGeoJson)));
    }

    #[test]
    fn unidentified_inner_key_is_named() {
        let (session, _log) = session();
        let stmt = statement(
            &session,
            "idx",
            json!({"fields": [{"field": "$.a", "type": "INT", "nullable": true}]}),
        );
        match stmt.validate() {
            Err(Error::UnidentifiedConstraintFields { fields }) => {
                assert_eq!(fields, "nullable");
            }
            other => panic!("expected unidentified inner fields, got {other:?}"),
        }
    }

    #[test]
    fn constraint_rule_violations_win_over_inner_leftovers() {
        // The per-field rules run over every entry before leftover inner
        // keys are reported.
        let (session, _log) = session();
        let stmt = statement(
            &session,
            "idx",
            json!({"fields": [
                {"field": "$.a", "type": "INT", "bogus": 1},
                {"field": "$.b"}
            ]}),
        );
        assert!(matches!(
            stmt.validate(),
            Err(Error::MissingConstraintMember { member: "type" })
        ));
    }

    #[test]
    fn nothing_is_sent_for_an_invalid_descriptor() {
        let (session, log) = session();
        let stmt = statement(&session, "idx", json!({"fields": []}));
        assert!(stmt.execute().is_err());
        assert!(log.borrow().is_empty());
    }
}
