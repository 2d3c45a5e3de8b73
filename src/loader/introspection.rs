//! Introspection results to SDL
//!
//! Remote endpoints and `.json` schema files describe the schema as an
//! introspection result. The validation engine reads SDL, so the result is
//! converted with `cynic-introspection` and printed back into a schema
//! document.

use anyhow::{bail, Context, Result};
use cynic::{Operation, QueryBuilder};
use cynic_introspection::{IntrospectionQuery, Schema, Type};
use serde_json::Value;

static BUILT_IN_DIRECTIVES: &[&str] = &["deprecated", "include", "oneOf", "skip", "specifiedBy"];
static BUILT_IN_SCALARS: &[&str] = &["Boolean", "Float", "ID", "Int", "String"];

/// The operation POSTed to a GraphQL endpoint to fetch its full schema
pub fn introspection_operation() -> Operation<IntrospectionQuery, ()> {
    IntrospectionQuery::build(())
}

/// Extract the introspected schema from an introspection response.
///
/// Accepts a full response (`{"data": {"__schema": ...}}`) or a bare
/// `{"__schema": ...}` object.
pub fn parse_introspection(value: Value) -> Result<Schema> {
    let mut value = value;

    if let Some(errors) = value.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() && value.get("data").is_none_or(Value::is_null) {
            let messages: Vec<&str> = errors
                .iter()
                .filter_map(|error| error.get("message").and_then(Value::as_str))
                .collect();
            bail!("Introspection query failed: {}", messages.join("; "));
        }
    }

    if let Some(data) = value.get_mut("data") {
        value = data.take();
    }
    if value.get("__schema").is_none_or(Value::is_null) {
        bail!("Introspection result has no `__schema` field");
    }

    let query: IntrospectionQuery =
        serde_json::from_value(value).context("Malformed introspection result")?;
    query
        .into_schema()
        .context("Introspection result does not describe a schema")
}

/// Print an introspected schema as SDL, leaving out what the validation
/// engine defines itself
pub fn to_sdl(mut schema: Schema) -> String {
    schema
        .directives
        .retain(|directive| !BUILT_IN_DIRECTIVES.contains(&directive.name.as_str()));

    schema.types.retain(|ty| {
        if let Type::Scalar(scalar) = ty {
            if BUILT_IN_SCALARS.contains(&scalar.name.as_str()) {
                return false;
            }
        }
        !ty.name().starts_with("__")
    });

    schema.to_sdl()
}
