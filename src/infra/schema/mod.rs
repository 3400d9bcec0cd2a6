//! Per-PGN JSON-schema generation for envelope validation and
//! introspection. Schemas are draft 2020-12 objects, built lazily on first
//! access and cached for the lifetime of the registry.
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::{json, Map, Value};

use crate::core::{CompiledField, CompiledMessage, FieldType};
use crate::infra::registry::Registry;

/// Lazy, thread-safe schema cache over a compiled registry
/// (single writer, many readers).
#[derive(Debug)]
pub struct SchemaRegistry {
    registry: Arc<Registry>,
    cache: RwLock<HashMap<u32, Arc<Value>>>,
}

impl SchemaRegistry {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Schema for a PGN, or `None` when the dialect does not define it.
    pub fn schema_for(&self, pgn: u32) -> Option<Arc<Value>> {
        if let Some(schema) = self.cache.read().expect("schema cache poisoned").get(&pgn) {
            return Some(Arc::clone(schema));
        }

        let message = self.registry.get(pgn)?;
        let schema = Arc::new(build_schema(message));

        let mut cache = self.cache.write().expect("schema cache poisoned");
        // A racing builder may have inserted meanwhile; both built the same
        // immutable value, keep the first.
        let entry = cache.entry(pgn).or_insert(schema);
        Some(Arc::clone(entry))
    }
}

fn build_schema(message: &CompiledMessage) -> Value {
    let mut title = format!("N2K PGN {}", message.pgn);
    for part in [&message.definition.id, &message.definition.description] {
        if let Some(part) = part {
            title.push(' ');
            title.push_str(part);
        }
    }

    let mut properties = Map::new();
    for field in &message.fields {
        if field.definition.field_type == FieldType::Reserved || field.id().is_empty() {
            continue;
        }
        properties.insert(field.id().to_owned(), field_schema(field));
    }

    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": title,
        "type": "object",
        "properties": {
            "pgn": { "const": message.pgn },
            "decoded": {
                "type": "object",
                "additionalProperties": false,
                "properties": properties,
            },
        },
        "required": ["pgn", "decoded"],
    })
}

fn field_schema(field: &CompiledField) -> Value {
    let definition = &field.definition;
    let ty = definition.field_type;

    let mut schema = Map::new();
    schema.insert(
        "type".to_owned(),
        Value::from(if ty.is_string() { "string" } else { "number" }),
    );

    // Range constraints only where the metadata is trustworthy: scaled
    // numerics with both declared bounds. Lookups and strings validate
    // loosely by design.
    let numeric = !ty.is_string() && ty != FieldType::Lookup;
    if numeric && definition.resolution > 0.0 {
        if let (Some(min), Some(max)) = (definition.range_min, definition.range_max) {
            schema.insert("minimum".to_owned(), json!(min));
            schema.insert("maximum".to_owned(), json!(max));
        }
        schema.insert("multipleOf".to_owned(), json!(definition.resolution));
    }

    schema.insert("x-bitLength".to_owned(), json!(field.bit_length));
    schema.insert(
        "x-bitOffset".to_owned(),
        json!(definition.bit_offset.unwrap_or(0)),
    );
    schema.insert("x-signed".to_owned(), json!(definition.signed));
    schema.insert("x-resolution".to_owned(), json!(definition.resolution));
    schema.insert("x-offset".to_owned(), json!(definition.offset));
    schema.insert("x-unit".to_owned(), json!(definition.unit));
    schema.insert("x-typeInPdf".to_owned(), json!(definition.type_in_pdf));
    schema.insert("x-fieldType".to_owned(), json!(ty.dialect_name()));

    Value::Object(schema)
}
