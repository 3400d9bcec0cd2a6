//! Reads a CANboat-style XML dialect into in-memory message definitions.
//!
//! The parser is deliberately forgiving about field-level oddities (they are
//! normalized or inferred) and strict about structural ones: a `PGNInfo`
//! without a usable `<PGN>` or `<Length>` aborts the parse.
use log::warn;
use roxmltree::{Document, Node};

use crate::core::{FieldDefinition, FieldType, LengthType, MessageDefinition};
use crate::error::DialectError;

/// Parse an XML dialect document into message definitions, sorted by PGN
/// ascending. Fields within each message are sorted by their `Order`.
pub fn parse_dialect(xml: &str) -> Result<Vec<MessageDefinition>, DialectError> {
    let doc = Document::parse(xml)?;

    let mut messages = Vec::new();
    for node in doc.root_element().children() {
        if !node.is_element() || node.tag_name().name() != "PGNInfo" {
            continue;
        }
        messages.push(parse_message(&node)?);
    }

    messages.sort_by_key(|m| m.pgn);
    Ok(messages)
}

fn parse_message(node: &Node) -> Result<MessageDefinition, DialectError> {
    let pgn = element_text(node, "PGN")
        .and_then(|t| t.parse::<u32>().ok())
        .ok_or(DialectError::MissingPgn)?;

    let (length_type, fixed_length_bytes) = parse_length(node, pgn)?;

    let priority = match element_text(node, "Priority") {
        Some(text) => Some(parse_number::<u8>("Priority", text)?),
        None => None,
    };

    let mut fields = Vec::new();
    if let Some(container) = child_element(node, "Fields") {
        for field_node in container.children() {
            if !field_node.is_element() || field_node.tag_name().name() != "Field" {
                continue;
            }
            fields.push(parse_field(&field_node)?);
        }
    }
    fields.sort_by_key(|f| f.order);

    Ok(MessageDefinition {
        pgn,
        id: element_text(node, "Id").map(str::to_owned),
        description: element_text(node, "Description").map(str::to_owned),
        priority,
        length_type,
        fixed_length_bytes,
        fields,
    })
}

/// `<Length>` is either an integer byte count or the literal "Variable"
/// (case-insensitive). Anything else is a structural error.
fn parse_length(
    node: &Node,
    pgn: u32,
) -> Result<(LengthType, Option<usize>), DialectError> {
    let text = element_text(node, "Length").unwrap_or("");
    if text.eq_ignore_ascii_case("variable") {
        return Ok((LengthType::Variable, None));
    }
    match text.parse::<usize>() {
        Ok(bytes) => Ok((LengthType::Fixed, Some(bytes))),
        Err(_) => Err(DialectError::InvalidLength {
            pgn,
            text: text.to_owned(),
        }),
    }
}

fn parse_field(node: &Node) -> Result<FieldDefinition, DialectError> {
    let name = element_text(node, "Name").unwrap_or("").to_owned();
    let type_in_pdf = element_text(node, "TypeInPdf").map(str::to_owned);

    let field_type = match element_text(node, "FieldType") {
        Some(text) => match FieldType::from_dialect_name(text) {
            Some(ty) => ty,
            None => {
                warn!("Unknown FieldType {:?} on field {:?}, inferring", text, name);
                infer_field_type(&name, type_in_pdf.as_deref())
            }
        },
        None => infer_field_type(&name, type_in_pdf.as_deref()),
    };

    let order = match element_text(node, "Order") {
        Some(text) => parse_number::<u32>("Order", text)?,
        None => 0,
    };

    Ok(FieldDefinition {
        order,
        id: element_text(node, "Id").map(normalize_field_id),
        name,
        bit_offset: parse_optional::<u32>(node, "BitOffset")?,
        bit_length: parse_optional::<u32>(node, "BitLength")?,
        bit_start: parse_optional::<u32>(node, "BitStart")?,
        signed: element_text(node, "Signed")
            .map(|t| t.eq_ignore_ascii_case("true"))
            .unwrap_or(false),
        field_type,
        resolution: parse_optional::<f64>(node, "Resolution")?.unwrap_or(1.0),
        offset: parse_optional::<f64>(node, "Offset")?.unwrap_or(0.0),
        range_min: parse_optional::<f64>(node, "RangeMin")?,
        range_max: parse_optional::<f64>(node, "RangeMax")?,
        unit: element_text(node, "Unit").map(str::to_owned),
        type_in_pdf,
    })
}

/// Fields without a usable `FieldType`: `TypeInPdf == "Undefined"` and
/// repeat markers announce repetition groups; everything else is numeric.
fn infer_field_type(name: &str, type_in_pdf: Option<&str>) -> FieldType {
    if type_in_pdf == Some("Undefined") || name.to_ascii_lowercase().contains("repeat") {
        FieldType::RepeatMarker
    } else {
        FieldType::Number
    }
}

/// Dialect ids are camelCase; a leading uppercase letter is folded down.
fn normalize_field_id(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {
            let mut out = String::with_capacity(id.len());
            out.push(first.to_ascii_lowercase());
            out.push_str(chars.as_str());
            out
        }
        _ => id.to_owned(),
    }
}

/// Trimmed text content of a direct child element; blank collapses to None.
fn element_text<'a>(node: &Node<'a, '_>, name: &str) -> Option<&'a str> {
    let child = child_element(node, name)?;
    let text = child.text()?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn child_element<'a, 'i>(node: &Node<'a, 'i>, name: &str) -> Option<Node<'a, 'i>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
}

fn parse_optional<T: std::str::FromStr>(
    node: &Node,
    name: &'static str,
) -> Result<Option<T>, DialectError> {
    match element_text(node, name) {
        Some(text) => parse_number(name, text).map(Some),
        None => Ok(None),
    }
}

fn parse_number<T: std::str::FromStr>(
    element: &'static str,
    text: &str,
) -> Result<T, DialectError> {
    text.parse::<T>().map_err(|_| DialectError::InvalidNumber {
        element,
        text: text.to_owned(),
    })
}

//==================================================================================TESTS
#[cfg(test)]
pub(crate) mod fixtures;
