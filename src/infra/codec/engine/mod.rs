//! Descriptor-driven serialization/deserialization engine. It drives the
//! bit-level primitives and turns payload bytes into `{pgn, decoded}`
//! envelopes and back, dispatching on each compiled field's type.
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::core::{CompiledField, Envelope, FieldType, LengthType};
use crate::error::{DecodeError, EncodeError};
use crate::infra::codec::bits;
use crate::infra::registry::Registry;

/// Stateless decoder/encoder over a shared compiled registry. Any number of
/// parallel callers may share one parser.
#[derive(Debug, Clone)]
pub struct MessageParser {
    registry: Arc<Registry>,
}

impl MessageParser {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Decode a payload against the registry.
    ///
    /// Returns `None` for a PGN the dialect does not define. Fields past the
    /// end of the payload stop the walk: senders routinely truncate trailing
    /// reserved bytes, and everything already decoded stays valid.
    pub fn decode_to_json(
        &self,
        pgn: u32,
        payload: &[u8],
    ) -> Result<Option<Envelope>, DecodeError> {
        let Some(message) = self.registry.get(pgn) else {
            return Ok(None);
        };

        let payload_bits = (payload.len() * 8) as u32;
        let mut decoded = Map::new();
        for field in &message.fields {
            if field.end_bit() > payload_bits {
                break;
            }
            decode_field(field, payload, &mut decoded)?;
        }

        Ok(Some(Envelope { pgn, decoded }))
    }

    /// Encode a `{pgn, decoded}` JSON value into a payload.
    /// A value without a `decoded` object is rejected.
    pub fn encode_from_json(&self, pgn: u32, envelope: &Value) -> Result<Vec<u8>, EncodeError> {
        let decoded = envelope
            .get("decoded")
            .and_then(Value::as_object)
            .ok_or(EncodeError::MissingDecoded)?;
        self.encode_decoded(pgn, decoded)
    }

    /// Encode a typed envelope into a payload.
    pub fn encode_envelope(&self, envelope: &Envelope) -> Result<Vec<u8>, EncodeError> {
        self.encode_decoded(envelope.pgn, &envelope.decoded)
    }

    fn encode_decoded(
        &self,
        pgn: u32,
        decoded: &Map<String, Value>,
    ) -> Result<Vec<u8>, EncodeError> {
        let message = self
            .registry
            .get(pgn)
            .ok_or(EncodeError::UnknownPgn { pgn })?;

        // Size the payload from the fields that will actually be written.
        let mut required_bits = (message.minimum_length_bytes * 8) as u32;
        for field in &message.fields {
            if field_will_write(field, decoded) {
                required_bits = required_bits.max(field.end_bit());
            }
        }
        let required_bytes = ((required_bits + 7) / 8) as usize;

        let payload_len = match message.length_type {
            LengthType::Fixed => {
                let declared = message.fixed_length_bytes.unwrap_or(0);
                if required_bytes > declared {
                    return Err(EncodeError::PayloadOverflow {
                        pgn,
                        required: required_bytes,
                        declared,
                    });
                }
                declared
            }
            LengthType::Variable => required_bytes,
        };

        // 0xFF is the N2K "unavailable" sentinel.
        let mut payload = vec![0xFF; payload_len];
        for field in &message.fields {
            encode_field(field, &mut payload, decoded)?;
        }
        Ok(payload)
    }
}

/// A field claims payload space when it is reserved, when the envelope
/// names it, or (fixed strings) when the envelope carries its raw spelling.
fn field_will_write(field: &CompiledField, decoded: &Map<String, Value>) -> bool {
    if field.definition.field_type == FieldType::Reserved {
        return true;
    }
    if decoded.contains_key(field.id()) {
        return true;
    }
    field.definition.field_type == FieldType::StringFix
        && decoded.contains_key(&format!("{}Raw", field.id()))
}

//==================================================================================DECODE

/// Read one compiled field out of `payload` into the decoded map.
fn decode_field(
    field: &CompiledField,
    payload: &[u8],
    decoded: &mut Map<String, Value>,
) -> Result<(), DecodeError> {
    match field.definition.field_type {
        FieldType::Number | FieldType::Float => {
            let raw = bits::extract(
                payload,
                field.start_byte,
                field.start_bit,
                field.bytes_to_read,
                field.mask,
                field.definition.signed,
                field.bit_length,
            );
            let value = raw as f64 * field.definition.resolution + field.definition.offset;
            decoded.insert(field.id().to_owned(), json_number(value));
        }
        FieldType::Lookup => {
            // Lookups are raw indices: unsigned, unscaled.
            let raw = bits::extract(
                payload,
                field.start_byte,
                field.start_bit,
                field.bytes_to_read,
                field.mask,
                false,
                field.bit_length,
            );
            decoded.insert(field.id().to_owned(), Value::from(raw));
        }
        FieldType::StringFix => {
            if field.start_bit != 0 {
                return Err(DecodeError::UnalignedString {
                    field: field.id().to_owned(),
                });
            }
            let end = (field.start_byte + field.bytes_to_read).min(payload.len());
            let slice = &payload[field.start_byte.min(end)..end];
            decoded.insert(field.id().to_owned(), Value::from(latin1_to_string(slice)));
        }
        FieldType::Reserved => {}
        // Not part of the compiled fast path; the registry filters them out.
        FieldType::StringLau | FieldType::RepeatMarker => {}
    }
    Ok(())
}

//==================================================================================ENCODE

/// Write one compiled field from the decoded map into `payload`.
fn encode_field(
    field: &CompiledField,
    payload: &mut [u8],
    decoded: &Map<String, Value>,
) -> Result<(), EncodeError> {
    match field.definition.field_type {
        FieldType::Number | FieldType::Float => {
            let Some(value) = decoded.get(field.id()).and_then(Value::as_f64) else {
                return Ok(());
            };
            let raw = unscale(field, value)?;
            bits::insert(
                payload,
                field.start_byte,
                field.start_bit,
                field.bytes_to_read,
                field.mask,
                raw,
            );
        }
        FieldType::Lookup => {
            let Some(value) = decoded.get(field.id()).and_then(Value::as_i64) else {
                return Ok(());
            };
            // Clamp into the unsigned field range.
            let raw = i64::try_from((value.max(0) as u64).min(field.mask)).unwrap_or(i64::MAX);
            bits::insert(
                payload,
                field.start_byte,
                field.start_bit,
                field.bytes_to_read,
                field.mask,
                raw,
            );
        }
        FieldType::StringFix => {
            if field.start_bit != 0 {
                return Err(EncodeError::UnalignedString {
                    field: field.id().to_owned(),
                });
            }
            // Space padding first, then the text, both clipped to the payload.
            let end = (field.start_byte + field.bytes_to_read).min(payload.len());
            if field.start_byte < end {
                payload[field.start_byte..end].fill(0x20);
            }
            let text = decoded
                .get(field.id())
                .or_else(|| decoded.get(&format!("{}Raw", field.id())))
                .and_then(Value::as_str)
                .unwrap_or("");
            if !text.is_empty() {
                let bytes = string_to_latin1(text);
                let copy = bytes.len().min(end.saturating_sub(field.start_byte));
                payload[field.start_byte..field.start_byte + copy]
                    .copy_from_slice(&bytes[..copy]);
            }
        }
        FieldType::Reserved => fill_ones(field, payload),
        FieldType::StringLau | FieldType::RepeatMarker => {}
    }
    Ok(())
}

/// Scale an envelope double back into a raw integer: unscale, round half to
/// even, then clamp into the field's representable range. Rounding runs in
/// i128 so an overshoot clamps instead of wrapping.
fn unscale(field: &CompiledField, value: f64) -> Result<i64, EncodeError> {
    let resolution = field.definition.resolution;
    if resolution == 0.0 {
        return Err(EncodeError::ZeroResolution {
            field: field.id().to_owned(),
        });
    }

    let unscaled = (value - field.definition.offset) / resolution;
    if !unscaled.is_finite() {
        return Err(EncodeError::ValueOutOfRange {
            field: field.id().to_owned(),
            value,
        });
    }

    let rounded = unscaled.round_ties_even();
    if rounded < i64::MIN as f64 || rounded > i64::MAX as f64 {
        return Err(EncodeError::ValueOutOfRange {
            field: field.id().to_owned(),
            value,
        });
    }
    let raw = rounded as i128;
    Ok(raw.clamp(field.raw_min as i128, field.raw_max as i128) as i64)
}

/// Reserved regions encode as all ones. Whole aligned bytes are filled
/// directly; ragged regions go through the bit codec in ≤ 63-bit chunks.
fn fill_ones(field: &CompiledField, payload: &mut [u8]) {
    if field.start_bit == 0 && field.bit_length % 8 == 0 {
        let end = (field.start_byte + (field.bit_length / 8) as usize).min(payload.len());
        if field.start_byte < end {
            payload[field.start_byte..end].fill(0xFF);
        }
        return;
    }

    let mut bit_pos = field.definition.bit_offset.unwrap_or(0);
    let mut remaining = field.bit_length;
    while remaining > 0 {
        let chunk = remaining.min(63);
        let mask = bits::mask_for(chunk);
        bits::insert(
            payload,
            (bit_pos >> 3) as usize,
            bit_pos & 7,
            (((bit_pos & 7) + chunk + 7) / 8) as usize,
            mask,
            mask as i64,
        );
        bit_pos += chunk;
        remaining -= chunk;
    }
}

//==================================================================================STRINGS

/// ISO-8859-1 bytes map one-to-one onto the first 256 code points.
fn latin1_to_string(bytes: &[u8]) -> String {
    let trimmed = {
        let mut end = bytes.len();
        while end > 0 && (bytes[end - 1] == 0x00 || bytes[end - 1] == 0x20) {
            end -= 1;
        }
        &bytes[..end]
    };
    trimmed.iter().map(|&b| b as char).collect()
}

/// Characters outside ISO-8859-1 degrade to '?'.
fn string_to_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) <= 0xFF { c as u8 } else { b'?' })
        .collect()
}

fn json_number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
