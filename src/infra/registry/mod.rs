//! Lowers parsed message definitions into the immutable registry the codec
//! engine runs against. Compilation happens once; the resulting registry is
//! shared by reference (typically `Arc<Registry>`) across parsers, packers,
//! handlers, and schema generators.
use std::collections::{BTreeMap, HashSet};

use log::warn;

use crate::core::{
    CompiledField, CompiledMessage, FieldType, LengthType, MessageDefinition,
};
use crate::error::{CompileError, RegistryLoadError};
use crate::infra::codec::bits::mask_for;
use crate::infra::dialect::parse_dialect;

/// Immutable catalog of compiled messages, keyed by PGN.
#[derive(Debug)]
pub struct Registry {
    messages: BTreeMap<u32, CompiledMessage>,
}

impl Registry {
    /// Compile definitions into a registry. Field-level problems are dropped
    /// (logged); message-level length contradictions are fatal.
    pub fn compile(definitions: Vec<MessageDefinition>) -> Result<Self, CompileError> {
        let mut messages = BTreeMap::new();
        for definition in definitions {
            let pgn = definition.pgn;
            if messages.contains_key(&pgn) {
                warn!("Duplicate PGN {pgn} in dialect, keeping the first");
                continue;
            }
            messages.insert(pgn, compile_message(definition)?);
        }
        Ok(Self { messages })
    }

    /// Parse and compile a dialect document in one step.
    pub fn from_dialect_xml(xml: &str) -> Result<Self, RegistryLoadError> {
        Ok(Self::compile(parse_dialect(xml)?)?)
    }

    /// Compiled message for a PGN, when the dialect defines one.
    pub fn get(&self, pgn: u32) -> Option<&CompiledMessage> {
        self.messages.get(&pgn)
    }

    /// All compiled messages, PGN ascending.
    pub fn messages(&self) -> impl Iterator<Item = &CompiledMessage> {
        self.messages.values()
    }

    /// All known PGNs, ascending.
    pub fn pgns(&self) -> impl Iterator<Item = u32> + '_ {
        self.messages.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn compile_message(definition: MessageDefinition) -> Result<CompiledMessage, CompileError> {
    let pgn = definition.pgn;
    let mut fields = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for field in &definition.fields {
        // Only compile-time fixed fields enter the fast path.
        let (Some(bit_offset), Some(bit_length)) = (field.bit_offset, field.bit_length) else {
            continue;
        };
        if matches!(
            field.field_type,
            FieldType::StringLau | FieldType::RepeatMarker
        ) {
            continue;
        }

        if field.field_type != FieldType::Reserved {
            let Some(id) = field.id.as_deref().filter(|id| !id.is_empty()) else {
                warn!("PGN {pgn}: dropping field {:?} with blank id", field.name);
                continue;
            };
            // First occurrence wins; later duplicates mask dialect bugs.
            if !seen_ids.insert(id.to_owned()) {
                warn!("PGN {pgn}: dropping duplicate field id {id:?}");
                continue;
            }
        }

        let start_bit = bit_offset & 7;
        let (raw_min, raw_max) = raw_range(field.signed, bit_length);
        fields.push(CompiledField {
            start_byte: (bit_offset >> 3) as usize,
            start_bit,
            bytes_to_read: ((start_bit + bit_length + 7) / 8) as usize,
            bit_length,
            mask: mask_for(bit_length),
            raw_min,
            raw_max,
            definition: field.clone(),
        });
    }

    let minimum_length_bytes = fields
        .iter()
        .map(|f| ((f.end_bit() + 7) / 8) as usize)
        .max()
        .unwrap_or(0);

    if definition.length_type == LengthType::Fixed {
        let declared = definition
            .fixed_length_bytes
            .ok_or(CompileError::MissingFixedLength { pgn })?;
        if declared < minimum_length_bytes {
            return Err(CompileError::DeclaredLengthTooShort {
                pgn,
                declared,
                minimum: minimum_length_bytes,
            });
        }
    }

    Ok(CompiledMessage {
        pgn,
        length_type: definition.length_type,
        fixed_length_bytes: definition.fixed_length_bytes,
        minimum_length_bytes,
        fields,
        definition,
    })
}

/// Representable raw range for a field of the given signedness and width.
/// Raw values travel as `i64`, so an unsigned 64-bit field saturates at
/// `i64::MAX`.
fn raw_range(signed: bool, bit_length: u32) -> (i64, i64) {
    if signed {
        if bit_length >= 64 {
            (i64::MIN, i64::MAX)
        } else {
            (-(1i64 << (bit_length - 1)), (1i64 << (bit_length - 1)) - 1)
        }
    } else {
        let mask = mask_for(bit_length);
        (0, i64::try_from(mask).unwrap_or(i64::MAX))
    }
}
