//! Defines the data contract between the dialect layer (the scribe) and the
//! serialization/deserialization engine (the interpreter).
//!
//! The dialect parser produces [`MessageDefinition`]s from XML. The registry
//! lowers those into [`CompiledMessage`]s with per-field precomputed
//! constants, and the engine consumes the compiled form to parse or build
//! binary payloads.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Semantic type of a field within a PGN.
/// Mirrors the `FieldType` entries found in the XML dialect.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FieldType {
    /// Signed or unsigned integer; `signed` carries the distinction.
    Number,
    /// Floating-point value. Packed identically to `Number`.
    Float,
    /// Value is an index into a dedicated enumeration. Always unsigned,
    /// never scaled.
    Lookup,
    /// Fixed-length string, ISO-8859-1, NUL/space padded.
    StringFix,
    /// Variable-length string prefixed by length and encoding bytes.
    /// Not part of the compiled fast path.
    StringLau,
    /// Marks the start of a repeating field group. Not part of the compiled
    /// fast path.
    RepeatMarker,
    /// Reserved bits: ignored at read time and set to `1` when writing.
    Reserved,
}

impl FieldType {
    /// Case-insensitive match against the dialect's `FieldType` spelling.
    pub fn from_dialect_name(name: &str) -> Option<Self> {
        let ty = match name.trim().to_ascii_uppercase().as_str() {
            "NUMBER" => Self::Number,
            "FLOAT" => Self::Float,
            "LOOKUP" => Self::Lookup,
            "STRING_FIX" => Self::StringFix,
            "STRING_LAU" => Self::StringLau,
            "REPEAT_MARKER" => Self::RepeatMarker,
            "RESERVED" => Self::Reserved,
            _ => return None,
        };
        Some(ty)
    }

    /// String field types carry text through the envelope instead of numbers.
    pub fn is_string(&self) -> bool {
        matches!(self, Self::StringFix | Self::StringLau)
    }

    /// The dialect's spelling, used by diagnostics and schema metadata.
    pub fn dialect_name(&self) -> &'static str {
        match self {
            Self::Number => "NUMBER",
            Self::Float => "FLOAT",
            Self::Lookup => "LOOKUP",
            Self::StringFix => "STRING_FIX",
            Self::StringLau => "STRING_LAU",
            Self::RepeatMarker => "REPEAT_MARKER",
            Self::Reserved => "RESERVED",
        }
    }
}

/// Whether a message's payload length is declared or sender-dependent.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LengthType {
    /// Payload length is fixed by the dialect (`fixed_length_bytes`).
    Fixed,
    /// Payload length varies; the encoder emits exactly the bytes needed.
    Variable,
}

/// Descriptor for a single PGN field, as read from the dialect.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    /// Position of the field within the message (dialect `Order`).
    pub order: u32,
    /// camelCase identifier; `None` when blank (reserved fields).
    pub id: Option<String>,
    /// Human-readable name.
    pub name: String,
    /// Absolute bit offset of the first bit, from the payload start.
    pub bit_offset: Option<u32>,
    /// Field width in bits.
    pub bit_length: Option<u32>,
    /// Bit position within the starting byte, when the dialect declares it.
    pub bit_start: Option<u32>,
    /// Whether numeric values are two's-complement signed.
    pub signed: bool,
    /// Semantic type driving the processor dispatch.
    pub field_type: FieldType,
    /// Scale factor applied to the raw integer (default 1.0).
    pub resolution: f64,
    /// Offset added after scaling (default 0.0).
    pub offset: f64,
    /// Declared minimum of the scaled value, when trustworthy.
    pub range_min: Option<f64>,
    /// Declared maximum of the scaled value, when trustworthy.
    pub range_max: Option<f64>,
    /// Physical unit (e.g. "rad", "m/s").
    pub unit: Option<String>,
    /// Type string carried verbatim from the source document.
    pub type_in_pdf: Option<String>,
}

/// Descriptor for an entire PGN layout, as read from the dialect.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDefinition {
    /// Parameter Group Number (18 bits).
    pub pgn: u32,
    /// Message identifier (diagnostics, schema titles).
    pub id: Option<String>,
    /// User-facing description.
    pub description: Option<String>,
    /// Default transmit priority.
    pub priority: Option<u8>,
    /// Fixed or variable payload length.
    pub length_type: LengthType,
    /// Declared payload length in bytes; present iff `length_type` is Fixed.
    pub fixed_length_bytes: Option<usize>,
    /// Ordered field list (sorted by `order`).
    pub fields: Vec<FieldDefinition>,
}

/// A field lowered into the constants the bit codec consumes directly.
/// Immutable after compilation.
#[derive(Debug, Clone)]
pub struct CompiledField {
    /// First payload byte touched by the field.
    pub start_byte: usize,
    /// Bit position within `start_byte` (0..8).
    pub start_bit: u32,
    /// Number of bytes covering `start_bit + bit_length`, capped at 8 by
    /// the codec.
    pub bytes_to_read: usize,
    /// Width in bits.
    pub bit_length: u32,
    /// `(1 << bit_length) - 1`, or all ones for 64-bit fields.
    pub mask: u64,
    /// Smallest raw value representable in `bit_length` bits.
    pub raw_min: i64,
    /// Largest raw value representable in `bit_length` bits. Unsigned
    /// 64-bit fields saturate at `i64::MAX`.
    pub raw_max: i64,
    /// The original definition, for downstream uses (schema, diagnostics).
    pub definition: FieldDefinition,
}

impl CompiledField {
    /// Bit offset of the first bit past the field.
    pub fn end_bit(&self) -> u32 {
        self.definition.bit_offset.unwrap_or(0) + self.bit_length
    }

    /// Field identifier; compiled non-reserved fields always carry one.
    pub fn id(&self) -> &str {
        self.definition.id.as_deref().unwrap_or("")
    }
}

/// A message lowered into its compile-time-fixed fields. `StringLau` and
/// repeat markers are dropped from this fast path; the full field list stays
/// reachable through `definition`.
#[derive(Debug, Clone)]
pub struct CompiledMessage {
    /// Parameter Group Number.
    pub pgn: u32,
    /// Fixed or variable payload length.
    pub length_type: LengthType,
    /// Declared payload length; present iff `length_type` is Fixed.
    pub fixed_length_bytes: Option<usize>,
    /// Smallest payload that still covers the latest-ending compiled field.
    pub minimum_length_bytes: usize,
    /// Compile-time fixed fields, in dialect order.
    pub fields: Vec<CompiledField>,
    /// The original definition, for introspection.
    pub definition: MessageDefinition,
}

/// Decoded message envelope: the `{ "pgn": .., "decoded": {..} }` JSON shape
/// exchanged with the application. Numbers are doubles; lookups are
/// integers; strings are ISO-8859-1 text re-encoded as UTF-8.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Parameter Group Number the payload was decoded against.
    pub pgn: u32,
    /// Field id → value map.
    pub decoded: Map<String, Value>,
}

impl Envelope {
    /// Empty envelope for the given PGN.
    pub fn new(pgn: u32) -> Self {
        Self {
            pgn,
            decoded: Map::new(),
        }
    }

    /// Build an envelope from a generic JSON value. Returns `None` when the
    /// value is not an object carrying a `decoded` object.
    pub fn from_value(pgn: u32, value: &Value) -> Option<Self> {
        let decoded = value.get("decoded")?.as_object()?.clone();
        Some(Self { pgn, decoded })
    }
}
