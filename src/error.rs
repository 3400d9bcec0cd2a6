//! Error definitions shared across library modules.
//! Each type models a specific failure domain (CAN ID construction, dialect
//! parsing, compilation, serialization/deserialization, frame I/O).
use thiserror::Error;

#[derive(Error, Debug)]
/// Errors that can occur while building a 29-bit CAN identifier.
pub enum CanIdError {
    /// J1939 priorities occupy three bits.
    #[error("Priority out of range: {priority} (expected 0..=7)")]
    PriorityOutOfRange { priority: u8 },
    /// In PDU1 the lower 8 bits of the PGN must remain zero.
    #[error("PDU1 PGN {pgn} has a non-zero low byte")]
    NonZeroPdu1Low { pgn: u32 },
}

//==================================================================================DIALECT_ERROR

#[derive(Error, Debug)]
/// Errors raised while reading the XML dialect into message definitions.
pub enum DialectError {
    /// The document is not well-formed XML.
    #[error("Malformed dialect XML: {0}")]
    Xml(#[from] roxmltree::Error),
    /// Every `<PGNInfo>` must carry an integer `<PGN>`.
    #[error("PGNInfo without a valid <PGN> element")]
    MissingPgn,
    /// A numeric element could not be parsed.
    #[error("Invalid number in <{element}>: {text:?}")]
    InvalidNumber { element: &'static str, text: String },
    /// `<Length>` is neither an integer nor "Variable".
    #[error("Invalid <Length> for PGN {pgn}: {text:?}")]
    InvalidLength { pgn: u32, text: String },
}

//==================================================================================COMPILE_ERROR

#[derive(Error, Debug)]
/// Errors detected while lowering message definitions into the registry.
pub enum CompileError {
    /// FIXED messages must declare their payload length.
    #[error("PGN {pgn} is FIXED but declares no length")]
    MissingFixedLength { pgn: u32 },
    /// The declared length cannot hold the latest-ending field.
    #[error("PGN {pgn} declares {declared} bytes but its fields need {minimum}")]
    DeclaredLengthTooShort {
        pgn: u32,
        declared: usize,
        minimum: usize,
    },
}

#[derive(Error, Debug)]
/// Failure while loading a registry straight from dialect XML.
pub enum RegistryLoadError {
    #[error(transparent)]
    Dialect(#[from] DialectError),
    #[error(transparent)]
    Compile(#[from] CompileError),
}

//==================================================================================CODEC_ERROR

#[derive(Error, Debug)]
/// Issues encountered while encoding an envelope into a payload.
pub enum EncodeError {
    /// The registry holds no compiled message for this PGN.
    #[error("Unknown PGN {pgn}")]
    UnknownPgn { pgn: u32 },
    /// The envelope carries no `decoded` object.
    #[error("Envelope has no decoded object")]
    MissingDecoded,
    /// A numeric field with zero resolution cannot be unscaled.
    #[error("Zero resolution on field {field}")]
    ZeroResolution { field: String },
    /// The supplied value does not fit the field's bit width.
    #[error("Value {value} out of range for field {field}")]
    ValueOutOfRange { field: String, value: f64 },
    /// A FIXED message cannot grow past its declared length.
    #[error("PGN {pgn} requires {required} bytes but is declared at {declared}")]
    PayloadOverflow {
        pgn: u32,
        required: usize,
        declared: usize,
    },
    /// Fixed strings must start on a byte boundary.
    #[error("STRING_FIX field {field} is not byte-aligned")]
    UnalignedString { field: String },
}

#[derive(Error, Debug)]
/// Errors raised while decoding a payload into an envelope.
pub enum DecodeError {
    /// Fixed strings must start on a byte boundary.
    #[error("STRING_FIX field {field} is not byte-aligned")]
    UnalignedString { field: String },
}

//==================================================================================FRAME_ERROR

#[derive(Error, Debug)]
/// Failures while constructing or (de)serializing a CAN frame object.
pub enum FrameError {
    /// Extended identifiers are 29 bits, standard ones 11.
    #[error("Identifier {id:#010x} does not fit the frame format")]
    IdTooWide { id: u32 },
    /// The identifier carries kernel flag bits (EFF/RTR/ERR).
    #[error("Identifier {id:#010x} carries flag bits")]
    FlagBitsSet { id: u32 },
    /// Remote-transmission-request and error frames are not data frames.
    #[error("RTR/ERR frame rejected (flags {flags:#010x})")]
    RemoteOrErrorFrame { flags: u32 },
    /// DLC exceeds the CAN-FD maximum of 64.
    #[error("DLC {dlc} out of range")]
    DlcOutOfRange { dlc: usize },
    /// The payload slice is shorter than the declared DLC.
    #[error("Data length {len} shorter than DLC {dlc}")]
    DataShorterThanDlc { dlc: usize, len: usize },
    /// A wire buffer has the wrong size for its layout.
    #[error("Wire buffer of {actual} bytes, expected {expected}")]
    WireSizeMismatch { expected: usize, actual: usize },
}

//==================================================================================FRAME_IO_ERROR

#[derive(Error, Debug)]
/// Errors surfaced by a `FrameIo` capability. I/O variants carry the native
/// last-error code reported by the host.
pub enum FrameIoError {
    /// Read or write failed at the host layer.
    #[error("Frame I/O failed (os error {code})")]
    Io { code: i32 },
    /// The host accepted fewer bytes than one wire frame.
    #[error("Short write: {written} of {expected} bytes")]
    ShortWrite { expected: usize, written: usize },
    /// A read returned neither a classic nor an FD wire frame.
    #[error("Unexpected read size {actual}")]
    UnexpectedReadSize { actual: usize },
    /// FD-sized payloads need an FD-enabled device.
    #[error("CAN FD not enabled")]
    FdNotEnabled,
    /// Close failed at the host layer.
    #[error("Close failed (os error {code})")]
    CloseFailed { code: i32 },
    /// The capability was already closed.
    #[error("Frame I/O is closed")]
    Closed,
    /// The frame itself is malformed.
    #[error(transparent)]
    Frame(#[from] FrameError),
}

impl FrameIoError {
    /// Native last-error code, when the host reported one.
    pub fn last_error_code(&self) -> Option<i32> {
        match self {
            Self::Io { code } | Self::CloseFailed { code } => Some(*code),
            _ => None,
        }
    }
}

//==================================================================================PACK_ERROR

#[derive(Error, Debug)]
/// Errors encountered when packing an envelope into CAN frames.
pub enum PackError {
    /// Payload encoding failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// The CAN identifier could not be built.
    #[error(transparent)]
    CanId(#[from] CanIdError),
    /// Fast Packet frame indices are five bits; 32 frames is the ceiling.
    #[error("Payload needs {frames} frames, Fast Packet allows 32")]
    TooManyFrames { frames: usize },
}
