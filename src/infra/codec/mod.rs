//! Payload codec: bit-field primitives and the descriptor-driven engine
//! that turns payload bytes into envelopes and back.
pub mod bits;
pub mod engine;
