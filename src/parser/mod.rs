//! Tolerant extraction of code and JSON from free-form model output.
//!
//! Every function here is infallible from the caller's perspective: no
//! parse failure propagates as an `Err`. Layers fall through to
//! progressively cruder extraction, ending in a deterministic degraded
//! value — a `ParseError` never propagates out of this module.

pub mod code;
pub mod json;

pub use code::extract_code_variants;
pub use json::parse_tolerant_json;
