// Sat Oct 17 2026 - Alex

//! Earliest-match selection across a set of independently compiled regular
//! expressions, with capture offsets flattened for callers on the other side
//! of a C boundary.

pub mod config;
pub mod ffi;
pub mod pattern;
pub mod text;
pub mod utils;

pub use config::{EngineKind, ScannerConfig};
pub use pattern::{
    find_best_match, BestMatch, CaptureIndex, ErrorCode, PatternHandle, PatternRegistry, RegExp, ScanError,
    ScanMatch, Scanner,
};
pub use text::Utf16Text;
