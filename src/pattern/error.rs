// Sat Oct 17 2026 - Alex

use crate::pattern::registry::PatternHandle;
use std::fmt;
use thiserror::Error;

/// Numeric failure codes shared by the Rust API and the C boundary.
///
/// Mismatch, memory, stack limit, argument and code point failures use
/// Oniguruma's numbers.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Normal = 0,
    Mismatch = -1,
    Memory = -5,
    MatchStackLimitOver = -15,
    InvalidArgument = -30,
    InvalidHandle = -31,
    InvalidSyntax = -100,
    PatternTooBig = -101,
    UnsupportedPattern = -102,
    InvalidCodePoint = -400,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 10] = [
        ErrorCode::Normal,
        ErrorCode::Mismatch,
        ErrorCode::Memory,
        ErrorCode::MatchStackLimitOver,
        ErrorCode::InvalidArgument,
        ErrorCode::InvalidHandle,
        ErrorCode::InvalidSyntax,
        ErrorCode::PatternTooBig,
        ErrorCode::UnsupportedPattern,
        ErrorCode::InvalidCodePoint,
    ];

    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn from_i32(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_i32() == code)
    }

    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::Normal => "no error",
            ErrorCode::Mismatch => "mismatch",
            ErrorCode::Memory => "fail to memory allocation",
            ErrorCode::MatchStackLimitOver => "match-stack limit over",
            ErrorCode::InvalidArgument => "invalid argument",
            ErrorCode::InvalidHandle => "invalid pattern handle",
            ErrorCode::InvalidSyntax => "invalid pattern syntax",
            ErrorCode::PatternTooBig => "too big pattern",
            ErrorCode::UnsupportedPattern => "unsupported pattern construct",
            ErrorCode::InvalidCodePoint => "invalid code point value",
        }
    }

    /// Text for an arbitrary numeric code, including ones this crate never emits.
    pub fn describe(code: i32) -> &'static str {
        Self::from_i32(code)
            .map(ErrorCode::message)
            .unwrap_or("undefined error code")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.as_i32())
    }
}

/// A failure reported by a search backend while scanning.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct EngineFailure {
    pub code: ErrorCode,
    pub message: String,
}

impl EngineFailure {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("Invalid pattern {pattern:?}: {message}")]
    Syntax {
        pattern: String,
        code: ErrorCode,
        message: String,
    },
    #[error("Search failed for pattern #{index}: {message}")]
    Search {
        index: usize,
        code: ErrorCode,
        message: String,
    },
    #[error("Invalid pattern handle: {0}")]
    InvalidHandle(PatternHandle),
    #[error("Pattern text is not valid UTF-8")]
    InvalidPatternText,
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ScanError {
    pub fn search(index: usize, failure: EngineFailure) -> Self {
        ScanError::Search {
            index,
            code: failure.code,
            message: failure.message,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ScanError::Syntax { code, .. } => *code,
            ScanError::Search { code, .. } => *code,
            ScanError::InvalidHandle(_) => ErrorCode::InvalidHandle,
            ScanError::InvalidPatternText => ErrorCode::InvalidCodePoint,
            ScanError::InvalidArgument(_) | ScanError::Config(_) => ErrorCode::InvalidArgument,
        }
    }
}

pub type ScanResult<T> = Result<T, ScanError>;
