// Sat Oct 17 2026 - Alex

use crate::config::{EngineKind, ScannerConfig};
use crate::pattern::error::{EngineFailure, ErrorCode, ScanError};
use crate::pattern::region::MatchRegion;
use crate::pattern::selector::Searcher;
use std::fmt;
use std::ops::Range;

pub struct PatternCompiler {
    engine: EngineKind,
    backtrack_limit: usize,
    size_limit: usize,
}

impl PatternCompiler {
    pub fn new() -> Self {
        Self::from_config(&ScannerConfig::default())
    }

    pub fn from_config(config: &ScannerConfig) -> Self {
        Self {
            engine: config.engine,
            backtrack_limit: config.backtrack_limit,
            size_limit: config.size_limit,
        }
    }

    pub fn engine(&self) -> EngineKind {
        self.engine
    }

    /// Compiles `source` with capture groups enabled.
    pub fn compile(&self, source: &str) -> Result<CompiledPattern, ScanError> {
        let engine = match self.engine {
            EngineKind::Standard => regex::bytes::RegexBuilder::new(source)
                .size_limit(self.size_limit)
                .build()
                .map(Engine::Standard)
                .map_err(|e| standard_syntax_error(source, e))?,
            EngineKind::Backtracking => fancy_regex::RegexBuilder::new(source)
                .backtrack_limit(self.backtrack_limit)
                .delegate_size_limit(self.size_limit)
                .build()
                .map(Engine::Backtracking)
                .map_err(|e| backtracking_syntax_error(source, e))?,
        };

        log::debug!("Compiled pattern {:?} with {:?} engine", source, self.engine);

        Ok(CompiledPattern {
            source: source.to_string(),
            engine,
        })
    }

    pub fn compile_bytes(&self, source: &[u8]) -> Result<CompiledPattern, ScanError> {
        let source = std::str::from_utf8(source).map_err(|_| ScanError::InvalidPatternText)?;
        self.compile(source)
    }
}

impl Default for PatternCompiler {
    fn default() -> Self {
        Self::new()
    }
}

fn standard_syntax_error(source: &str, err: regex::Error) -> ScanError {
    let code = match &err {
        regex::Error::Syntax(_) => ErrorCode::InvalidSyntax,
        regex::Error::CompiledTooBig(_) => ErrorCode::PatternTooBig,
        _ => ErrorCode::UnsupportedPattern,
    };
    ScanError::Syntax {
        pattern: source.to_string(),
        code,
        message: err.to_string(),
    }
}

fn backtracking_syntax_error(source: &str, err: fancy_regex::Error) -> ScanError {
    let code = match &err {
        fancy_regex::Error::ParseError(..) => ErrorCode::InvalidSyntax,
        _ => ErrorCode::UnsupportedPattern,
    };
    ScanError::Syntax {
        pattern: source.to_string(),
        code,
        message: err.to_string(),
    }
}

enum Engine {
    Standard(regex::bytes::Regex),
    Backtracking(fancy_regex::Regex),
}

pub struct CompiledPattern {
    source: String,
    engine: Engine,
}

impl CompiledPattern {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn engine(&self) -> EngineKind {
        match self.engine {
            Engine::Standard(_) => EngineKind::Standard,
            Engine::Backtracking(_) => EngineKind::Backtracking,
        }
    }

    /// Number of groups every successful match reports, group 0 included.
    pub fn group_count(&self) -> usize {
        match &self.engine {
            Engine::Standard(re) => re.captures_len(),
            Engine::Backtracking(re) => re.captures_len(),
        }
    }

    fn search_standard(re: &regex::bytes::Regex, haystack: &[u8], range: Range<usize>) -> Option<MatchRegion> {
        let caps = re.captures_at(&haystack[..range.end], range.start)?;
        Some(MatchRegion::from_groups(
            (0..caps.len()).map(|i| caps.get(i).map(|m| (m.start(), m.end()))),
        ))
    }

    fn search_backtracking(
        re: &fancy_regex::Regex,
        haystack: &[u8],
        range: Range<usize>,
    ) -> Result<Option<MatchRegion>, EngineFailure> {
        let text = std::str::from_utf8(&haystack[..range.end])
            .map_err(|e| EngineFailure::new(ErrorCode::InvalidCodePoint, e.to_string()))?;

        let mut start = range.start;
        while !text.is_char_boundary(start) {
            start += 1;
        }

        let caps = match re.captures_from_pos(text, start) {
            Ok(Some(caps)) => caps,
            Ok(None) => return Ok(None),
            Err(fancy_regex::Error::RuntimeError(fancy_regex::RuntimeError::BacktrackLimitExceeded)) => {
                return Err(EngineFailure::new(
                    ErrorCode::MatchStackLimitOver,
                    "backtrack limit exceeded",
                ));
            }
            Err(e) => return Err(EngineFailure::new(ErrorCode::Memory, e.to_string())),
        };

        Ok(Some(MatchRegion::from_groups(
            (0..caps.len()).map(|i| caps.get(i).map(|m| (m.start(), m.end()))),
        )))
    }
}

impl Searcher for CompiledPattern {
    type Region = MatchRegion;

    fn search(&self, haystack: &[u8], range: Range<usize>) -> Result<Option<MatchRegion>, EngineFailure> {
        let end = range.end.min(haystack.len());
        let range = range.start.min(end)..end;

        match &self.engine {
            Engine::Standard(re) => Ok(Self::search_standard(re, haystack, range)),
            Engine::Backtracking(re) => Self::search_backtracking(re, haystack, range),
        }
    }
}

impl fmt::Debug for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledPattern")
            .field("source", &self.source)
            .field("engine", &self.engine())
            .finish()
    }
}
