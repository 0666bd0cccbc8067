// Sat Oct 17 2026 - Alex

use crate::config::ScannerConfig;
use crate::pattern::error::ScanError;
use crate::pattern::match_result::BestMatch;
use crate::pattern::region::UNSET_OFFSET;
use crate::pattern::registry::{PatternHandle, PatternRegistry};
use crate::text::Utf16Text;

/// Position of one capture group inside the searched text.
///
/// Groups that did not participate carry [`UNSET_OFFSET`] and a zero length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureIndex {
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub length: usize,
}

impl CaptureIndex {
    pub fn new(index: usize, start: usize, end: usize) -> Self {
        let length = if start == UNSET_OFFSET { 0 } else { end - start };
        Self {
            index,
            start,
            end,
            length,
        }
    }

    pub fn is_set(&self) -> bool {
        self.start != UNSET_OFFSET
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanMatch {
    /// Position of the winning pattern in the scanner's pattern list.
    pub index: usize,
    pub capture_indices: Vec<CaptureIndex>,
}

impl ScanMatch {
    fn from_best(best: &BestMatch, convert: impl Fn(usize) -> usize) -> Self {
        let capture_indices = best
            .groups()
            .enumerate()
            .map(|(group, (start, end))| {
                if start == UNSET_OFFSET {
                    CaptureIndex::new(group, UNSET_OFFSET, UNSET_OFFSET)
                } else {
                    CaptureIndex::new(group, convert(start), convert(end))
                }
            })
            .collect();

        Self {
            index: best.index(),
            capture_indices,
        }
    }
}

/// An ordered list of patterns searched together for the earliest match.
///
/// Dropping the scanner releases every pattern it compiled.
pub struct Scanner {
    registry: PatternRegistry,
    handles: Vec<PatternHandle>,
}

impl Scanner {
    pub fn new<I, S>(patterns: I) -> Result<Self, ScanError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_config(patterns, &ScannerConfig::default())
    }

    pub fn with_config<I, S>(patterns: I, config: &ScannerConfig) -> Result<Self, ScanError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        config.validate().map_err(ScanError::Config)?;

        let mut registry = PatternRegistry::with_config(config);
        let mut handles = Vec::new();

        for pattern in patterns {
            match registry.compile(pattern.as_ref()) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    registry.dispose(&handles);
                    return Err(e);
                }
            }
        }

        log::debug!("Scanner ready with {} patterns", handles.len());
        Ok(Self { registry, handles })
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> + '_ {
        self.handles
            .iter()
            .filter_map(move |&handle| self.registry.source(handle))
    }

    /// Raw selection result with byte offsets.
    pub fn find_best_match(&self, haystack: &[u8], start: usize) -> Result<BestMatch, ScanError> {
        self.registry.find_best_match(&self.handles, haystack, start)
    }

    /// Earliest match at or after byte offset `start`; offsets are UTF-8 bytes.
    pub fn find_next_match(&self, text: impl AsRef<[u8]>, start: usize) -> Result<Option<ScanMatch>, ScanError> {
        let best = self.find_best_match(text.as_ref(), start)?;
        if !best.is_match() {
            return Ok(None);
        }
        Ok(Some(ScanMatch::from_best(&best, |offset| offset)))
    }

    /// Same as [`Scanner::find_next_match`] with `start` and the result in
    /// UTF-16 code units. Negative starts are treated as 0.
    pub fn find_next_match_utf16(&self, text: &Utf16Text, start: isize) -> Result<Option<ScanMatch>, ScanError> {
        let start = text.utf16_to_utf8(start.max(0) as usize);
        let best = self.find_best_match(text.as_bytes(), start)?;
        if !best.is_match() {
            return Ok(None);
        }
        Ok(Some(ScanMatch::from_best(&best, |offset| text.utf8_to_utf16(offset))))
    }
}
