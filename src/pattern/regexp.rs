// Sat Oct 17 2026 - Alex

use crate::config::ScannerConfig;
use crate::pattern::error::ScanError;
use crate::pattern::scanner::{CaptureIndex, ScanMatch, Scanner};
use crate::text::Utf16Text;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCapture {
    pub capture: CaptureIndex,
    /// Text of the group; empty for groups that did not participate.
    pub text: String,
}

/// A single pattern with a search/test interface.
pub struct RegExp {
    source: String,
    scanner: Scanner,
}

impl RegExp {
    pub fn new(source: &str) -> Result<Self, ScanError> {
        Self::with_config(source, &ScannerConfig::default())
    }

    pub fn with_config(source: &str, config: &ScannerConfig) -> Result<Self, ScanError> {
        Ok(Self {
            source: source.to_string(),
            scanner: Scanner::with_config([source], config)?,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Captures of the first match at or after byte offset `start`.
    pub fn search(&self, text: &str, start: usize) -> Result<Option<Vec<SearchCapture>>, ScanError> {
        let found = self.scanner.find_next_match(text, start)?;
        Ok(found.map(|found| {
            Self::captures(found, |capture| {
                String::from_utf8_lossy(&text.as_bytes()[capture.start..capture.end]).into_owned()
            })
        }))
    }

    /// Same as [`RegExp::search`] with `start` and the captures in UTF-16 code units.
    pub fn search_utf16(&self, text: &Utf16Text, start: isize) -> Result<Option<Vec<SearchCapture>>, ScanError> {
        let found = self.scanner.find_next_match_utf16(text, start)?;
        Ok(found.map(|found| Self::captures(found, |capture| text.substring(capture.start, capture.end))))
    }

    fn captures(found: ScanMatch, slice: impl Fn(&CaptureIndex) -> String) -> Vec<SearchCapture> {
        found
            .capture_indices
            .into_iter()
            .map(|capture| {
                let text = if capture.is_set() { slice(&capture) } else { String::new() };
                SearchCapture { capture, text }
            })
            .collect()
    }

    pub fn test(&self, text: &str) -> Result<bool, ScanError> {
        Ok(self.search(text, 0)?.is_some())
    }
}
