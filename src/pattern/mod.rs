// Sat Oct 17 2026 - Alex

pub mod compiler;
pub mod error;
pub mod match_result;
pub mod regexp;
pub mod region;
pub mod registry;
pub mod scanner;
pub mod selector;

pub use compiler::{CompiledPattern, PatternCompiler};
pub use error::{EngineFailure, ErrorCode, ScanError, ScanResult};
pub use match_result::{materialize, BestMatch};
pub use regexp::{RegExp, SearchCapture};
pub use region::{MatchRegion, Region, UNSET_OFFSET};
pub use registry::{PatternHandle, PatternRegistry};
pub use scanner::{CaptureIndex, ScanMatch, Scanner};
pub use selector::{select_best_match, SearchWindow, Searcher};

/// Compiles `sources` into a throwaway registry and returns the earliest match.
pub fn find_best_match<S: AsRef<str>>(sources: &[S], haystack: &[u8], start: usize) -> Result<BestMatch, ScanError> {
    let mut registry = PatternRegistry::new();
    let handles = sources
        .iter()
        .map(|source| registry.compile(source.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    registry.find_best_match(&handles, haystack, start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_best_match_one_shot() {
        let best = find_best_match(&["bb", "a"], b"xaybb", 0).unwrap();
        assert_eq!((best.index(), best.offsets()), (1, &[1usize, 2][..]));

        let err = find_best_match(&["ok", "(?<"], b"ok", 0).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidSyntax);
    }
}
