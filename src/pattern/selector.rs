// Sat Oct 17 2026 - Alex

use crate::pattern::error::{EngineFailure, ScanError};
use crate::pattern::region::Region;
use crate::utils::logging::ScopedTimer;
use std::ops::Range;

/// One compiled pattern as seen by the selector.
///
/// `search` looks for the leftmost match beginning inside `range`, with the
/// whole `haystack` available as context for anchors and look-around.
pub trait Searcher {
    type Region: Region;

    fn search(&self, haystack: &[u8], range: Range<usize>) -> Result<Option<Self::Region>, EngineFailure>;
}

impl<S: Searcher + ?Sized> Searcher for &S {
    type Region = S::Region;

    fn search(&self, haystack: &[u8], range: Range<usize>) -> Result<Option<Self::Region>, EngineFailure> {
        (**self).search(haystack, range)
    }
}

/// Borrowed byte buffer plus the offset the forward scan starts from.
#[derive(Debug, Clone, Copy)]
pub struct SearchWindow<'h> {
    haystack: &'h [u8],
    start: usize,
}

impl<'h> SearchWindow<'h> {
    /// Offsets past the end are clamped to the end, which can only match empty patterns.
    pub fn new(haystack: &'h [u8], start: usize) -> Self {
        Self {
            haystack,
            start: start.min(haystack.len()),
        }
    }

    pub fn haystack(&self) -> &'h [u8] {
        self.haystack
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.haystack.len()
    }
}

/// Picks the pattern whose match begins earliest in `window`.
///
/// Equal starts keep the lower index. A hard engine failure aborts the pass
/// and drops whatever was adopted so far.
pub fn select_best_match<I, S>(patterns: I, window: &SearchWindow<'_>) -> Result<Option<(usize, S::Region)>, ScanError>
where
    I: IntoIterator<Item = S>,
    S: Searcher,
{
    let _timer = ScopedTimer::new("select_best_match");
    let range = window.range();
    let mut best: Option<(usize, S::Region)> = None;

    for (index, pattern) in patterns.into_iter().enumerate() {
        let region = match pattern.search(window.haystack(), range.clone()) {
            Ok(Some(region)) => region,
            Ok(None) => continue,
            Err(failure) => {
                log::warn!("Pattern #{} failed at offset {}: {}", index, window.start(), failure);
                return Err(ScanError::search(index, failure));
            }
        };

        if region.group_count() == 0 {
            continue;
        }

        let earlier = match &best {
            None => true,
            Some((_, current)) => region.begin(0) < current.begin(0),
        };

        if earlier {
            log::trace!("Pattern #{} is the best so far at {}", index, region.begin(0));
            best = Some((index, region));
        }
    }

    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::error::ErrorCode;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Region that counts how many instances are alive.
    #[derive(Debug)]
    struct TrackedRegion {
        groups: Vec<(usize, usize)>,
        live: Rc<Cell<usize>>,
    }

    impl TrackedRegion {
        fn new(groups: Vec<(usize, usize)>, live: &Rc<Cell<usize>>) -> Self {
            live.set(live.get() + 1);
            Self {
                groups,
                live: Rc::clone(live),
            }
        }
    }

    impl Drop for TrackedRegion {
        fn drop(&mut self) {
            self.live.set(self.live.get() - 1);
        }
    }

    impl Region for TrackedRegion {
        fn group_count(&self) -> usize {
            self.groups.len()
        }

        fn begin(&self, group: usize) -> usize {
            self.groups[group].0
        }

        fn end(&self, group: usize) -> usize {
            self.groups[group].1
        }
    }

    enum Scripted {
        Match(Vec<(usize, usize)>),
        Mismatch,
        Fail(ErrorCode),
    }

    struct ScriptedSearcher {
        outcome: Scripted,
        live: Rc<Cell<usize>>,
        peak: Rc<Cell<usize>>,
    }

    impl Searcher for ScriptedSearcher {
        type Region = TrackedRegion;

        fn search(&self, _haystack: &[u8], _range: Range<usize>) -> Result<Option<TrackedRegion>, EngineFailure> {
            let result = match &self.outcome {
                Scripted::Match(groups) => Ok(Some(TrackedRegion::new(groups.clone(), &self.live))),
                Scripted::Mismatch => Ok(None),
                Scripted::Fail(code) => Err(EngineFailure::new(*code, "scripted failure")),
            };
            self.peak.set(self.peak.get().max(self.live.get()));
            result
        }
    }

    struct Harness {
        live: Rc<Cell<usize>>,
        peak: Rc<Cell<usize>>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                live: Rc::new(Cell::new(0)),
                peak: Rc::new(Cell::new(0)),
            }
        }

        fn searchers(&self, outcomes: Vec<Scripted>) -> Vec<ScriptedSearcher> {
            outcomes
                .into_iter()
                .map(|outcome| ScriptedSearcher {
                    outcome,
                    live: Rc::clone(&self.live),
                    peak: Rc::clone(&self.peak),
                })
                .collect()
        }
    }

    fn window() -> SearchWindow<'static> {
        SearchWindow::new(b"0123456789", 0)
    }

    #[test]
    fn test_no_pattern_matches() {
        let harness = Harness::new();
        let patterns = harness.searchers(vec![Scripted::Mismatch, Scripted::Mismatch]);
        let best = select_best_match(&patterns, &window()).unwrap();
        assert!(best.is_none());
        assert_eq!(harness.live.get(), 0);
    }

    #[test]
    fn test_earliest_start_wins_regardless_of_order() {
        let harness = Harness::new();
        let patterns = harness.searchers(vec![
            Scripted::Match(vec![(6, 7)]),
            Scripted::Mismatch,
            Scripted::Match(vec![(2, 4), (3, 4)]),
            Scripted::Match(vec![(5, 9)]),
        ]);

        let (index, region) = select_best_match(&patterns, &window()).unwrap().unwrap();
        assert_eq!(index, 2);
        assert_eq!(region.begin(0), 2);
        assert_eq!(region.end(1), 4);
        assert_eq!(harness.live.get(), 1);
        drop(region);
        assert_eq!(harness.live.get(), 0);
    }

    #[test]
    fn test_equal_starts_keep_lower_index() {
        let harness = Harness::new();
        let patterns = harness.searchers(vec![
            Scripted::Mismatch,
            Scripted::Match(vec![(3, 4)]),
            Scripted::Match(vec![(3, 9)]),
        ]);

        for _ in 0..5 {
            let (index, _) = select_best_match(&patterns, &window()).unwrap().unwrap();
            assert_eq!(index, 1);
        }
    }

    #[test]
    fn test_zero_group_regions_are_skipped() {
        let harness = Harness::new();
        let patterns = harness.searchers(vec![Scripted::Match(vec![]), Scripted::Match(vec![(8, 9)])]);
        let (index, _) = select_best_match(&patterns, &window()).unwrap().unwrap();
        assert_eq!(index, 1);
    }

    #[test]
    fn test_at_most_two_regions_alive_during_pass() {
        let harness = Harness::new();
        let patterns = harness.searchers(vec![
            Scripted::Match(vec![(9, 10)]),
            Scripted::Match(vec![(8, 10)]),
            Scripted::Match(vec![(7, 10)]),
            Scripted::Match(vec![(7, 8)]),
        ]);

        let best = select_best_match(&patterns, &window()).unwrap();
        assert_eq!(best.as_ref().map(|(i, _)| *i), Some(2));
        assert_eq!(harness.peak.get(), 2);
        drop(best);
        assert_eq!(harness.live.get(), 0);
    }

    #[test]
    fn test_hard_failure_aborts_and_releases_tentative_best() {
        let harness = Harness::new();
        let patterns = harness.searchers(vec![
            Scripted::Match(vec![(1, 2)]),
            Scripted::Fail(ErrorCode::MatchStackLimitOver),
            Scripted::Match(vec![(0, 1)]),
        ]);

        let err = select_best_match(&patterns, &window()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::MatchStackLimitOver);
        match err {
            ScanError::Search { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(harness.live.get(), 0);
    }

    #[test]
    fn test_window_clamps_start() {
        let w = SearchWindow::new(b"abc", 10);
        assert_eq!(w.start(), 3);
        assert_eq!(w.range(), 3..3);
    }
}
