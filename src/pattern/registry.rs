// Sat Oct 17 2026 - Alex

use crate::config::ScannerConfig;
use crate::pattern::compiler::{CompiledPattern, PatternCompiler};
use crate::pattern::error::ScanError;
use crate::pattern::match_result::{materialize, BestMatch};
use crate::pattern::selector::{select_best_match, SearchWindow};
use std::fmt;

const SLOT_BITS: u32 = usize::BITS / 2;
const SLOT_MASK: usize = (1 << SLOT_BITS) - 1;

/// Token for a pattern compiled by a [`PatternRegistry`].
///
/// Handles pack a slot index and the slot's generation, so a handle whose
/// pattern was disposed never resolves to a later pattern reusing the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatternHandle {
    slot: usize,
    generation: usize,
}

impl PatternHandle {
    /// Packed form used across the C boundary. Never zero.
    pub fn to_raw(self) -> usize {
        (self.slot + 1) | (self.generation << SLOT_BITS)
    }

    pub fn from_raw(raw: usize) -> Option<Self> {
        let slot = raw & SLOT_MASK;
        if slot == 0 {
            return None;
        }
        Some(Self {
            slot: slot - 1,
            generation: raw >> SLOT_BITS,
        })
    }
}

impl fmt::Display for PatternHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{}", self.slot, self.generation)
    }
}

struct Slot {
    generation: usize,
    pattern: Option<CompiledPattern>,
}

/// Owns compiled patterns and hands out [`PatternHandle`]s for them.
pub struct PatternRegistry {
    compiler: PatternCompiler,
    slots: Vec<Slot>,
    free: Vec<usize>,
    live: usize,
    slot_capacity: usize,
}

impl PatternRegistry {
    pub fn new() -> Self {
        Self::with_config(&ScannerConfig::default())
    }

    pub fn with_config(config: &ScannerConfig) -> Self {
        Self {
            compiler: PatternCompiler::from_config(config),
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            slot_capacity: SLOT_MASK,
        }
    }

    /// Applies to patterns compiled from now on. Live handles keep their engine.
    pub fn reconfigure(&mut self, config: &ScannerConfig) {
        self.compiler = PatternCompiler::from_config(config);
    }

    pub fn compile(&mut self, source: &str) -> Result<PatternHandle, ScanError> {
        let pattern = self.compiler.compile(source)?;
        self.insert(pattern)
    }

    pub fn compile_bytes(&mut self, source: &[u8]) -> Result<PatternHandle, ScanError> {
        let pattern = self.compiler.compile_bytes(source)?;
        self.insert(pattern)
    }

    fn insert(&mut self, pattern: CompiledPattern) -> Result<PatternHandle, ScanError> {
        if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot];
            entry.generation = (entry.generation + 1) & SLOT_MASK;
            entry.pattern = Some(pattern);
            self.live += 1;
            return Ok(PatternHandle {
                slot,
                generation: entry.generation,
            });
        }

        // Slot `SLOT_MASK` would pack into the generation bits.
        if self.slots.len() >= self.slot_capacity {
            log::warn!("Pattern registry is full ({} slots)", self.slots.len());
            return Err(ScanError::InvalidArgument(format!(
                "too many live patterns (limit {})",
                self.slot_capacity
            )));
        }

        self.slots.push(Slot {
            generation: 0,
            pattern: Some(pattern),
        });
        self.live += 1;
        Ok(PatternHandle {
            slot: self.slots.len() - 1,
            generation: 0,
        })
    }

    /// Frees every handle in `handles`. Stale or repeated handles are ignored.
    pub fn dispose(&mut self, handles: &[PatternHandle]) {
        for &handle in handles {
            let Some(entry) = self.slots.get_mut(handle.slot) else {
                continue;
            };
            if entry.generation != handle.generation {
                continue;
            }
            if entry.pattern.take().is_some() {
                self.live -= 1;
                self.free.push(handle.slot);
                log::trace!("Disposed pattern {}", handle);
            }
        }
    }

    pub fn get(&self, handle: PatternHandle) -> Result<&CompiledPattern, ScanError> {
        self.slots
            .get(handle.slot)
            .filter(|entry| entry.generation == handle.generation)
            .and_then(|entry| entry.pattern.as_ref())
            .ok_or(ScanError::InvalidHandle(handle))
    }

    pub fn contains(&self, handle: PatternHandle) -> bool {
        self.get(handle).is_ok()
    }

    pub fn source(&self, handle: PatternHandle) -> Option<&str> {
        self.get(handle).ok().map(CompiledPattern::source)
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Searches `haystack` from `start` with each pattern in `handles` and
    /// returns the earliest match, or [`BestMatch::no_match`].
    pub fn find_best_match(
        &self,
        handles: &[PatternHandle],
        haystack: &[u8],
        start: usize,
    ) -> Result<BestMatch, ScanError> {
        let patterns = handles
            .iter()
            .map(|&handle| self.get(handle))
            .collect::<Result<Vec<_>, _>>()?;

        let window = SearchWindow::new(haystack, start);
        match select_best_match(patterns, &window)? {
            Some((index, region)) => Ok(materialize(region, index)),
            None => Ok(BestMatch::no_match()),
        }
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineKind;
    use crate::pattern::error::ErrorCode;

    fn registries() -> Vec<PatternRegistry> {
        [EngineKind::Standard, EngineKind::Backtracking]
            .into_iter()
            .map(|engine| PatternRegistry::with_config(&ScannerConfig::new().with_engine(engine)))
            .collect()
    }

    fn compile_all(registry: &mut PatternRegistry, sources: &[&str]) -> Vec<PatternHandle> {
        sources.iter().map(|s| registry.compile(s).unwrap()).collect()
    }

    #[test]
    fn test_earliest_match_wins_over_lower_index() {
        for mut registry in registries() {
            let handles = compile_all(&mut registry, &["bb", "a"]);
            let best = registry.find_best_match(&handles, b"xaybb", 0).unwrap();
            assert_eq!(best.index(), 1);
            assert_eq!(best.offsets(), &[1, 2]);
        }
    }

    #[test]
    fn test_tie_goes_to_first_pattern_even_if_shorter() {
        for mut registry in registries() {
            let handles = compile_all(&mut registry, &["a", "ab"]);
            for _ in 0..3 {
                let best = registry.find_best_match(&handles, b"ab", 0).unwrap();
                assert_eq!(best.index(), 0);
                assert_eq!(best.offsets(), &[0, 1]);
            }
        }
    }

    #[test]
    fn test_no_match_is_sentinel() {
        for mut registry in registries() {
            let handles = compile_all(&mut registry, &["q", "z+"]);
            let best = registry.find_best_match(&handles, b"abc", 0).unwrap();
            assert_eq!(best, BestMatch::no_match());
        }
    }

    #[test]
    fn test_single_match_reports_its_groups() {
        for mut registry in registries() {
            let handles = compile_all(&mut registry, &["nope", r"(\w+)=(\w+)", "zzz"]);
            let best = registry.find_best_match(&handles, b"  key=value", 0).unwrap();
            assert_eq!(best.index(), 1);
            assert_eq!(best.offsets(), &[2, 11, 2, 5, 6, 11]);
        }
    }

    #[test]
    fn test_materialized_offsets_match_direct_search() {
        use crate::pattern::region::Region;
        use crate::pattern::selector::Searcher;

        for mut registry in registries() {
            let handle = registry.compile(r"(l+)(o)").unwrap();
            let haystack = b"hello world";
            let best = registry.find_best_match(&[handle], haystack, 0).unwrap();

            let direct = registry.get(handle).unwrap().search(haystack, 0..haystack.len()).unwrap().unwrap();
            let expected: Vec<usize> = (0..direct.group_count())
                .flat_map(|g| [direct.begin(g), direct.end(g)])
                .collect();
            assert_eq!(best.offsets(), expected.as_slice());
        }
    }

    #[test]
    fn test_start_offset_skips_earlier_matches() {
        for mut registry in registries() {
            let handles = compile_all(&mut registry, &["a", "b", "c"]);
            assert_eq!(registry.find_best_match(&handles, b"xxaxxbxxc", 0).unwrap().index(), 0);
            assert_eq!(registry.find_best_match(&handles, b"xxaxxbxxc", 4).unwrap().index(), 1);
            assert_eq!(registry.find_best_match(&handles, b"xxaxxbxxc", 7).unwrap().index(), 2);
            assert!(!registry.find_best_match(&handles, b"xxaxxbxxc", 9).unwrap().is_match());
            assert!(!registry.find_best_match(&handles, b"xxaxxbxxc", 1000).unwrap().is_match());
        }
    }

    #[test]
    fn test_disposed_handle_is_rejected() {
        let mut registry = PatternRegistry::new();
        let first = registry.compile("a").unwrap();
        registry.dispose(&[first]);
        assert!(registry.is_empty());

        let second = registry.compile("b").unwrap();
        assert_ne!(first, second);
        assert!(!registry.contains(first));
        assert_eq!(registry.source(second), Some("b"));

        let err = registry.find_best_match(&[first], b"ab", 0).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidHandle);

        registry.dispose(&[first, second, second]);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_raw_handle_round_trip() {
        let mut registry = PatternRegistry::new();
        let handles = compile_all(&mut registry, &["a", "b"]);
        registry.dispose(&handles[..1]);
        let reused = registry.compile("c").unwrap();

        for handle in [handles[1], reused] {
            let raw = handle.to_raw();
            assert_ne!(raw, 0);
            assert_eq!(PatternHandle::from_raw(raw), Some(handle));
        }
        assert_eq!(PatternHandle::from_raw(0), None);
    }

    #[test]
    fn test_search_error_aborts_selection() {
        let config = ScannerConfig::new()
            .with_engine(EngineKind::Backtracking)
            .with_backtrack_limit(1_000);
        let mut registry = PatternRegistry::with_config(&config);
        let handles = compile_all(&mut registry, &["a", r"(a*)*(?=c)\1", "x"]);
        let haystack = "a".repeat(40);

        let err = registry.find_best_match(&handles, haystack.as_bytes(), 0).unwrap_err();
        assert_eq!(err.code(), ErrorCode::MatchStackLimitOver);
        assert!(matches!(err, ScanError::Search { index: 1, .. }));
    }

    #[test]
    fn test_full_registry_refuses_new_slots() {
        let mut registry = PatternRegistry::new();
        registry.slot_capacity = 2;
        let handles = compile_all(&mut registry, &["a", "b"]);

        let err = registry.compile("c").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert_eq!(registry.len(), 2);

        registry.dispose(&handles[..1]);
        let reused = registry.compile("c").unwrap();
        assert_eq!(PatternHandle::from_raw(reused.to_raw()), Some(reused));
        assert_eq!(registry.source(handles[1]), Some("b"));
    }

    #[test]
    fn test_largest_slot_packs_without_touching_generation() {
        let handle = PatternHandle {
            slot: SLOT_MASK - 1,
            generation: 3,
        };
        assert_eq!(PatternHandle::from_raw(handle.to_raw()), Some(handle));
    }
}
