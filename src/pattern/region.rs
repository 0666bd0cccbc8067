// Sat Oct 17 2026 - Alex

/// Offset reported for a capture group that did not take part in the match.
pub const UNSET_OFFSET: usize = usize::MAX;

/// Capture-group boundaries produced by one successful search.
///
/// Group 0 is the whole match. Offsets are byte offsets into the searched
/// buffer.
pub trait Region {
    fn group_count(&self) -> usize;
    fn begin(&self, group: usize) -> usize;
    fn end(&self, group: usize) -> usize;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchRegion {
    beg: Vec<usize>,
    end: Vec<usize>,
}

impl MatchRegion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_groups<I>(groups: I) -> Self
    where
        I: IntoIterator<Item = Option<(usize, usize)>>,
    {
        let mut region = Self::new();
        for group in groups {
            region.push(group);
        }
        region
    }

    pub fn push(&mut self, group: Option<(usize, usize)>) {
        let (beg, end) = group.unwrap_or((UNSET_OFFSET, UNSET_OFFSET));
        self.beg.push(beg);
        self.end.push(end);
    }

    pub fn is_set(&self, group: usize) -> bool {
        self.beg.get(group).is_some_and(|&b| b != UNSET_OFFSET)
    }
}

impl Region for MatchRegion {
    fn group_count(&self) -> usize {
        self.beg.len()
    }

    fn begin(&self, group: usize) -> usize {
        self.beg[group]
    }

    fn end(&self, group: usize) -> usize {
        self.end[group]
    }
}
