// Sat Oct 17 2026 - Alex

use crate::pattern::region::Region;

/// Winner of one selection pass, flattened for the caller.
///
/// `offsets` holds `2 * group_count` entries, begin then end for each group,
/// group 0 first. The no-match outcome is index 0 with no offsets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BestMatch {
    index: usize,
    offsets: Vec<usize>,
}

impl BestMatch {
    pub fn no_match() -> Self {
        Self::default()
    }

    pub fn is_match(&self) -> bool {
        !self.offsets.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn group_count(&self) -> usize {
        self.offsets.len() / 2
    }

    pub fn group(&self, group: usize) -> Option<(usize, usize)> {
        let at = group * 2;
        Some((*self.offsets.get(at)?, *self.offsets.get(at + 1)?))
    }

    pub fn groups(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.offsets.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }

    pub fn into_offsets(self) -> Vec<usize> {
        self.offsets
    }

    /// Hands the offset buffer to a foreign caller as `(index, address, len)`.
    ///
    /// The no-match outcome yields a null address. A non-null address must be
    /// given back to [`BestMatch::free_raw`] exactly once.
    pub fn into_raw_parts(self) -> (usize, *mut usize, usize) {
        if self.offsets.is_empty() {
            return (0, std::ptr::null_mut(), 0);
        }
        let len = self.offsets.len();
        let buffer = Box::into_raw(self.offsets.into_boxed_slice()) as *mut usize;
        (self.index, buffer, len)
    }

    /// # Safety
    ///
    /// `buffer` and `len` must come from one call to [`BestMatch::into_raw_parts`]
    /// and must not have been freed already.
    pub unsafe fn free_raw(buffer: *mut usize, len: usize) {
        if buffer.is_null() {
            return;
        }
        let slice = std::ptr::slice_from_raw_parts_mut(buffer, len);
        drop(Box::from_raw(slice));
    }
}

/// Flattens `region` into a freshly allocated [`BestMatch`] and releases it.
pub fn materialize<R: Region>(region: R, index: usize) -> BestMatch {
    let group_count = region.group_count();
    let mut offsets = Vec::with_capacity(group_count * 2);

    for group in 0..group_count {
        offsets.push(region.begin(group));
        offsets.push(region.end(group));
    }

    BestMatch { index, offsets }
}
