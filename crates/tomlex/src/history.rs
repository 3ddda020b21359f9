use crate::codepoint::Codepoint;

/// Fixed-capacity ring of the most recently read codepoints.
///
/// Holds at most `N` records. Pushing into a full ring overwrites the oldest
/// one; the storage is allocated inline and never grows.
#[derive(Clone)]
pub struct History<const N: usize> {
    entries: [Codepoint; N],
    len: usize,
    oldest: usize,
}

impl<const N: usize> History<N> {
    /// An empty ring.
    #[must_use]
    pub const fn new() -> Self {
        const { assert!(N > 0, "history capacity must be non-zero") };
        Self {
            entries: [Codepoint::NUL; N],
            len: 0,
            oldest: 0,
        }
    }

    /// Appends `cp` as the newest entry, evicting the oldest when full.
    pub fn push(&mut self, cp: Codepoint) {
        if self.len < N {
            self.entries[(self.oldest + self.len) % N] = cp;
            self.len += 1;
        } else {
            self.entries[self.oldest] = cp;
            self.oldest = (self.oldest + 1) % N;
        }
    }

    /// The entry `offset` steps back from the newest, which is offset 1.
    ///
    /// Returns `None` when `offset` is 0 or exceeds [`len`](Self::len).
    #[must_use]
    pub fn get_back(&self, offset: usize) -> Option<&Codepoint> {
        if offset == 0 || offset > self.len {
            return None;
        }
        Some(&self.entries[(self.oldest + self.len - offset) % N])
    }

    /// Number of entries held.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// `true` when nothing has been pushed since creation or the last clear.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `true` when the next push will evict an entry.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.len == N
    }

    /// Maximum number of entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Forgets every entry.
    pub fn clear(&mut self) {
        self.len = 0;
        self.oldest = 0;
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Codepoint> + '_ {
        (0..self.len).map(move |i| &self.entries[(self.oldest + i) % N])
    }
}

impl<const N: usize> Default for History<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> core::fmt::Debug for History<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
