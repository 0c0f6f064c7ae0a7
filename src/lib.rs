//! # sorted-int-map
//!
//! A compact, sorted, array-backed `i32 -> i32` map optimized for
//! mostly-ascending insertion patterns, such as building glyph-id-to-offset
//! tables while parsing a font file sequentially.
//!
//! Keys and values live in two parallel arrays kept sorted by key, giving
//! cache-friendly O(log n) lookup and an O(1) fast path for appending a
//! strictly increasing key. Out-of-order inserts pay an O(n) shift.
//!
//! ## Example
//!
//! ```rust
//! use sorted_int_map::{SortedIntMap, NO_VALUE};
//!
//! let mut map = SortedIntMap::with_capacity(3);
//! map.put(5, 8);
//! map.put(7, 11);
//! map.put(3, 17);
//!
//! assert_eq!(map.get(3), 17);
//! assert_eq!(map.get(4), NO_VALUE);
//! assert_eq!(map.last_key(), 7);
//! ```
//!
//! Cursor traversal is fail-fast: every cursor remembers the map's mutation
//! counter at creation and refuses to run once the map has changed.
//!
//! ```rust
//! use sorted_int_map::{CursorError, SortedIntMap};
//!
//! let mut map = SortedIntMap::new();
//! map.put(1, 10);
//!
//! let mut cursor = map.key_cursor();
//! map.put(2, 20);
//! assert_eq!(cursor.next(&map), Err(CursorError::Stale));
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

/// Reserved sentinel returned by [`SortedIntMap::get`] for absent keys and by
/// [`SortedIntMap::last_key`] on an empty map.
///
/// Callers must not store this as a meaningful value; the map does not check.
pub const NO_VALUE: i32 = i32::MIN;

// =============================================================================
// SortedIntMap
// =============================================================================

/// A sorted array-backed map from `i32` keys to `i32` values.
///
/// Features:
/// - Parallel key/value arrays, strictly ascending by key
/// - O(1) fast-path append for strictly increasing keys
/// - Binary-search lookup, sentinel return for absent keys
/// - Fail-fast cursors invalidated by any mutation
///
/// There is no remove operation; entries can only be added or overwritten.
#[derive(Clone)]
pub struct SortedIntMap {
    keys: Vec<i32>,
    values: Vec<i32>,
    /// Incremented once per `put` (insert or overwrite). Cursors snapshot it
    /// at creation and fail once it no longer matches.
    change_counter: u64,
}

impl SortedIntMap {
    /// Creates an empty map without allocating.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty map with room for `capacity` entries before the
    /// backing arrays have to grow. The capacity is a hint, not a limit.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            change_counter: 0,
        }
    }

    /// Number of entries in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of entries the backing arrays can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.keys.capacity()
    }

    /// Adds a mapping, overwriting the value if `key` is already present.
    ///
    /// Strictly increasing keys append in O(1); anything else costs a binary
    /// search plus an O(n) shift to keep the arrays sorted. Either way the
    /// mutation counter advances and outstanding cursors become stale.
    pub fn put(&mut self, key: i32, value: i32) {
        let size = self.keys.len();

        // Keys of put calls are usually sequential. Handle the append case
        // without a binary search.
        let search = if size == 0 || self.keys[size - 1] < key {
            Err(size)
        } else {
            self.keys.binary_search(&key)
        };

        match search {
            Ok(idx) => self.values[idx] = value,
            Err(idx) => {
                self.ensure_allocated(size + 1);
                self.keys.insert(idx, key);
                self.values.insert(idx, value);
            }
        }

        self.change_counter += 1;
    }

    /// Grows the backing arrays to hold at least `minimum` entries, by a 1.2x
    /// factor so repeated appends stay O(1) amortized.
    fn ensure_allocated(&mut self, minimum: usize) {
        let capacity = self.keys.capacity();
        if capacity < minimum {
            let target = minimum.max(capacity + capacity / 5);
            self.keys.reserve_exact(target - self.keys.len());
            self.values.reserve_exact(target - self.values.len());
        }
    }

    /// Returns the value mapped to `key`, or [`NO_VALUE`] if absent.
    pub fn get(&self, key: i32) -> i32 {
        match self.keys.binary_search(&key) {
            Ok(idx) => self.values[idx],
            Err(_) => NO_VALUE,
        }
    }

    pub fn contains_key(&self, key: i32) -> bool {
        self.keys.binary_search(&key).is_ok()
    }

    /// Returns the largest key, or [`NO_VALUE`] if the map is empty.
    ///
    /// The arrays are sorted ascending, so this is the last slot.
    #[inline]
    pub fn last_key(&self) -> i32 {
        self.keys.last().copied().unwrap_or(NO_VALUE)
    }

    /// Creates a fail-fast cursor over the keys, smallest to largest.
    ///
    /// The cursor interacts directly with this map's storage; mutating the
    /// map while the cursor is in use makes its next operation fail with
    /// [`CursorError::Stale`].
    pub fn key_cursor(&self) -> KeyCursor {
        KeyCursor {
            checkpoint: self.change_counter,
            idx: 0,
        }
    }

    /// Creates a fail-fast cursor over the entries, in ascending key order.
    ///
    /// The cursor starts one position before the first entry;
    /// [`EntryCursor::advance`] must be called before the first read.
    pub fn entry_cursor(&self) -> EntryCursor {
        EntryCursor {
            checkpoint: self.change_counter,
            pos: None,
        }
    }

    /// Borrowing iterator over `(key, value)` pairs in ascending key order.
    pub fn iter(&self) -> Iter<'_> {
        Iter { map: self, idx: 0 }
    }
}

impl Default for SortedIntMap {
    fn default() -> Self {
        Self::new()
    }
}

/// Structural equality over the entry sequence; the mutation counter does not
/// participate, so maps built in different insertion orders compare equal.
impl PartialEq for SortedIntMap {
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys && self.values == other.values
    }
}

impl Eq for SortedIntMap {}

/// Hashes the wrapping sum of `key ^ value` over all entries. The sum is
/// order-insensitive, which keeps the hash consistent with equality.
impl Hash for SortedIntMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut acc = 0i32;
        for (&key, &value) in self.keys.iter().zip(&self.values) {
            acc = acc.wrapping_add(key ^ value);
        }
        state.write_i32(acc);
    }
}

impl fmt::Debug for SortedIntMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl FromIterator<(i32, i32)> for SortedIntMap {
    fn from_iter<I: IntoIterator<Item = (i32, i32)>>(iter: I) -> Self {
        let mut map = SortedIntMap::new();
        map.extend(iter);
        map
    }
}

impl Extend<(i32, i32)> for SortedIntMap {
    fn extend<I: IntoIterator<Item = (i32, i32)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<'a> IntoIterator for &'a SortedIntMap {
    type Item = (i32, i32);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

pub struct Iter<'a> {
    map: &'a SortedIntMap,
    idx: usize,
}

impl Iterator for Iter<'_> {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        let key = *self.map.keys.get(self.idx)?;
        let value = self.map.values[self.idx];
        self.idx += 1;
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.map.len() - self.idx;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

// =============================================================================
// Fail-fast cursors
// =============================================================================

/// Failure of a cursor operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    /// The map was mutated after this cursor was created. The cursor is dead;
    /// obtain a fresh one from the map.
    Stale,
    /// The cursor has no entry at its current or requested position.
    Exhausted,
}

impl fmt::Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CursorError::Stale => f.write_str("map was changed while iterating"),
            CursorError::Exhausted => f.write_str("cursor does not contain any more entries"),
        }
    }
}

impl std::error::Error for CursorError {}

/// Cursor over the keys of a [`SortedIntMap`], smallest to largest.
///
/// Cursors hold no borrow of the map; every operation takes the owning map as
/// an argument and first compares the live mutation counter against the
/// checkpoint captured at creation. Pass the cursor only to the map that
/// created it.
pub struct KeyCursor {
    /// Copy of the map's mutation counter at creation time.
    checkpoint: u64,
    /// Index of the next key returned by the cursor.
    idx: usize,
}

impl KeyCursor {
    /// Whether there are more keys to iterate.
    pub fn has_next(&self, map: &SortedIntMap) -> Result<bool, CursorError> {
        self.check_unmodified(map)?;
        Ok(self.idx < map.keys.len())
    }

    /// Returns the next key and advances the cursor.
    pub fn next(&mut self, map: &SortedIntMap) -> Result<i32, CursorError> {
        self.check_unmodified(map)?;
        let key = map
            .keys
            .get(self.idx)
            .copied()
            .ok_or(CursorError::Exhausted)?;
        self.idx += 1;
        Ok(key)
    }

    #[inline]
    fn check_unmodified(&self, map: &SortedIntMap) -> Result<(), CursorError> {
        if self.checkpoint != map.change_counter {
            return Err(CursorError::Stale);
        }
        Ok(())
    }
}

/// Cursor over the `(key, value)` entries of a [`SortedIntMap`], in ascending
/// key order.
///
/// Unlike [`KeyCursor`], movement and reading are separate: [`advance`] moves
/// onto the next entry, after which [`key`] and [`value`] can each be read
/// without re-positioning. The cursor starts before the first entry, so
/// `advance` must succeed once before the first read.
///
/// Like `KeyCursor`, every operation validates the mutation checkpoint and
/// must be given the map that created the cursor.
///
/// [`advance`]: EntryCursor::advance
/// [`key`]: EntryCursor::key
/// [`value`]: EntryCursor::value
pub struct EntryCursor {
    checkpoint: u64,
    /// Index of the current entry; `None` until the first `advance`.
    pos: Option<usize>,
}

impl EntryCursor {
    /// Whether there is an entry after the current position.
    pub fn has_next(&self, map: &SortedIntMap) -> Result<bool, CursorError> {
        self.check_unmodified(map)?;
        Ok(self.next_pos() < map.keys.len())
    }

    /// Moves the cursor onto the next entry.
    pub fn advance(&mut self, map: &SortedIntMap) -> Result<(), CursorError> {
        self.check_unmodified(map)?;
        let next = self.next_pos();
        if next >= map.keys.len() {
            return Err(CursorError::Exhausted);
        }
        self.pos = Some(next);
        Ok(())
    }

    /// Key of the current entry. Does not move the cursor.
    pub fn key(&self, map: &SortedIntMap) -> Result<i32, CursorError> {
        self.check_unmodified(map)?;
        self.current(map).map(|idx| map.keys[idx])
    }

    /// Value of the current entry. Does not move the cursor.
    pub fn value(&self, map: &SortedIntMap) -> Result<i32, CursorError> {
        self.check_unmodified(map)?;
        self.current(map).map(|idx| map.values[idx])
    }

    #[inline]
    fn next_pos(&self) -> usize {
        self.pos.map_or(0, |idx| idx + 1)
    }

    fn current(&self, map: &SortedIntMap) -> Result<usize, CursorError> {
        match self.pos {
            Some(idx) if idx < map.keys.len() => Ok(idx),
            _ => Err(CursorError::Exhausted),
        }
    }

    #[inline]
    fn check_unmodified(&self, map: &SortedIntMap) -> Result<(), CursorError> {
        if self.checkpoint != map.change_counter {
            return Err(CursorError::Stale);
        }
        Ok(())
    }
}


#[cfg(test)]
mod proptests;
