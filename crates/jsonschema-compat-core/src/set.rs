//! A set keyed by a caller-supplied equivalence instead of `Eq`/`Hash`.
//!
//! Structural schema equality is not hashable (member order inside unions is
//! irrelevant), so membership is a linear scan. Inserts and lookups are O(n)
//! comparisons; subset checks are O(n·m).

/// Set of `T` under the equivalence `compare`.
///
/// Duplicates (under `compare`) are dropped on insert.
pub struct CompareSet<T, F> {
    items: Vec<T>,
    compare: F,
}

impl<T, F> CompareSet<T, F>
where
    F: Fn(&T, &T) -> bool,
{
    pub fn new(compare: F) -> Self {
        Self {
            items: Vec::new(),
            compare,
        }
    }

    pub fn from_items(items: impl IntoIterator<Item = T>, compare: F) -> Self {
        let mut set = Self::new(compare);
        for item in items {
            set.insert(item);
        }
        set
    }

    /// Insert `item` unless an equivalent item is already present.
    ///
    /// Returns whether the item was inserted.
    pub fn insert(&mut self, item: T) -> bool {
        if self.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.iter().any(|existing| (self.compare)(existing, item))
    }

    /// Every item of `self` has an equivalent in `other`.
    pub fn is_subset_of<G>(&self, other: &CompareSet<T, G>) -> bool
    where
        G: Fn(&T, &T) -> bool,
    {
        self.items.iter().all(|item| other.contains(item))
    }

    pub fn is_equal<G>(&self, other: &CompareSet<T, G>) -> bool
    where
        G: Fn(&T, &T) -> bool,
    {
        self.is_subset_of(other) && other.is_subset_of(self)
    }
}
