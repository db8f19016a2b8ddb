//! Reference model of the `ArraySplice` polyfill.
//!
//! A source-language array can contain holes: slots that were never
//! assigned, as opposed to slots holding an explicit absent value. Here a
//! hole is `None` and every present element is `Some`, so `T` may itself be
//! a nullable type without the two notions mixing.

/// An array that may contain holes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SparseArray<T> {
    slots: Vec<Option<T>>,
}

impl<T> SparseArray<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Build from raw slots; `None` marks a hole.
    pub fn from_slots(slots: Vec<Option<T>>) -> Self {
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The element at `index`, or `None` for a hole or out of bounds.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn is_hole(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(None))
    }

    pub fn slots(&self) -> &[Option<T>] {
        &self.slots
    }

    pub fn into_slots(self) -> Vec<Option<T>> {
        self.slots
    }

    /// Remove `delete_count` elements at `start` and insert `items` in their
    /// place, returning the removed elements.
    ///
    /// A negative `start` counts from the end. An omitted `delete_count`
    /// deletes through the end. Holes inside the deleted region stay holes
    /// in the returned array, and holes in the shifted tail move with it.
    pub fn splice(&mut self, start: i64, delete_count: Option<i64>, items: Vec<T>) -> SparseArray<T> {
        let len = self.slots.len() as i64;

        let actual_start = if start < 0 {
            (len + start).max(0) as usize
        } else {
            start.min(len) as usize
        };

        let actual_delete_count = match delete_count {
            None => len as usize - actual_start,
            Some(count) => count.clamp(0, len - actual_start as i64) as usize,
        };

        let len = len as usize;
        let item_count = items.len();

        // Every slot taken here is either overwritten below or truncated.
        let removed: Vec<Option<T>> = self.slots[actual_start..actual_start + actual_delete_count]
            .iter_mut()
            .map(Option::take)
            .collect();

        let new_len = len - actual_delete_count + item_count;

        if item_count < actual_delete_count {
            for k in actual_start..len - actual_delete_count {
                let from = k + actual_delete_count;
                let to = k + item_count;
                self.slots[to] = self.slots[from].take();
            }
            self.slots.truncate(new_len);
        } else if item_count > actual_delete_count {
            self.slots.resize_with(new_len, || None);
            for k in (actual_start + 1..=len - actual_delete_count).rev() {
                let from = k + actual_delete_count - 1;
                let to = k + item_count - 1;
                self.slots[to] = self.slots[from].take();
            }
        }

        for (offset, item) in items.into_iter().enumerate() {
            self.slots[actual_start + offset] = Some(item);
        }

        SparseArray::from_slots(removed)
    }
}

impl<T> From<Vec<T>> for SparseArray<T> {
    fn from(values: Vec<T>) -> Self {
        Self::from_slots(values.into_iter().map(Some).collect())
    }
}

impl<T> FromIterator<T> for SparseArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_slots(iter.into_iter().map(Some).collect())
    }
}
