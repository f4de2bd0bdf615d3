//! Keyed upsert and merge primitives shared by every level of the hierarchy.

use std::collections::BTreeMap;

use crate::domain::Key;

/// Folds another instance of the same entity into `self`.
///
/// Child collections are unioned by key. Scalar attributes take the incoming
/// value when it is non-empty (last seen wins). Merging the same value twice
/// leaves the entity unchanged.
pub trait Merge {
    /// Merge `other` into `self`.
    fn merge(&mut self, other: Self);
}

/// Get-or-create access to a keyed collection of entities.
pub trait Upsert<V> {
    /// Returns the entity stored under `key`, inserting the result of
    /// `factory` first if there is none.
    fn upsert(&mut self, key: Key, factory: impl FnOnce() -> V) -> &mut V;

    /// Merges `value` into the entity stored under `key`, or inserts it.
    fn merge_entry(&mut self, key: Key, value: V)
    where
        V: Merge;

    /// Merges every entry of `other` into `self`.
    fn merge_all(&mut self, other: BTreeMap<Key, V>)
    where
        V: Merge,
    {
        for (key, value) in other {
            self.merge_entry(key, value);
        }
    }
}

impl<V> Upsert<V> for BTreeMap<Key, V> {
    fn upsert(&mut self, key: Key, factory: impl FnOnce() -> V) -> &mut V {
        self.entry(key).or_insert_with(factory)
    }

    fn merge_entry(&mut self, key: Key, value: V)
    where
        V: Merge,
    {
        match self.get_mut(&key) {
            Some(existing) => existing.merge(value),
            None => {
                self.insert(key, value);
            }
        }
    }
}

/// Replaces `current` with `incoming` unless `incoming` is empty.
pub(super) fn merge_scalar(current: &mut String, incoming: String) {
    if !incoming.is_empty() {
        *current = incoming;
    }
}

/// Replaces `current` with `incoming` when one is present.
pub(super) fn merge_optional<T>(current: &mut Option<T>, incoming: Option<T>) {
    if incoming.is_some() {
        *current = incoming;
    }
}
