//! The ordered collection handed back to callers of tagged functions
//!
//! A `List` is either modifiable or frozen. Frozen lists come from
//! `NotNullDefault(modifiable = false)` and refuse every mutation with
//! `MutationError::Unsupported`.

use crate::error::MutationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::Deref;

/// Whether a `List` accepts mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    Modifiable,
    Frozen,
}

/// An owned, ordered sequence with an explicit mutability contract.
#[derive(Debug, Clone)]
pub struct List<T> {
    items: Vec<T>,
    mutability: Mutability,
}

impl<T> List<T> {
    /// A new, empty, modifiable list.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            mutability: Mutability::Modifiable,
        }
    }

    /// A new, empty list that rejects all mutation.
    pub fn frozen() -> Self {
        Self {
            items: Vec::new(),
            mutability: Mutability::Frozen,
        }
    }

    /// Empty list with the requested mutability.
    pub fn empty(modifiable: bool) -> Self {
        if modifiable {
            Self::new()
        } else {
            Self::frozen()
        }
    }

    pub fn mutability(&self) -> Mutability {
        self.mutability
    }

    pub fn is_modifiable(&self) -> bool {
        self.mutability == Mutability::Modifiable
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    pub fn push(&mut self, item: T) -> Result<(), MutationError> {
        self.check("push")?;
        self.items.push(item);
        Ok(())
    }

    pub fn insert(&mut self, index: usize, item: T) -> Result<(), MutationError> {
        self.check("insert")?;
        self.items.insert(index, item);
        Ok(())
    }

    /// Remove and return the element at `index`, or `None` if out of range.
    pub fn remove(&mut self, index: usize) -> Result<Option<T>, MutationError> {
        self.check("remove")?;
        if index < self.items.len() {
            Ok(Some(self.items.remove(index)))
        } else {
            Ok(None)
        }
    }

    pub fn clear(&mut self) -> Result<(), MutationError> {
        self.check("clear")?;
        self.items.clear();
        Ok(())
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = T>) -> Result<(), MutationError> {
        self.check("extend")?;
        self.items.extend(items);
        Ok(())
    }

    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) -> Result<(), MutationError> {
        self.check("retain")?;
        self.items.retain(keep);
        Ok(())
    }

    /// Rewrite the contents while keeping the mutability.
    ///
    /// Transforms run on a freshly produced result before any caller sees it,
    /// so this bypasses the frozen check.
    pub(crate) fn map_items(self, f: impl FnOnce(Vec<T>) -> Vec<T>) -> Self {
        Self {
            items: f(self.items),
            mutability: self.mutability,
        }
    }

    fn check(&self, operation: &'static str) -> Result<(), MutationError> {
        match self.mutability {
            Mutability::Modifiable => Ok(()),
            Mutability::Frozen => Err(MutationError::Unsupported { operation }),
        }
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for List<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> From<Vec<T>> for List<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items,
            mutability: Mutability::Modifiable,
        }
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// Equality is by contents; mutability is not part of a list's value.
impl<T: PartialEq> PartialEq for List<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq> Eq for List<T> {}

impl<T: PartialEq> PartialEq<Vec<T>> for List<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        &self.items == other
    }
}

impl<T: PartialEq> PartialEq<[T]> for List<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.items.as_slice() == other
    }
}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for List<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.items.as_slice() == other.as_slice()
    }
}

impl<T: Serialize> Serialize for List<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for List<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(List::from)
    }
}
