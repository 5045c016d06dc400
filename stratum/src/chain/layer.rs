//! The layer capability trait and adapters for common sources.
//!
//! A layer is any key-value source a chain can consult: an ordinary map, a
//! fixed-schema record, or a shared handle to either. Layers are read-only
//! from the chain's perspective unless they opt into mutation; only the
//! local layer (layer 0) is ever asked to mutate.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::rc::Rc;

use crate::record::Fields;

use super::error::ChainError;

/// Minimal capability set a chain requires of each source.
///
/// Values are cloned out of the layer: lookups return owned `V` so that
/// shared and interior-mutable sources can participate without handing out
/// borrows.
pub trait Layer<K, V> {
    /// Whether the layer currently holds `key`.
    fn contains(&self, key: &K) -> bool;

    /// The value stored for `key`, if present.
    fn get(&self, key: &K) -> Option<V>;

    /// Every key the layer currently exposes, in the layer's own order.
    fn keys(&self) -> Vec<K>;

    /// Store `value` under `key`.
    ///
    /// Layers are read-only unless they override this.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::ImmutableLayer`] when the layer does not
    /// support mutation.
    fn set(&mut self, key: K, value: V) -> Result<(), ChainError> {
        let _ = (key, value);
        Err(ChainError::ImmutableLayer)
    }

    /// Remove `key`, returning the removed value or `Ok(None)` when the
    /// layer did not hold it.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::ImmutableLayer`] when the layer does not
    /// support mutation.
    fn remove(&mut self, key: &K) -> Result<Option<V>, ChainError> {
        let _ = key;
        Err(ChainError::ImmutableLayer)
    }
}

impl<K, V> Layer<K, V> for HashMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn contains(&self, key: &K) -> bool {
        self.contains_key(key)
    }

    fn get(&self, key: &K) -> Option<V> {
        HashMap::get(self, key).cloned()
    }

    fn keys(&self) -> Vec<K> {
        HashMap::keys(self).cloned().collect()
    }

    fn set(&mut self, key: K, value: V) -> Result<(), ChainError> {
        self.insert(key, value);
        Ok(())
    }

    fn remove(&mut self, key: &K) -> Result<Option<V>, ChainError> {
        Ok(HashMap::remove(self, key))
    }
}

impl<K, V> Layer<K, V> for BTreeMap<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    fn contains(&self, key: &K) -> bool {
        self.contains_key(key)
    }

    fn get(&self, key: &K) -> Option<V> {
        BTreeMap::get(self, key).cloned()
    }

    fn keys(&self) -> Vec<K> {
        BTreeMap::keys(self).cloned().collect()
    }

    fn set(&mut self, key: K, value: V) -> Result<(), ChainError> {
        self.insert(key, value);
        Ok(())
    }

    fn remove(&mut self, key: &K) -> Result<Option<V>, ChainError> {
        Ok(BTreeMap::remove(self, key))
    }
}

/// Shared handle to a layer.
///
/// The chain stores the handle, not a copy, so mutation of the underlying
/// source after construction remains visible through the chain. The
/// `RefCell` keeps the chain single-threaded by construction.
impl<K, V, L> Layer<K, V> for Rc<RefCell<L>>
where
    L: Layer<K, V>,
{
    fn contains(&self, key: &K) -> bool {
        self.borrow().contains(key)
    }

    fn get(&self, key: &K) -> Option<V> {
        self.borrow().get(key)
    }

    fn keys(&self) -> Vec<K> {
        self.borrow().keys()
    }

    fn set(&mut self, key: K, value: V) -> Result<(), ChainError> {
        self.borrow_mut().set(key, value)
    }

    fn remove(&mut self, key: &K) -> Result<Option<V>, ChainError> {
        self.borrow_mut().remove(key)
    }
}

/// Adapter exposing a fixed-schema record as a read-only layer keyed by
/// field name.
#[derive(Clone, Debug)]
pub struct FieldsLayer<R>(
    /// The wrapped record.
    pub R,
);

impl<R> Layer<String, R::Value> for FieldsLayer<R>
where
    R: Fields,
{
    fn contains(&self, key: &String) -> bool {
        self.0.field_names().contains(&key.as_str())
    }

    fn get(&self, key: &String) -> Option<R::Value> {
        self.0.field(key)
    }

    fn keys(&self) -> Vec<String> {
        self.0
            .field_names()
            .iter()
            .map(|name| (*name).to_owned())
            .collect()
    }
}
