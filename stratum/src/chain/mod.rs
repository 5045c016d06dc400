//! A mapping layered over an ordered stack of key-value sources.
//!
//! [`Chain`] composes any number of [`Layer`] sources into one logical
//! mapping. Construction fixes the layer order and the [`Resolve`] policy;
//! lookups combine values across layers according to that policy, while
//! writes and deletes only ever touch the first layer (the "local" layer).

mod error;
mod layer;
mod policy;

pub use error::{ChainError, ChainResult};
pub use layer::{FieldsLayer, Layer};
pub use policy::{Resolve, Resolved};

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

/// An ordered stack of layers resolved under a single policy.
///
/// Layer order is fixed at construction and determines both override
/// precedence and the aggregation order of the [`Resolve::All`] and
/// [`Resolve::Unique`] policies. Exactly one policy (and, for
/// [`Resolve::FirstOr`], one default) is active for the chain's lifetime.
///
/// ```
/// use std::collections::HashMap;
/// use stratum::{Chain, Resolve, Resolved};
///
/// let local = HashMap::from([("a", 1)]);
/// let base = HashMap::from([("a", 2), ("b", 3)]);
/// let mut chain = Chain::builder(Resolve::First)
///     .layer(local)
///     .layer(base)
///     .build();
///
/// assert_eq!(chain.get(&"a")?, Resolved::One(1));
/// assert_eq!(chain.get(&"b")?, Resolved::One(3));
///
/// // Deleting from the local layer falls through to the next layer.
/// chain.delete(&"a")?;
/// assert_eq!(chain.get(&"a")?, Resolved::One(2));
/// # Ok::<_, stratum::ChainError>(())
/// ```
pub struct Chain<K, V> {
    layers: Vec<Box<dyn Layer<K, V>>>,
    policy: Resolve<V>,
}

impl<K, V> Chain<K, V> {
    /// Start building a chain resolved under `policy`.
    #[must_use]
    pub fn builder(policy: Resolve<V>) -> ChainBuilder<K, V> {
        ChainBuilder {
            layers: Vec::new(),
            policy,
        }
    }

    /// A chain over a single empty in-memory map: the writable trivial
    /// case, equivalent to building with one fresh [`HashMap`] layer.
    #[must_use]
    pub fn new(policy: Resolve<V>) -> Self
    where
        K: Eq + Hash + Clone + 'static,
        V: Clone + 'static,
    {
        Self::builder(policy).layer(HashMap::new()).build()
    }

    /// The number of layers in the stack.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// The policy the chain was built with.
    #[must_use]
    pub const fn policy(&self) -> &Resolve<V> {
        &self.policy
    }

    /// Resolve `key` across the stack according to the chain's policy.
    ///
    /// A key absent from every layer fails with
    /// [`ChainError::KeyNotFound`] under every policy except
    /// [`Resolve::FirstOr`], which yields its default instead. This
    /// includes [`Resolve::All`], which never produces an empty sequence.
    ///
    /// # Errors
    ///
    /// - [`ChainError::KeyNotFound`] when no layer contains `key`.
    /// - [`ChainError::InconsistentValue`] when the layers disagree under
    ///   [`Resolve::Unique`].
    pub fn get(&self, key: &K) -> ChainResult<Resolved<V>>
    where
        K: fmt::Display,
        V: Clone + PartialEq + fmt::Debug,
    {
        match &self.policy {
            Resolve::First => self
                .first_hit(key)
                .map(Resolved::One)
                .ok_or_else(|| ChainError::key_not_found(key)),
            Resolve::FirstOr(default) => Ok(Resolved::One(
                self.first_hit(key).unwrap_or_else(|| default.clone()),
            )),
            Resolve::All => {
                let found = self.collect_hits(key);
                if found.is_empty() {
                    Err(ChainError::key_not_found(key))
                } else {
                    Ok(Resolved::Many(found))
                }
            }
            Resolve::Unique => {
                let found = self.collect_hits(key);
                let Some(first) = found.first() else {
                    return Err(ChainError::key_not_found(key));
                };
                if found.iter().any(|value| value != first) {
                    return Err(ChainError::inconsistent(key, &found));
                }
                Ok(Resolved::One(first.clone()))
            }
        }
    }

    /// Store `value` under `key` in the local layer only.
    ///
    /// Lower-precedence layers are never written; a subsequent first-match
    /// lookup of `key` returns `value` regardless of what they hold.
    /// Returns the chain for fluent call chaining.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::ImmutableLayer`] when the local layer does
    /// not support mutation (or the chain has no layers at all).
    pub fn set(&mut self, key: K, value: V) -> ChainResult<&mut Self> {
        let Some(local) = self.layers.first_mut() else {
            return Err(ChainError::ImmutableLayer);
        };
        local.set(key, value)?;
        Ok(self)
    }

    /// Remove `key` from the local layer only.
    ///
    /// Deletion never targets the effective value: a key still visible
    /// through lower-precedence layers afterwards is expected, and
    /// first-match lookups then fall through to the next layer that holds
    /// it. Returns the chain for fluent call chaining.
    ///
    /// # Errors
    ///
    /// - [`ChainError::KeyNotFound`] when the local layer does not
    ///   currently hold `key`, even if other layers do.
    /// - [`ChainError::ImmutableLayer`] when the local layer does not
    ///   support mutation.
    pub fn delete(&mut self, key: &K) -> ChainResult<&mut Self>
    where
        K: fmt::Display,
    {
        let Some(local) = self.layers.first_mut() else {
            return Err(ChainError::ImmutableLayer);
        };
        match local.remove(key)? {
            Some(_) => Ok(self),
            None => Err(ChainError::key_not_found(key)),
        }
    }

    /// Every key visible through the stack, deduplicated to its first
    /// occurrence, in layer order.
    #[must_use]
    pub fn keys(&self) -> Vec<K>
    where
        K: Eq + Hash + Clone,
    {
        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        for layer in &self.layers {
            for key in layer.keys() {
                if seen.insert(key.clone()) {
                    keys.push(key);
                }
            }
        }
        keys
    }

    fn first_hit(&self, key: &K) -> Option<V> {
        self.layers.iter().find_map(|layer| layer.get(key))
    }

    fn collect_hits(&self, key: &K) -> Vec<V> {
        self.layers
            .iter()
            .filter_map(|layer| layer.get(key))
            .collect()
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Chain<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("layers", &self.layers.len())
            .field("policy", &self.policy)
            .finish()
    }
}

/// Builder that fixes a chain's layer stack and policy.
///
/// Layers resolve in the order they are pushed: the first becomes the
/// mutable local layer, later ones are consulted in turn on lookups. The
/// stack cannot change after [`ChainBuilder::build`].
pub struct ChainBuilder<K, V> {
    layers: Vec<Box<dyn Layer<K, V>>>,
    policy: Resolve<V>,
}

impl<K, V> ChainBuilder<K, V> {
    /// Push `layer` onto the stack.
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<K, V> + 'static,
    {
        self.layers.push(Box::new(layer));
        self
    }

    /// Push an already-boxed layer onto the stack.
    #[must_use]
    pub fn boxed(mut self, layer: Box<dyn Layer<K, V>>) -> Self {
        self.layers.push(layer);
        self
    }

    /// Finish construction.
    ///
    /// Building with no layers yields an inert chain: every lookup fails
    /// with [`ChainError::KeyNotFound`] and every write with
    /// [`ChainError::ImmutableLayer`]. Use [`Chain::new`] for a writable
    /// empty chain.
    #[must_use]
    pub fn build(self) -> Chain<K, V> {
        Chain {
            layers: self.layers,
            policy: self.policy,
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for ChainBuilder<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainBuilder")
            .field("layers", &self.layers.len())
            .field("policy", &self.policy)
            .finish()
    }
}
