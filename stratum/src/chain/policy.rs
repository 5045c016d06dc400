//! Resolution policies and the values a lookup produces under them.

/// Rule for combining values when a key exists in more than one layer.
///
/// The policy is chosen at construction and fixed for the chain's lifetime.
/// This is a closed set: the behaviours below are the only ones a chain can
/// exhibit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolve<V> {
    /// The earliest containing layer (in construction order) wins. This is
    /// the conventional layered-override semantics.
    First,
    /// Every containing layer contributes its value, in layer order.
    All,
    /// All containing layers must hold the same value; disagreement is an
    /// error.
    Unique,
    /// Like [`Resolve::First`], but a key absent from every layer yields
    /// the carried default instead of failing.
    FirstOr(V),
}

/// Outcome of a successful lookup, shaped by the chain's policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolved<V> {
    /// A single value, produced by the first-match and unique policies.
    One(V),
    /// One value per containing layer, produced by [`Resolve::All`].
    Many(Vec<V>),
}

impl<V> Resolved<V> {
    /// The single value, or `None` when the lookup produced a sequence.
    #[must_use]
    pub fn into_one(self) -> Option<V> {
        match self {
            Self::One(value) => Some(value),
            Self::Many(_) => None,
        }
    }

    /// The value sequence, or `None` when the lookup produced a single
    /// value.
    #[must_use]
    pub fn into_many(self) -> Option<Vec<V>> {
        match self {
            Self::One(_) => None,
            Self::Many(values) => Some(values),
        }
    }
}
