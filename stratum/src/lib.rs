//! Layered mappings with configurable value resolution, plus small
//! process-failure and scratch-directory utilities.
//!
//! The centrepiece is [`Chain`]: an ordered stack of mapping-like
//! [`Layer`] sources resolved under one [`Resolve`] policy — first match,
//! all matches, or unique-value enforcement — with writes and deletes
//! confined to the first ("local") layer. The remaining modules are
//! independent leaf utilities: fixed-schema [`record`]s that double as
//! read-only layers, a subprocess failure wrapper in [`process`], and the
//! self-cleaning [`ScratchDir`].

pub mod chain;
pub mod process;
pub mod record;
pub mod scratch;

pub use chain::{
    Chain, ChainBuilder, ChainError, ChainResult, FieldsLayer, Layer, Resolve, Resolved,
};
pub use process::{CommandFailed, ProcessError, checked_output};
pub use record::{Distribution, Fields, GroupUser};
pub use scratch::{ScratchDir, ScratchError};
