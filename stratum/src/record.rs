//! Fixed-schema records: named-field data carriers whose fields read like
//! mapping entries.
//!
//! A record's schema is the ordered list of its field names. The
//! [`crate::FieldsLayer`] adapter turns any [`Fields`] implementor into a
//! read-only chain layer keyed by field name.

use serde::{Deserialize, Serialize};

/// A fixed-schema record readable by field name.
///
/// Every name in [`Fields::field_names`] resolves to a value; names outside
/// the schema resolve to `None`.
pub trait Fields {
    /// The type every field carries.
    type Value;

    /// The schema: each field name, in declaration order.
    fn field_names(&self) -> &'static [&'static str];

    /// The value of field `name`, or `None` when the schema lacks it.
    fn field(&self, name: &str) -> Option<Self::Value>;
}

/// Effective group and user ids of the current process owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupUser {
    /// Effective group id.
    pub group: u32,
    /// Effective user id.
    pub user: u32,
}

impl Fields for GroupUser {
    type Value = u32;

    fn field_names(&self) -> &'static [&'static str] {
        &["group", "user"]
    }

    fn field(&self, name: &str) -> Option<u32> {
        match name {
            "group" => Some(self.group),
            "user" => Some(self.user),
            _ => None,
        }
    }
}

/// Name and version of an installed distribution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    /// Distribution name as published.
    pub name: String,
    /// Version string as published.
    pub version: String,
}

impl Fields for Distribution {
    type Value = String;

    fn field_names(&self) -> &'static [&'static str] {
        &["name", "version"]
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "name" => Some(self.name.clone()),
            "version" => Some(self.version.clone()),
            _ => None,
        }
    }
}
