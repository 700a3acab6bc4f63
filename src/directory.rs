//! Collaborators the mapper works against.
//!
//! The host supplies implementations of these traits; the mapper never talks
//! to a directory server or a database itself. [`crate::memory`] has simple
//! in-memory versions.

use std::collections::{BTreeMap, BTreeSet};

use crate::RawAttributeValue;
use crate::utils::names_match;

/// All attributes of a user record, by name.
pub type Attributes = BTreeMap<String, Vec<String>>;

/// Directory entry fetched for one user.
pub trait DirectoryObject {
    /// First raw value of `name`, if the entry has one.
    fn get_raw_attribute_scalar(&self, name: &str) -> Option<&RawAttributeValue>;

    /// Every raw value of `name`, if the entry has the attribute.
    ///
    /// The set is ordered by encoded text; the server's value order is lost.
    fn get_raw_attribute_set(&self, name: &str) -> Option<&BTreeSet<RawAttributeValue>>;

    /// Marks `name` as generated by the server: it is never sent on write.
    fn mark_attribute_read_only(&mut self, name: &str);
}

/// Accessor over a locally stored user record.
pub trait UserRecord {
    /// Login name, used in diagnostics.
    fn username(&self) -> &str;

    /// First value of `name`, `None` when the attribute is not set.
    fn get_single_value(&self, name: &str) -> Option<String>;

    /// Every value of `name`, empty when the attribute is not set.
    fn get_values(&self, name: &str) -> Vec<String>;

    /// Every attribute of the record with all its values.
    fn get_all_attributes(&self) -> Attributes;

    /// Replaces `name` with a single value.
    fn set_single_value(&mut self, name: &str, value: String);

    /// Replaces `name` with `values`.
    fn set_values(&mut self, name: &str, values: Vec<String>);

    /// Removes `name` and all its values.
    fn remove_attribute(&mut self, name: &str);
}

/// Outgoing directory search, before it is sent.
pub trait SearchRequest {
    /// Requests `name` in the returned entries.
    fn add_returning_attribute(&mut self, name: &str);

    /// Requests `name` and flags it as never written back by the query layer.
    fn add_returning_read_only_attribute(&mut self, name: &str);

    /// Filter terms, in order.
    fn conditions_mut(&mut self) -> &mut [Condition];
}

/// Directory-wide settings a mapper contributes to at configuration time.
pub trait DirectorySettings {
    /// Declares `name` as binary: its values travel base64-encoded.
    fn add_binary_attribute(&mut self, name: &str);
}

/// One filter term of a search.
///
/// Composite terms (e.g. a raw filter string) have no parameter name and are
/// left alone by attribute renaming.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Condition {
    parameter_name: Option<String>,
    value: String,
    binary: bool,
}

impl Condition {
    /// Equality term `(name=value)`.
    #[inline]
    #[must_use]
    pub fn equal<N: Into<String>, V: Into<String>>(parameter_name: N, value: V) -> Self {
        Self {
            parameter_name: Some(parameter_name.into()),
            value: value.into(),
            binary: false,
        }
    }

    /// Term given as a literal filter string, without a parameter.
    #[inline]
    #[must_use]
    pub fn raw_filter<F: Into<String>>(filter: F) -> Self {
        Self {
            parameter_name: None,
            value: filter.into(),
            binary: false,
        }
    }

    /// Attribute the term constrains, `None` for a raw filter.
    #[inline]
    #[must_use]
    pub fn parameter_name(&self) -> Option<&str> {
        self.parameter_name.as_deref()
    }

    /// Compared value, or the literal filter.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the value must be sent as binary.
    #[inline]
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        self.binary
    }

    /// Flags the value as binary (or not).
    #[inline]
    pub const fn set_binary(&mut self, binary: bool) {
        self.binary = binary;
    }

    /// Renames the parameter to `to` if it currently matches `from`, ignoring case.
    #[inline]
    pub fn update_parameter_name(&mut self, from: &str, to: &str) {
        if let Some(name) = self.parameter_name.as_mut() {
            if names_match(name, from) {
                to.clone_into(name);
            }
        }
    }
}
