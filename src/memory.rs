//! In-memory collaborators.
//!
//! Plain implementations of the [`crate::directory`] traits, for hosts that
//! keep entries in memory and for tests.

use std::collections::{BTreeMap, BTreeSet};

use crate::RawAttributeValue;
use crate::directory::{
    Attributes, Condition, DirectoryObject, DirectorySettings, SearchRequest, UserRecord,
};
use crate::utils::names_match;

/// Locally stored user record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryUser {
    username: String,
    attributes: Attributes,
}

impl InMemoryUser {
    /// Record without attributes.
    #[inline]
    #[must_use]
    pub fn new<S: Into<String>>(username: S) -> Self {
        Self {
            username: username.into(),
            attributes: Attributes::new(),
        }
    }
}

impl UserRecord for InMemoryUser {
    #[inline]
    fn username(&self) -> &str {
        &self.username
    }

    #[inline]
    fn get_single_value(&self, name: &str) -> Option<String> {
        self.attributes
            .get(name)
            .and_then(|values| values.first())
            .cloned()
    }

    #[inline]
    fn get_values(&self, name: &str) -> Vec<String> {
        self.attributes.get(name).cloned().unwrap_or_default()
    }

    #[inline]
    fn get_all_attributes(&self) -> Attributes {
        self.attributes.clone()
    }

    #[inline]
    fn set_single_value(&mut self, name: &str, value: String) {
        self.attributes.insert(name.to_owned(), vec![value]);
    }

    #[inline]
    fn set_values(&mut self, name: &str, values: Vec<String>) {
        self.attributes.insert(name.to_owned(), values);
    }

    #[inline]
    fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
    }
}

/// Directory entry with case-insensitive attribute names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryEntry {
    // Keyed by lowercased name.
    attributes: BTreeMap<String, BTreeSet<RawAttributeValue>>,
    read_only_attributes: BTreeSet<String>,
}

impl DirectoryEntry {
    /// Entry without attributes.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one raw value to `name`.
    #[inline]
    pub fn insert(&mut self, name: &str, value: RawAttributeValue) {
        self.attributes
            .entry(name.to_lowercase())
            .or_default()
            .insert(value);
    }

    /// Whether `name` was marked read-only, ignoring case.
    #[inline]
    #[must_use]
    pub fn is_read_only(&self, name: &str) -> bool {
        self.read_only_attributes.contains(&name.to_lowercase())
    }
}

impl DirectoryObject for DirectoryEntry {
    #[inline]
    fn get_raw_attribute_scalar(&self, name: &str) -> Option<&RawAttributeValue> {
        self.get_raw_attribute_set(name)
            .and_then(BTreeSet::first)
    }

    #[inline]
    fn get_raw_attribute_set(&self, name: &str) -> Option<&BTreeSet<RawAttributeValue>> {
        self.attributes.get(&name.to_lowercase())
    }

    #[inline]
    fn mark_attribute_read_only(&mut self, name: &str) {
        self.read_only_attributes.insert(name.to_lowercase());
    }
}

/// Search request under construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryQuery {
    returning_attributes: Vec<String>,
    returning_read_only_attributes: Vec<String>,
    conditions: Vec<Condition>,
}

impl DirectoryQuery {
    /// Query without conditions or returning attributes.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a filter term.
    #[inline]
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Attributes requested in the returned entries.
    #[inline]
    #[must_use]
    pub fn returning_attributes(&self) -> &[String] {
        &self.returning_attributes
    }

    /// Requested attributes flagged read-only.
    #[inline]
    #[must_use]
    pub fn returning_read_only_attributes(&self) -> &[String] {
        &self.returning_read_only_attributes
    }

    /// Filter terms, in order.
    #[inline]
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

fn insert_name(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|existing| names_match(existing, name)) {
        names.push(name.to_owned());
    }
}

impl SearchRequest for DirectoryQuery {
    #[inline]
    fn add_returning_attribute(&mut self, name: &str) {
        insert_name(&mut self.returning_attributes, name);
    }

    #[inline]
    fn add_returning_read_only_attribute(&mut self, name: &str) {
        insert_name(&mut self.returning_read_only_attributes, name);
    }

    #[inline]
    fn conditions_mut(&mut self) -> &mut [Condition] {
        &mut self.conditions
    }
}

/// Directory-wide settings, collecting binary attribute names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryDirectorySettings {
    binary_attributes: Vec<String>,
}

impl InMemoryDirectorySettings {
    /// Settings without binary attributes.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes declared binary, in registration order.
    #[inline]
    #[must_use]
    pub fn binary_attributes(&self) -> &[String] {
        &self.binary_attributes
    }
}

impl DirectorySettings for InMemoryDirectorySettings {
    #[inline]
    fn add_binary_attribute(&mut self, name: &str) {
        insert_name(&mut self.binary_attributes, name);
    }
}
