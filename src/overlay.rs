//! User record overlay for a directory-sourced binary attribute.
//!
//! [`SidAttributeOverlay`] wraps a [`UserRecord`] and answers for exactly one
//! attribute name, the mapping's model attribute:
//! - reads (when the mapping is read-only) are computed from the raw
//!   directory value, never from the local record;
//! - writes (when the mapping is binary) are dropped.
//!
//! Every other name goes straight to the wrapped record.

use delegate::delegate;
use tracing::debug;

use crate::MappingConfig;
use crate::decoder::decode_str;
use crate::directory::{Attributes, DirectoryObject, UserRecord};
use crate::utils::names_match;

/// Per-access view of a user record with the mapped attribute computed from
/// the directory.
///
/// # Examples
/// ```rust
/// # use msad_sid_mapper::{MappingConfig, RawAttributeValue, SidAttributeOverlay, UserRecord};
/// # use msad_sid_mapper::memory::{DirectoryEntry, InMemoryUser};
/// let config = MappingConfig::object_sid("sid");
/// let mut entry = DirectoryEntry::new();
/// entry.insert("objectSid", RawAttributeValue::encode([1, 1, 0, 0, 0, 0, 0, 5, 18, 0, 0, 0]));
/// let mut user = InMemoryUser::new("system");
///
/// let mut overlay = SidAttributeOverlay::new(&config, &entry, &mut user);
/// overlay.set_single_value("sid", "S-1-0-0".to_owned());
/// assert_eq!(overlay.get_single_value("sid").as_deref(), Some("S-1-5-18"));
/// ```
pub struct SidAttributeOverlay<'a, U: ?Sized, D: ?Sized> {
    config: &'a MappingConfig,
    directory: &'a D,
    inner: &'a mut U,
}

impl<'a, U, D> SidAttributeOverlay<'a, U, D>
where
    U: UserRecord + ?Sized,
    D: DirectoryObject + ?Sized,
{
    /// Wraps `inner` for one access.
    #[inline]
    pub const fn new(config: &'a MappingConfig, directory: &'a D, inner: &'a mut U) -> Self {
        Self {
            config,
            directory,
            inner,
        }
    }

    /// The mapping this overlay applies.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &MappingConfig {
        self.config
    }

    fn reads_from_directory(&self, name: &str) -> bool {
        self.config.is_read_only() && names_match(name, self.config.model_attribute_name())
    }

    fn skips_write(&self, name: &str) -> bool {
        if self.config.is_binary() && names_match(name, self.config.model_attribute_name()) {
            debug!(
                attribute = %self.config.model_attribute_name(),
                user = %self.inner.username(),
                "Skip writing model attribute to DB as it is mapped to binary directory attribute"
            );
            return true;
        }
        false
    }

    fn decoded_values(&self) -> Option<impl Iterator<Item = String> + '_> {
        self.directory
            .get_raw_attribute_set(self.config.directory_attribute_name())
            .map(|raw_values| raw_values.iter().map(decode_str))
    }
}

impl<U, D> UserRecord for SidAttributeOverlay<'_, U, D>
where
    U: UserRecord + ?Sized,
    D: DirectoryObject + ?Sized,
{
    delegate! {
        to self.inner {
            fn username(&self) -> &str;
        }
    }

    fn get_single_value(&self, name: &str) -> Option<String> {
        if !self.reads_from_directory(name) {
            return self.inner.get_single_value(name);
        }
        self.directory
            .get_raw_attribute_scalar(self.config.directory_attribute_name())
            .map(decode_str)
    }

    /// Decoded values follow the raw set's order (sorted by encoded text).
    fn get_values(&self, name: &str) -> Vec<String> {
        if !self.reads_from_directory(name) {
            return self.inner.get_values(name);
        }
        self.decoded_values()
            .map(Iterator::collect)
            .unwrap_or_default()
    }

    fn get_all_attributes(&self) -> Attributes {
        let mut attributes = self.inner.get_all_attributes();
        if !self.config.is_read_only() {
            return attributes;
        }
        let model_name = self.config.model_attribute_name();
        attributes.retain(|name, _| !names_match(name, model_name));
        if let Some(decoded) = self.decoded_values() {
            let mut values: Vec<String> = Vec::new();
            for value in decoded {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
            attributes.insert(model_name.to_owned(), values);
        }
        attributes
    }

    fn set_single_value(&mut self, name: &str, value: String) {
        if !self.skips_write(name) {
            self.inner.set_single_value(name, value);
        }
    }

    fn set_values(&mut self, name: &str, values: Vec<String>) {
        if !self.skips_write(name) {
            self.inner.set_values(name, values);
        }
    }

    fn remove_attribute(&mut self, name: &str) {
        if !self.skips_write(name) {
            self.inner.remove_attribute(name);
        }
    }
}
