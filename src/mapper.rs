//! The `objectSid` mapper and its life-cycle hooks.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::decoder::decode_str;
use crate::directory::{DirectoryObject, SearchRequest, UserRecord};
use crate::{MappingConfig, PropertySetters, SidAttributeOverlay, rewriter};

/// Exposes a directory `objectSid` as a decoded, read-only user attribute.
///
/// One mapper exists per configured mapping and is shared by every user
/// access; per-user work happens in the [`SidAttributeOverlay`] returned by
/// [`Self::proxy`].
pub struct MsadUserSidMapper<U: ?Sized> {
    config: Arc<MappingConfig>,
    properties: PropertySetters<U>,
}

impl<U: ?Sized> core::fmt::Debug for MsadUserSidMapper<U> {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MsadUserSidMapper")
            .field("config", &self.config)
            .field("properties", &self.properties)
            .finish()
    }
}

impl<U: UserRecord + ?Sized> MsadUserSidMapper<U> {
    /// Mapper for `config`, with no typed properties.
    #[inline]
    #[must_use]
    pub fn new(config: Arc<MappingConfig>) -> Self {
        Self {
            config,
            properties: PropertySetters::new(),
        }
    }

    /// Typed properties used when a non-binary mapping imports a value.
    #[inline]
    #[must_use]
    pub fn with_properties(mut self, properties: PropertySetters<U>) -> Self {
        self.properties = properties;
        self
    }

    /// The mapping this mapper applies.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Called when a directory entry is imported into the local store.
    ///
    /// Binary attributes are never written to the local record. A non-binary
    /// mapping stores the decoded value, through a typed property when one is
    /// registered under the model attribute name.
    #[inline]
    pub fn on_import_user_from_directory<D: DirectoryObject + ?Sized>(
        &self,
        directory: &D,
        user: &mut U,
        is_create: bool,
    ) {
        let model_name = self.config.model_attribute_name();
        if self.config.is_binary() {
            debug!(
                attribute = %model_name,
                user = %user.username(),
                is_create,
                "Skip importing binary directory attribute"
            );
            return;
        }

        let value = directory
            .get_raw_attribute_scalar(self.config.directory_attribute_name())
            .map(decode_str);
        if self.properties.contains(model_name) {
            self.properties.assign(user, model_name, value.as_deref());
            return;
        }
        match value {
            Some(value) => user.set_single_value(model_name, value),
            None => user.remove_attribute(model_name),
        }
    }

    /// Called when a locally created user is registered in the directory.
    ///
    /// The server generates the SID, so nothing is sent for it.
    #[inline]
    pub fn on_register_user_to_directory<D: DirectoryObject + ?Sized>(
        &self,
        directory: &mut D,
        user: &U,
    ) {
        debug!(
            attribute = %self.config.directory_attribute_name(),
            user = %user.username(),
            "Marking directory attribute read-only on registration"
        );
        directory.mark_attribute_read_only(self.config.directory_attribute_name());
    }

    /// Directory attributes searches must constrain, `None` for no constraint.
    #[inline]
    #[must_use]
    pub fn mandatory_attribute_names(&self) -> Option<BTreeSet<String>> {
        rewriter::mandatory_attribute_names(&self.config)
    }

    /// Wraps `user` so the mapped attribute is read from `directory`.
    #[inline]
    pub fn proxy<'a, D: DirectoryObject + ?Sized>(
        &'a self,
        directory: &'a D,
        user: &'a mut U,
    ) -> SidAttributeOverlay<'a, U, D> {
        SidAttributeOverlay::new(&self.config, directory, user)
    }

    /// Adjusts an outgoing search before it is sent.
    #[inline]
    pub fn before_query<Q: SearchRequest + ?Sized>(&self, query: &mut Q) {
        rewriter::rewrite_query(&self.config, query);
    }
}
