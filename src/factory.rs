//! Provider metadata and mapper construction.

use std::sync::Arc;

use crate::config::{ComponentConfig, OBJECT_SID_ATTRIBUTE, USER_MODEL_ATTRIBUTE};
use crate::directory::{DirectorySettings, UserRecord};
use crate::{ConfigError, MappingConfig, MsadUserSidMapper, PropertySetters};

/// Identifier the mapper is registered under.
pub const PROVIDER_ID: &str = "msad-user-sid-ldap-mapper";

/// Description shown to administrators.
pub const HELP_TEXT: &str = "Used to map objectSID from LDAP user to attribute of UserModel \
     (ObjectSID is a Binary attribute and is always read from LDAP)";

/// Kind of value a configuration property accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigPropertyKind {
    /// Free text.
    String,
}

/// Declaration of one configuration property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigProperty {
    /// Key in the component configuration.
    pub name: &'static str,
    /// Short name shown to administrators.
    pub label: &'static str,
    /// Longer description shown to administrators.
    pub help_text: &'static str,
    /// Accepted value kind.
    pub kind: ConfigPropertyKind,
}

/// Every property the mapper reads.
pub const CONFIG_PROPERTIES: &[ConfigProperty] = &[ConfigProperty {
    name: USER_MODEL_ATTRIBUTE,
    label: "User Model Attribute",
    help_text: "Name of the UserModel property or attribute you want to map the LDAP \
                attribute into. For example 'firstName', 'lastName, 'email', 'street' etc.",
    kind: ConfigPropertyKind::String,
}];

/// Creates [`MsadUserSidMapper`]s from host component configurations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MsadUserSidMapperFactory;

impl MsadUserSidMapperFactory {
    /// [`PROVIDER_ID`].
    #[inline]
    #[must_use]
    pub const fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    /// [`HELP_TEXT`].
    #[inline]
    #[must_use]
    pub const fn help_text(&self) -> &'static str {
        HELP_TEXT
    }

    /// [`CONFIG_PROPERTIES`].
    #[inline]
    #[must_use]
    pub const fn config_properties(&self) -> &'static [ConfigProperty] {
        CONFIG_PROPERTIES
    }

    /// Checks a component configuration before it is saved.
    ///
    /// # Errors
    /// [`ConfigError`] if the user model attribute is missing or blank.
    #[inline]
    pub fn validate_configuration(&self, config: &ComponentConfig) -> Result<(), ConfigError> {
        MappingConfig::from_component_config(config).map(drop)
    }

    /// Builds a mapper for one component configuration.
    ///
    /// # Errors
    /// [`ConfigError`] if the configuration does not validate.
    #[inline]
    pub fn create_mapper<U: UserRecord + ?Sized>(
        &self,
        config: &ComponentConfig,
    ) -> Result<MsadUserSidMapper<U>, ConfigError> {
        self.create_mapper_with_properties(config, PropertySetters::new())
    }

    /// [`Self::create_mapper`] with a typed property table.
    ///
    /// # Errors
    /// [`ConfigError`] if the configuration does not validate.
    #[inline]
    pub fn create_mapper_with_properties<U: UserRecord + ?Sized>(
        &self,
        config: &ComponentConfig,
        properties: PropertySetters<U>,
    ) -> Result<MsadUserSidMapper<U>, ConfigError> {
        let mapping = MappingConfig::from_component_config(config)?;
        Ok(MsadUserSidMapper::new(Arc::new(mapping)).with_properties(properties))
    }

    /// Declares `objectSid` binary so the directory client base64-encodes it.
    #[inline]
    pub fn update_directory_config<S: DirectorySettings + ?Sized>(&self, settings: &mut S) {
        settings.add_binary_attribute(OBJECT_SID_ATTRIBUTE);
    }
}
