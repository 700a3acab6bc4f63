//! Mapping configuration.
//!
//! Only the user model attribute name comes from the operator; the directory
//! attribute and the flags are fixed for the `objectSid` mapper.

use std::collections::BTreeMap;

use crate::ConfigError;

/// Configuration property naming the user model attribute.
pub const USER_MODEL_ATTRIBUTE: &str = "user.model.attribute";

/// Directory attribute holding the binary SID of an account.
pub const OBJECT_SID_ATTRIBUTE: &str = "objectSid";

/// Multi-valued configuration map as stored by the host for a mapper component.
pub type ComponentConfig = BTreeMap<String, Vec<String>>;

/// Behaviour switches of a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MappingFlags {
    /// Writes to the model attribute are dropped instead of persisted.
    pub binary: bool,
    /// Reads of the model attribute are always computed from the directory.
    pub read_only: bool,
    /// Searches must constrain the directory attribute.
    pub mandatory: bool,
}

impl MappingFlags {
    /// Flags of the `objectSid` mapping.
    pub const OBJECT_SID: Self = Self {
        binary: true,
        read_only: true,
        mandatory: false,
    };
}

/// Immutable description of one model attribute ↔ directory attribute mapping.
///
/// Shared read-only by every overlay built for the mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MappingConfig {
    model_attribute_name: String,
    directory_attribute_name: String,
    flags: MappingFlags,
}

impl MappingConfig {
    /// General constructor.
    #[inline]
    #[must_use]
    pub fn new<M: Into<String>, D: Into<String>>(
        model_attribute_name: M,
        directory_attribute_name: D,
        flags: MappingFlags,
    ) -> Self {
        Self {
            model_attribute_name: model_attribute_name.into(),
            directory_attribute_name: directory_attribute_name.into(),
            flags,
        }
    }

    /// The `objectSid` mapping onto `model_attribute_name`.
    ///
    /// # Examples
    /// ```rust
    /// # use msad_sid_mapper::MappingConfig;
    /// let config = MappingConfig::object_sid("sid");
    /// assert_eq!(config.directory_attribute_name(), "objectSid");
    /// assert!(config.is_binary() && config.is_read_only() && !config.is_mandatory());
    /// ```
    #[inline]
    #[must_use]
    pub fn object_sid<M: Into<String>>(model_attribute_name: M) -> Self {
        Self::new(
            model_attribute_name,
            OBJECT_SID_ATTRIBUTE,
            MappingFlags::OBJECT_SID,
        )
    }

    /// Builds the `objectSid` mapping from a host component configuration.
    ///
    /// The first value of [`USER_MODEL_ATTRIBUTE`] is used, trimmed.
    ///
    /// # Errors
    /// [`ConfigError`] if the property is absent or blank.
    #[inline]
    pub fn from_component_config(config: &ComponentConfig) -> Result<Self, ConfigError> {
        let name = config
            .get(USER_MODEL_ATTRIBUTE)
            .and_then(|values| values.first())
            .ok_or(ConfigError::MissingModelAttribute(USER_MODEL_ATTRIBUTE))?;
        Self::validated(name)
    }

    pub(crate) fn validated(model_attribute_name: &str) -> Result<Self, ConfigError> {
        let name = model_attribute_name.trim();
        if name.is_empty() {
            return Err(ConfigError::BlankModelAttribute(USER_MODEL_ATTRIBUTE));
        }
        Ok(Self::object_sid(name))
    }

    /// User model attribute the decoded SID is exposed as.
    #[inline]
    #[must_use]
    pub fn model_attribute_name(&self) -> &str {
        &self.model_attribute_name
    }

    /// Directory attribute the raw SID is read from.
    #[inline]
    #[must_use]
    pub fn directory_attribute_name(&self) -> &str {
        &self.directory_attribute_name
    }

    /// Every flag of the mapping.
    #[inline]
    #[must_use]
    pub const fn flags(&self) -> MappingFlags {
        self.flags
    }

    /// Writes to the model attribute are dropped.
    #[inline]
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        self.flags.binary
    }

    /// Reads of the model attribute come from the directory.
    #[inline]
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.flags.read_only
    }

    /// Searches must constrain the directory attribute.
    #[inline]
    #[must_use]
    pub const fn is_mandatory(&self) -> bool {
        self.flags.mandatory
    }
}
