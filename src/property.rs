//! Typed assignment of directory strings to user record properties.
//!
//! Some user model attributes are plain properties of the record (a first name,
//! an "email verified" flag) rather than free-form attributes. A
//! [`PropertySetters`] table lists them once, at configuration time, with the
//! closure that writes each one. The table is handed to the mapper; nothing is
//! looked up globally.
//!
//! The `objectSid` mapping never reaches this path because binary attributes
//! are not imported. Non-binary mappings assign through it.

use core::fmt;
use std::collections::BTreeMap;

use tracing::warn;

use crate::PropertyError;
use crate::directory::UserRecord;

/// Declared type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    /// Text, passed through unchanged.
    String,
    /// `true` for `"true"` in any case, `false` otherwise.
    Boolean,
    /// Any other type. Assignments to it are skipped.
    Other(&'static str),
}

impl PropertyType {
    /// Name used in diagnostics.
    #[inline]
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Other(name) => name,
        }
    }
}

/// Value handed to a setter, already converted to the property's type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyValue {
    /// Value of a [`PropertyType::String`] property.
    String(String),
    /// Value of a [`PropertyType::Boolean`] property.
    Boolean(bool),
}

type SetFn<U> = dyn Fn(&mut U, Option<PropertyValue>) + Send + Sync;

/// One typed property and the closure writing it. `None` clears the property.
pub struct PropertySetter<U: ?Sized> {
    value_type: PropertyType,
    set: Box<SetFn<U>>,
}

impl<U: ?Sized> PropertySetter<U> {
    /// Setter writing a property of `value_type`.
    #[inline]
    pub fn new<F>(value_type: PropertyType, set: F) -> Self
    where
        F: Fn(&mut U, Option<PropertyValue>) + Send + Sync + 'static,
    {
        Self {
            value_type,
            set: Box::new(set),
        }
    }

    /// Declared type of the property.
    #[inline]
    #[must_use]
    pub const fn value_type(&self) -> PropertyType {
        self.value_type
    }
}

/// Property name → typed setter, names matched without regard to case.
pub struct PropertySetters<U: ?Sized> {
    // Keyed by lowercased name.
    by_name: BTreeMap<String, (String, PropertySetter<U>)>,
}

impl<U: ?Sized> Default for PropertySetters<U> {
    #[inline]
    fn default() -> Self {
        Self {
            by_name: BTreeMap::new(),
        }
    }
}

impl<U: ?Sized> fmt::Debug for PropertySetters<U> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.by_name
                    .values()
                    .map(|(name, setter)| (name, setter.value_type)),
            )
            .finish()
    }
}

impl<U: ?Sized> PropertySetters<U> {
    /// Empty table.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the setter for `name`.
    ///
    /// # Examples
    /// ```rust
    /// # use msad_sid_mapper::{PropertySetters, PropertyType, PropertyValue};
    /// #[derive(Default)]
    /// struct Account { email_verified: bool }
    ///
    /// let setters = PropertySetters::<Account>::new().with_property(
    ///     "emailVerified",
    ///     PropertyType::Boolean,
    ///     |account, value| account.email_verified = value == Some(PropertyValue::Boolean(true)),
    /// );
    /// assert!(setters.contains("EMAILVERIFIED"));
    /// ```
    #[inline]
    #[must_use]
    pub fn with_property<F>(mut self, name: &str, value_type: PropertyType, set: F) -> Self
    where
        F: Fn(&mut U, Option<PropertyValue>) + Send + Sync + 'static,
    {
        self.by_name.insert(
            name.to_lowercase(),
            (name.to_owned(), PropertySetter::new(value_type, set)),
        );
        self
    }

    /// Setter registered under `name`, ignoring case.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertySetter<U>> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|(_, setter)| setter)
    }

    /// Whether `name` is registered, ignoring case.
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether no property is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Converts `value` to the type of property `name` and writes it.
    ///
    /// Returns `Ok(false)` when no such property is registered. `None` clears
    /// the property whatever its type. Booleans are `true` only for `"true"`,
    /// in any case.
    ///
    /// # Errors
    /// [`PropertyError::UnsupportedType`] when the property's type has no
    /// conversion; the property is left untouched.
    #[inline]
    pub fn try_assign(
        &self,
        user: &mut U,
        name: &str,
        value: Option<&str>,
    ) -> Result<bool, PropertyError> {
        let Some(setter) = self.get(name) else {
            return Ok(false);
        };
        let converted = match (value, setter.value_type) {
            (None, _) => None,
            (Some(value), PropertyType::String) => Some(PropertyValue::String(value.to_owned())),
            (Some(value), PropertyType::Boolean) => {
                Some(PropertyValue::Boolean(value.eq_ignore_ascii_case("true")))
            }
            (Some(_), PropertyType::Other(type_name)) => {
                return Err(PropertyError::UnsupportedType {
                    property: name.to_owned(),
                    type_name,
                });
            }
        };
        (setter.set)(user, converted);
        Ok(true)
    }
}

impl<U: UserRecord + ?Sized> PropertySetters<U> {
    /// [`Self::try_assign`], reporting unsupported types as a warning.
    ///
    /// Returns whether a property was written.
    #[inline]
    pub fn assign(&self, user: &mut U, name: &str, value: Option<&str>) -> bool {
        match self.try_assign(user, name, value) {
            Ok(written) => written,
            Err(error) => {
                warn!(
                    user = %user.username(),
                    value = value.unwrap_or_default(),
                    error = %error,
                    "Don't know how to set the property on user"
                );
                false
            }
        }
    }
}
