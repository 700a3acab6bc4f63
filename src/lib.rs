//! # `objectSid` user attribute mapper
//!
//! Exposes the binary `objectSid` attribute of a directory (Active Directory)
//! user as a decoded, read-only string attribute of a local user record. The
//! value is decoded on every read and never persisted, raw or decoded.
//!
//! The crate provides:
//! - [`decode`]: raw directory value → `S-R-I-S1-...-Sn`, never failing
//!   outwardly ([`SidDecoding`] carries the partial result and the reason).
//! - [`SidAttributeOverlay`]: a [`UserRecord`] wrapper that computes the
//!   mapped attribute from the directory and drops writes to it.
//! - [`rewrite_query`]: points outgoing search conditions at the directory
//!   attribute and flags them binary.
//! - [`MsadUserSidMapper`] and [`MsadUserSidMapperFactory`]: life-cycle hooks
//!   and construction from host configuration.
//!
//! ## Binary layout
//! | bytes | field | encoding |
//! |---|---|---|
//! | 0 | revision | `u8` |
//! | 1 | sub-authority count `n` | `u8` |
//! | 2..8 | identifier authority | 48-bit big-endian |
//! | 8 + 4i..12 + 4i | sub-authority `i` | `u32` little-endian |
//!
//! The directory client hands the bytes over base64-encoded
//! ([`RawAttributeValue`]).
//!
//! ## Examples
//! ### Decode a raw value
//! ```rust
//! use msad_sid_mapper::{decode, RawAttributeValue};
//!
//! let raw = RawAttributeValue::from("AQIAAAAAAAUgAAAAIAIAAA==");
//! assert_eq!(decode(&raw).as_str(), "S-1-5-32-544");
//! ```
//!
//! ### Read through the overlay
//! ```rust
//! use std::sync::Arc;
//! use msad_sid_mapper::{MappingConfig, MsadUserSidMapper, RawAttributeValue, UserRecord};
//! use msad_sid_mapper::memory::{DirectoryEntry, InMemoryUser};
//!
//! let mapper = MsadUserSidMapper::new(Arc::new(MappingConfig::object_sid("sid")));
//! let mut entry = DirectoryEntry::new();
//! entry.insert("objectSid", RawAttributeValue::from("AQIAAAAAAAUgAAAAIAIAAA=="));
//! let mut user = InMemoryUser::new("admin");
//!
//! let user = mapper.proxy(&entry, &mut user);
//! assert_eq!(user.get_single_value("SID").as_deref(), Some("S-1-5-32-544"));
//! ```
//!
//! ## Features
//! - `std` (default): enables `std` in the dependencies, the parsing crate
//!   included. This crate itself always links `std`; only
//!   `msad-sid-mapper-parsing` builds `no_std` without it.
//! - `serde`: `Serialize`/`Deserialize` for [`DecodedSid`] and
//!   [`MappingConfig`].
//!
//! ## Diagnostics
//! Failures on the read/write path are never returned to the caller. They are
//! reported through [`tracing`] events: `warn` for partial decodes and
//! unsupported property types, `debug` for skipped writes. Installing a
//! subscriber is left to the host.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg))]

mod config;
mod decoded_sid;
mod decoder;
pub mod directory;
mod error;
mod factory;
mod mapper;
pub mod memory;
mod overlay;
mod property;
mod raw_value;
mod rewriter;
mod sid_identifier_authority;

cfg_if::cfg_if! {
    if #[cfg(feature = "serde")] {
        mod serde_impl;
    }
}

/// Internal utilities for attribute name matching.
pub(crate) mod utils;

pub use config::{
    ComponentConfig, MappingConfig, MappingFlags, OBJECT_SID_ATTRIBUTE, USER_MODEL_ATTRIBUTE,
};
pub use decoded_sid::DecodedSid;
pub use decoder::{SidDecoding, decode, decode_bytes, decode_str};
pub use directory::{
    Attributes, Condition, DirectoryObject, DirectorySettings, SearchRequest, UserRecord,
};
pub use error::{ConfigError, DecodeError, PropertyError};
pub use factory::{
    CONFIG_PROPERTIES, ConfigProperty, ConfigPropertyKind, HELP_TEXT, MsadUserSidMapperFactory,
    PROVIDER_ID,
};
pub use mapper::MsadUserSidMapper;
pub use overlay::SidAttributeOverlay;
pub use property::{PropertySetter, PropertySetters, PropertyType, PropertyValue};
pub use raw_value::RawAttributeValue;
pub use rewriter::{mandatory_attribute_names, rewrite_query};

/// Identifier authority component of a SID (6-byte value).
pub use sid_identifier_authority::SidIdentifierAuthority;

/// Binary layout errors, re-exported from the parsing crate.
pub use parsing::{BinaryField, InvalidSidFormat, TruncatedSid};
