//! Structured form of a decoded `objectSid` value.
//!
//! A [`DecodedSid`] only exists for the length of a read: it is built from the
//! raw directory bytes, rendered, and dropped. It is never stored.

use core::fmt::{self, Display};
use core::str::FromStr;

use parsing::{InvalidSidFormat, MAX_SUBAUTHORITY_COUNT, SidComponents};

use crate::SidIdentifierAuthority;

/// A security identifier decoded from its binary layout.
///
/// # Examples
/// ```rust
/// # use msad_sid_mapper::{DecodedSid, SidIdentifierAuthority};
/// let sid = DecodedSid::new(1, SidIdentifierAuthority::NT_AUTHORITY, vec![32, 544]).unwrap();
/// assert_eq!(sid.to_string(), "S-1-5-32-544");
/// assert_eq!(sid.to_bytes(), [1, 2, 0, 0, 0, 0, 0, 5, 32, 0, 0, 0, 32, 2, 0, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecodedSid {
    /// The SID revision value, generally 1.
    pub revision: u8,
    /// The SID identifier authority value.
    pub identifier_authority: SidIdentifierAuthority,
    // At most u8::MAX entries so the count byte stays exact.
    sub_authorities: Vec<u32>,
}

impl DecodedSid {
    /// Builds a SID from parts. `None` if there are more than 255 sub-authorities.
    #[inline]
    #[must_use]
    pub fn new<I: Into<SidIdentifierAuthority>>(
        revision: u8,
        identifier_authority: I,
        sub_authorities: Vec<u32>,
    ) -> Option<Self> {
        (sub_authorities.len() <= MAX_SUBAUTHORITY_COUNT).then(|| Self {
            revision,
            identifier_authority: identifier_authority.into(),
            sub_authorities,
        })
    }

    /// Decodes a buffer holding exactly one binary SID.
    ///
    /// # Errors
    /// [`InvalidSidFormat`] if the buffer is truncated or has trailing bytes.
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, InvalidSidFormat> {
        SidComponents::from_exact_bytes(bytes).map(Self::from)
    }

    /// Sub-authorities, in order.
    #[inline]
    #[must_use]
    pub fn get_sub_authorities(&self) -> &[u32] {
        &self.sub_authorities
    }

    /// Number of sub-authorities, as stored in byte 1 of the binary layout.
    #[inline]
    #[must_use]
    pub fn sub_authority_count(&self) -> u8 {
        u8::try_from(self.sub_authorities.len()).unwrap_or(u8::MAX)
    }

    /// Binary layout as stored by the directory.
    #[inline]
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(parsing::encoded_len(self.sub_authority_count()));
        bytes.push(self.revision);
        bytes.push(self.sub_authority_count());
        bytes.extend_from_slice(&self.identifier_authority.value);
        for sub in &self.sub_authorities {
            bytes.extend_from_slice(&sub.to_le_bytes());
        }
        bytes
    }
}

/// Writes `S-` followed by whichever fields are known, dash separated.
///
/// Fields are written in layout order and writing stops at the first missing
/// one, so the output never ends with a separator.
pub(crate) fn write_fields<W: fmt::Write>(
    out: &mut W,
    revision: Option<u8>,
    identifier_authority: Option<SidIdentifierAuthority>,
    sub_authorities: &[u32],
) -> fmt::Result {
    out.write_str("S-")?;
    let Some(revision) = revision else {
        return Ok(());
    };
    write!(out, "{revision}")?;
    let Some(identifier_authority) = identifier_authority else {
        return Ok(());
    };
    write!(out, "-{identifier_authority}")?;
    for sub in sub_authorities {
        write!(out, "-{sub}")?;
    }
    Ok(())
}

impl Display for DecodedSid {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_fields(
            f,
            Some(self.revision),
            Some(self.identifier_authority),
            &self.sub_authorities,
        )
    }
}

impl From<SidComponents> for DecodedSid {
    #[inline]
    fn from(value: SidComponents) -> Self {
        Self {
            revision: value.revision,
            identifier_authority: value.identifier_authority.into(),
            sub_authorities: value.sub_authority.to_vec(),
        }
    }
}

impl TryFrom<&[u8]> for DecodedSid {
    type Error = InvalidSidFormat;

    #[inline]
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(value)
    }
}

impl FromStr for DecodedSid {
    type Err = InvalidSidFormat;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SidComponents::from_str(s).map(Self::from)
    }
}
