use core::fmt::{self, Display};

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::{MAX_SUBAUTHORITY_COUNT, SidComponents};

/// Revision, count and identifier authority.
pub const HEADER_SIZE: usize = 8;
/// One little-endian `u32` per sub-authority.
pub const SUB_AUTHORITY_SIZE: usize = 4;

/// Size in bytes of a binary SID declaring `sub_authority_count` sub-authorities.
#[must_use]
pub const fn encoded_len(sub_authority_count: u8) -> usize {
    HEADER_SIZE + SUB_AUTHORITY_SIZE * sub_authority_count as usize
}

/// Field of the binary layout, in reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryField {
    /// Byte 0.
    Revision,
    /// Byte 1.
    SubAuthorityCount,
    /// Bytes 2 to 7, big-endian.
    IdentifierAuthority,
    /// Bytes `8 + 4 * i` to `11 + 4 * i`, little-endian.
    SubAuthority(u8),
}

impl Display for BinaryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Revision => f.write_str("revision"),
            Self::SubAuthorityCount => f.write_str("sub-authority count"),
            Self::IdentifierAuthority => f.write_str("identifier authority"),
            Self::SubAuthority(index) => write!(f, "sub-authority {index}"),
        }
    }
}

/// The buffer ended before `field` could be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("SID truncated while reading {field}: {needed} bytes needed, {available} available")]
pub struct TruncatedSid {
    /// Field that could not be read.
    pub field: BinaryField,
    /// Buffer length required to read `field` completely.
    pub needed: usize,
    /// Buffer length actually available.
    pub available: usize,
}

/// Fields read before decoding stopped. Each `Some` field is complete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedPrefix {
    pub revision: Option<u8>,
    pub sub_authority_count: Option<u8>,
    pub identifier_authority: Option<[u8; 6]>,
    /// Sub-authorities read in full, in order.
    pub sub_authority: ArrayVec<u32, MAX_SUBAUTHORITY_COUNT>,
}

/// A decode that stopped early: the prefix that was read and where it broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialSid {
    pub prefix: DecodedPrefix,
    pub error: TruncatedSid,
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn take<const N: usize>(&mut self, field: BinaryField) -> Result<[u8; N], TruncatedSid> {
        let end = self.offset + N;
        let chunk = self
            .bytes
            .get(self.offset..end)
            .and_then(|chunk| <[u8; N]>::try_from(chunk).ok())
            .ok_or(TruncatedSid {
                field,
                needed: end,
                available: self.bytes.len(),
            })?;
        self.offset = end;
        Ok(chunk)
    }
}

/// Decodes the binary SID layout at the start of `bytes`.
///
/// Bytes past the last declared sub-authority are ignored. On a short buffer
/// the error carries every field that was read in full before the cut.
///
/// # Errors
/// [`PartialSid`] when the buffer ends inside a field.
///
/// # Examples
/// ```rust
/// # use msad_sid_mapper_parsing::{decode_binary, BinaryField};
/// let bytes = [1, 2, 0, 0, 0, 0, 0, 5, 32, 0, 0, 0, 32, 2, 0, 0];
/// let sid = decode_binary(&bytes).unwrap();
/// assert_eq!(sid.sub_authority.as_slice(), &[32, 544]);
///
/// let partial = decode_binary(&bytes[..14]).unwrap_err();
/// assert_eq!(partial.prefix.sub_authority.as_slice(), &[32]);
/// assert_eq!(partial.error.field, BinaryField::SubAuthority(1));
/// ```
pub fn decode_binary(bytes: &[u8]) -> Result<SidComponents, PartialSid> {
    let mut reader = Reader::new(bytes);
    let mut prefix = DecodedPrefix::default();
    match read_fields(&mut reader, &mut prefix) {
        Ok(components) => Ok(components),
        Err(error) => Err(PartialSid { prefix, error }),
    }
}

fn read_fields(
    reader: &mut Reader<'_>,
    prefix: &mut DecodedPrefix,
) -> Result<SidComponents, TruncatedSid> {
    let [revision] = reader.take::<1>(BinaryField::Revision)?;
    prefix.revision = Some(revision);

    let [count] = reader.take::<1>(BinaryField::SubAuthorityCount)?;
    prefix.sub_authority_count = Some(count);

    let identifier_authority = reader.take::<6>(BinaryField::IdentifierAuthority)?;
    prefix.identifier_authority = Some(identifier_authority);

    for index in 0..count {
        let sub = u32::from_le_bytes(reader.take::<4>(BinaryField::SubAuthority(index))?);
        // Capacity is u8::MAX, which no count can exceed.
        prefix.sub_authority.push(sub);
    }

    Ok(SidComponents {
        revision,
        identifier_authority,
        sub_authority: core::mem::take(&mut prefix.sub_authority),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Unwrap is not an issue in test")]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DOMAIN_USER: [u8; 28] = [
        0x01, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05, 0x15, 0x00, 0x00, 0x00, 0xA6, 0x5C, 0xAB,
        0x1E, 0x77, 0xB3, 0x8D, 0xAB, 0xB3, 0xB9, 0x98, 0xE1, 0xD1, 0x02, 0x00, 0x00,
    ];

    #[test]
    fn decodes_domain_user() {
        let sid = decode_binary(&DOMAIN_USER).unwrap();
        assert_eq!(sid.revision, 1);
        assert_eq!(sid.identifier_authority_value(), 5);
        assert_eq!(
            sid.sub_authority.as_slice(),
            &[21, 514_546_854, 2_878_190_455, 3_784_882_611, 721]
        );
    }

    #[test]
    fn empty_buffer_reads_nothing() {
        let partial = decode_binary(&[]).unwrap_err();
        assert_eq!(partial.prefix, DecodedPrefix::default());
        assert_eq!(
            partial.error,
            TruncatedSid {
                field: BinaryField::Revision,
                needed: 1,
                available: 0
            }
        );
    }

    #[test]
    fn short_authority_keeps_revision_and_count() {
        let partial = decode_binary(&DOMAIN_USER[..5]).unwrap_err();
        assert_eq!(partial.prefix.revision, Some(1));
        assert_eq!(partial.prefix.sub_authority_count, Some(5));
        assert_eq!(partial.prefix.identifier_authority, None);
        assert_eq!(partial.error.field, BinaryField::IdentifierAuthority);
        assert_eq!(partial.error.needed, HEADER_SIZE);
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut bytes = DOMAIN_USER.to_vec();
        bytes.extend_from_slice(&[0xDE, 0xAD]);
        assert_eq!(decode_binary(&bytes).unwrap(), decode_binary(&DOMAIN_USER).unwrap());
    }

    #[test]
    fn zero_sub_authorities() {
        let sid = decode_binary(&[1, 0, 0, 0, 0, 0, 0, 5]).unwrap();
        assert!(sid.sub_authority.is_empty());
        assert_eq!(sid.identifier_authority_value(), 5);
        assert_eq!(sid.encoded_len(), HEADER_SIZE);
    }

    proptest! {
        #[test]
        fn truncation_keeps_complete_sub_authorities(cut in 0usize..DOMAIN_USER.len()) {
            let partial = decode_binary(&DOMAIN_USER[..cut]).unwrap_err();
            let complete = cut.saturating_sub(HEADER_SIZE) / SUB_AUTHORITY_SIZE;
            prop_assert_eq!(partial.prefix.sub_authority.len(), complete);
            prop_assert_eq!(partial.prefix.revision.is_some(), cut >= 1);
            prop_assert_eq!(partial.prefix.identifier_authority.is_some(), cut >= HEADER_SIZE);
            prop_assert_eq!(partial.error.available, cut);
            prop_assert!(partial.error.needed > cut);
        }
    }
}
