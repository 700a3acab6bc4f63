//! Layout-level SID parsing shared by `msad-sid-mapper`.
//!
//! Two entry points:
//! - [`decode_binary`] walks the binary SID layout field by field and, when the
//!   buffer runs out, hands back everything read so far.
//! - [`SidComponents::from_str`](core::str::FromStr) parses the canonical
//!   `S-R-I-S1-...-Sn` text form.
//!
//! Nothing here allocates.
#![cfg_attr(not(feature = "std"), no_std)]

use core::fmt::{self, Display};
use core::str::FromStr;

use arrayvec::ArrayVec;
use thiserror::Error;

mod binary;

pub use binary::{
    BinaryField, DecodedPrefix, HEADER_SIZE, PartialSid, SUB_AUTHORITY_SIZE, TruncatedSid,
    decode_binary, encoded_len,
};

/// Largest sub-authority count a binary SID can declare (the count is one byte).
pub const MAX_SUBAUTHORITY_COUNT: usize = u8::MAX as usize;

/// Largest value an identifier authority can hold (48 bits).
pub const MAX_IDENTIFIER_AUTHORITY: u64 = (1 << 48) - 1;

/// Every field of a fully decoded SID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SidComponents {
    /// The SID revision value, generally 1.
    pub revision: u8,
    /// The SID identifier authority value (big-endian).
    pub identifier_authority: [u8; 6],
    /// The SID sub-authority values.
    pub sub_authority: ArrayVec<u32, MAX_SUBAUTHORITY_COUNT>,
}

/// Error type returned when a SID string or an exact binary SID is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub struct InvalidSidFormat;

impl Display for InvalidSidFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Invalid format for Sid")
    }
}

impl SidComponents {
    /// Decodes a buffer that must hold exactly one SID: `8 + 4 * count` bytes.
    ///
    /// Unlike [`decode_binary`], trailing bytes are rejected.
    ///
    /// # Errors
    /// [`InvalidSidFormat`] if the buffer is truncated or too long.
    pub fn from_exact_bytes(bytes: &[u8]) -> Result<Self, InvalidSidFormat> {
        let components = decode_binary(bytes).map_err(|_| InvalidSidFormat)?;
        if bytes.len() != components.encoded_len() {
            return Err(InvalidSidFormat);
        }
        Ok(components)
    }

    /// Number of sub-authorities, as written in byte 1 of the binary form.
    #[must_use]
    pub fn sub_authority_count(&self) -> u8 {
        u8::try_from(self.sub_authority.len()).unwrap_or(u8::MAX)
    }

    /// Size in bytes of the binary form.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        encoded_len(self.sub_authority_count())
    }

    /// Identifier authority as a 48-bit integer.
    #[must_use]
    pub const fn identifier_authority_value(&self) -> u64 {
        let [a, b, c, d, e, f] = self.identifier_authority;
        u64::from_be_bytes([0, 0, a, b, c, d, e, f])
    }

    /// Binary form, byte by byte.
    pub fn binary_bytes(&self) -> impl Iterator<Item = u8> + '_ {
        [self.revision, self.sub_authority_count()]
            .into_iter()
            .chain(self.identifier_authority)
            .chain(self.sub_authority.iter().flat_map(|sub| sub.to_le_bytes()))
    }
}

impl FromStr for SidComponents {
    type Err = InvalidSidFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut s_cmp = s.split('-');
        if !s_cmp
            .next()
            .is_some_and(|head| head.eq_ignore_ascii_case("s"))
        {
            return Err(InvalidSidFormat);
        }
        let revision = s_cmp
            .next()
            .ok_or(InvalidSidFormat)?
            .parse::<u8>()
            .map_err(|_| InvalidSidFormat)?;

        let identifier_authority = s_cmp
            .next()
            .ok_or(InvalidSidFormat)
            .and_then(|s| s.parse::<u64>().map_err(|_| InvalidSidFormat))
            .and_then(|value| {
                if value > MAX_IDENTIFIER_AUTHORITY {
                    return Err(InvalidSidFormat);
                }
                let [_, _, authority @ ..] = value.to_be_bytes();
                Ok(authority)
            })?;
        let mut sub_authority = ArrayVec::<u32, MAX_SUBAUTHORITY_COUNT>::new();
        for item in s_cmp {
            let item = item.parse::<u32>().map_err(|_| InvalidSidFormat)?;
            sub_authority.try_push(item).map_err(|_| InvalidSidFormat)?;
        }

        Ok(Self {
            revision,
            identifier_authority,
            sub_authority,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Unwrap is not an issue in test")]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_components() -> impl Strategy<Value = SidComponents> {
        (
            any::<u8>(),
            0..=MAX_IDENTIFIER_AUTHORITY,
            proptest::collection::vec(any::<u32>(), 0..=15),
        )
            .prop_map(|(revision, authority, subs)| {
                let [_, _, identifier_authority @ ..] = authority.to_be_bytes();
                SidComponents {
                    revision,
                    identifier_authority,
                    sub_authority: subs.into_iter().collect(),
                }
            })
    }

    #[test]
    fn parses_builtin_administrators() {
        let components: SidComponents = "S-1-5-32-544".parse().unwrap();
        assert_eq!(components.revision, 1);
        assert_eq!(components.identifier_authority_value(), 5);
        assert_eq!(components.sub_authority.as_slice(), &[32, 544]);
    }

    #[test]
    fn rejects_malformed_strings() {
        for input in ["", "X-1-5", "S-", "S-1", "S-1-x", "S-1-5-", "S-256-5-1", "S-1-281474976710656"] {
            assert_eq!(SidComponents::from_str(input), Err(InvalidSidFormat), "{input}");
        }
    }

    #[test]
    fn exact_bytes_rejects_trailing_data() {
        let bytes = [1u8, 1, 0, 0, 0, 0, 0, 5, 18, 0, 0, 0, 0xFF];
        assert_eq!(SidComponents::from_exact_bytes(&bytes), Err(InvalidSidFormat));
        let components = SidComponents::from_exact_bytes(&bytes[..12]).unwrap();
        assert_eq!(components.sub_authority.as_slice(), &[18]);
    }

    proptest! {
        #[test]
        fn binary_bytes_decode_back(components in arb_components()) {
            let mut buffer = [0u8; HEADER_SIZE + SUB_AUTHORITY_SIZE * 15];
            let mut len = 0;
            for (slot, byte) in buffer.iter_mut().zip(components.binary_bytes()) {
                *slot = byte;
                len += 1;
            }
            prop_assert_eq!(len, components.encoded_len());
            let decoded = SidComponents::from_exact_bytes(&buffer[..len]).unwrap();
            prop_assert_eq!(decoded, components);
        }
    }
}
