use core::fmt::{self, Display};

use parsing::MAX_IDENTIFIER_AUTHORITY;

/// The 6-byte, big-endian identifier authority of a SID.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SidIdentifierAuthority {
    /// Raw big-endian bytes.
    pub value: [u8; 6],
}

impl SidIdentifierAuthority {
    /// `S-1-0`
    pub const NULL_AUTHORITY: Self = Self::from_low_byte(0);
    /// `S-1-1`
    pub const SECURITY_WORLD_AUTHORITY: Self = Self::from_low_byte(1);
    /// `S-1-2`
    pub const SECURITY_LOCAL_AUTHORITY: Self = Self::from_low_byte(2);
    /// `S-1-3`
    pub const SECURITY_CREATOR_AUTHORITY: Self = Self::from_low_byte(3);
    /// `S-1-5`, the authority of every domain account.
    pub const NT_AUTHORITY: Self = Self::from_low_byte(5);

    const fn from_low_byte(value: u8) -> Self {
        Self {
            value: [0, 0, 0, 0, 0, value],
        }
    }

    /// Returns the authority as an integer.
    ///
    /// # Examples
    /// ```rust
    /// # use msad_sid_mapper::SidIdentifierAuthority;
    /// assert_eq!(SidIdentifierAuthority::NT_AUTHORITY.as_u64(), 5);
    /// ```
    #[inline]
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        let [a, b, c, d, e, f] = self.value;
        u64::from_be_bytes([0, 0, a, b, c, d, e, f])
    }

    /// Builds an authority from an integer, `None` above 48 bits.
    #[inline]
    #[must_use]
    pub const fn from_u64(value: u64) -> Option<Self> {
        if value > MAX_IDENTIFIER_AUTHORITY {
            return None;
        }
        let [_, _, a, b, c, d, e, f] = value.to_be_bytes();
        Some(Self {
            value: [a, b, c, d, e, f],
        })
    }
}

impl Display for SidIdentifierAuthority {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.as_u64(), f)
    }
}

impl From<[u8; 6]> for SidIdentifierAuthority {
    #[inline]
    fn from(value: [u8; 6]) -> Self {
        Self { value }
    }
}

impl From<SidIdentifierAuthority> for [u8; 6] {
    #[inline]
    fn from(value: SidIdentifierAuthority) -> Self {
        value.value
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        pub fn arb_identifier_authority()
            (val in 0..=MAX_IDENTIFIER_AUTHORITY)
            -> SidIdentifierAuthority {
            let [_, _, a, b, c, d, e, f] = val.to_be_bytes();
            SidIdentifierAuthority::from([a, b, c, d, e, f])
        }
    }

    proptest! {
        #[test]
        fn u64_conversion_is_lossless(authority in arb_identifier_authority()) {
            prop_assert_eq!(SidIdentifierAuthority::from_u64(authority.as_u64()), Some(authority));
        }
    }

    #[test]
    fn rejects_values_above_48_bits() {
        assert_eq!(SidIdentifierAuthority::from_u64(1 << 48), None);
        assert_eq!(
            SidIdentifierAuthority::from_u64(MAX_IDENTIFIER_AUTHORITY).map(|a| a.value),
            Some([0xFF; 6])
        );
    }

    #[test]
    fn displays_in_decimal() {
        let authority = SidIdentifierAuthority::from([0, 0, 0, 1, 0, 0]);
        assert_eq!(authority.to_string(), "65536");
    }
}
