//! `objectSid` decoding.
//!
//! Decoding never fails outwardly. A value that cannot be decoded in full
//! yields the longest well-formed prefix (`S-`, `S-1`, `S-1-5`, `S-1-5-21`, ...)
//! together with the [`DecodeError`] that stopped it, and a single `warn`
//! event is emitted.

use core::fmt::{self, Display};

use parsing::{PartialSid, decode_binary};
use tracing::warn;

use crate::decoded_sid::write_fields;
use crate::{DecodeError, DecodedSid, RawAttributeValue};

/// Outcome of decoding one raw `objectSid` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidDecoding {
    value: String,
    sid: Option<DecodedSid>,
    error: Option<DecodeError>,
}

impl SidDecoding {
    /// The rendered string, complete or partial.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Consumes the outcome, keeping the rendered string.
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.value
    }

    /// `true` when every field was decoded.
    #[inline]
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// The structured SID, only for a complete decode.
    #[inline]
    #[must_use]
    pub const fn sid(&self) -> Option<&DecodedSid> {
        self.sid.as_ref()
    }

    /// Why decoding stopped early.
    #[inline]
    #[must_use]
    pub const fn error(&self) -> Option<&DecodeError> {
        self.error.as_ref()
    }

    fn partial(value: String, error: DecodeError) -> Self {
        warn!(
            error = %error,
            partial = %value,
            "Error trying to decode objectSid value, keeping partial result"
        );
        Self {
            value,
            sid: None,
            error: Some(error),
        }
    }
}

impl Display for SidDecoding {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Decodes a raw directory value into its `S-R-I-S1-...-Sn` form.
///
/// # Examples
/// ```rust
/// # use msad_sid_mapper::{decode, RawAttributeValue};
/// let raw = RawAttributeValue::from("AQUAAAAAAAUVAAAAplyrHnezjauzuZjh0QIAAA==");
/// let decoded = decode(&raw);
/// assert!(decoded.is_complete());
/// assert_eq!(decoded.as_str(), "S-1-5-21-514546854-2878190455-3784882611-721");
///
/// let broken = decode(&RawAttributeValue::from("AQUAAAAAAAUVAAAA"));
/// assert!(!broken.is_complete());
/// assert_eq!(broken.as_str(), "S-1-5-21");
/// ```
#[inline]
#[must_use]
pub fn decode(raw: &RawAttributeValue) -> SidDecoding {
    match raw.to_bytes() {
        Ok(bytes) => decode_bytes(&bytes),
        Err(error) => SidDecoding::partial(String::from("S-"), error.into()),
    }
}

/// [`decode`], keeping only the string.
#[inline]
#[must_use]
pub fn decode_str(raw: &RawAttributeValue) -> String {
    decode(raw).into_string()
}

/// Decodes bytes that are already free of their transport encoding.
#[inline]
#[must_use]
pub fn decode_bytes(bytes: &[u8]) -> SidDecoding {
    match decode_binary(bytes) {
        Ok(components) => {
            let sid = DecodedSid::from(components);
            SidDecoding {
                value: sid.to_string(),
                sid: Some(sid),
                error: None,
            }
        }
        Err(PartialSid { prefix, error }) => {
            let mut value = String::new();
            // Writing into a String cannot fail.
            let _ = write_fields(
                &mut value,
                prefix.revision,
                prefix.identifier_authority.map(Into::into),
                &prefix.sub_authority,
            );
            SidDecoding::partial(value, error.into())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Unwrap is not an issue in test")]
mod tests {
    use super::*;
    use crate::decoded_sid::test::arb_decoded_sid;
    use crate::utils::test::{at_level, capture_events};
    use parsing::{BinaryField, TruncatedSid};
    use proptest::prelude::*;

    const DOMAIN_USER: [u8; 28] = [
        0x01, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05, 0x15, 0x00, 0x00, 0x00, 0xA6, 0x5C, 0xAB,
        0x1E, 0x77, 0xB3, 0x8D, 0xAB, 0xB3, 0xB9, 0x98, 0xE1, 0xD1, 0x02, 0x00, 0x00,
    ];

    #[test]
    fn decodes_domain_user() {
        let decoded = decode(&RawAttributeValue::encode(DOMAIN_USER));
        assert!(decoded.is_complete());
        assert_eq!(
            decoded.as_str(),
            "S-1-5-21-514546854-2878190455-3784882611-721"
        );
        let sid = decoded.sid().unwrap();
        assert_eq!(sid.get_sub_authorities().len(), 5);
        assert_eq!(sid.identifier_authority.as_u64(), 5);
    }

    #[test]
    fn decodes_well_known_sids() {
        let cases: [(&[u8], &str); 3] = [
            (&[1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0], "S-1-0-0"),
            (&[1, 1, 0, 0, 0, 0, 0, 5, 18, 0, 0, 0], "S-1-5-18"),
            (
                &[1, 2, 0, 0, 0, 0, 0, 5, 32, 0, 0, 0, 32, 2, 0, 0],
                "S-1-5-32-544",
            ),
        ];
        for (bytes, expected) in cases {
            assert_eq!(decode_bytes(bytes).as_str(), expected);
        }
    }

    #[test]
    fn invalid_transport_encoding_keeps_prefix_only() {
        let decoded = decode(&RawAttributeValue::from("not base64!"));
        assert_eq!(decoded.as_str(), "S-");
        assert!(matches!(
            decoded.error(),
            Some(DecodeError::TransportEncoding(_))
        ));
        assert!(decoded.sid().is_none());
    }

    #[test]
    fn wrapped_value_decodes_in_full() {
        let decoded = decode(&RawAttributeValue::from("AQEAAAAA\nAAUSAAAA"));
        assert!(decoded.is_complete());
        assert_eq!(decoded.as_str(), "S-1-5-18");
    }

    #[test]
    fn empty_value_is_bare_prefix() {
        let decoded = decode(&RawAttributeValue::from(""));
        assert_eq!(decoded.as_str(), "S-");
        assert!(!decoded.is_complete());
    }

    #[test]
    fn truncated_sub_authority_reports_field() {
        let decoded = decode_bytes(&DOMAIN_USER[..14]);
        assert_eq!(decoded.as_str(), "S-1-5-21");
        assert_eq!(
            decoded.error(),
            Some(&DecodeError::Truncated(TruncatedSid {
                field: BinaryField::SubAuthority(1),
                needed: 16,
                available: 14,
            }))
        );
    }

    #[test]
    fn count_without_authority_renders_revision() {
        assert_eq!(decode_bytes(&DOMAIN_USER[..2]).as_str(), "S-1");
        assert_eq!(decode_bytes(&DOMAIN_USER[..7]).as_str(), "S-1");
        assert_eq!(decode_bytes(&DOMAIN_USER[..8]).as_str(), "S-1-5");
    }

    #[test]
    fn truncated_decode_warns_once() {
        let (decoded, events) = capture_events(|| decode_bytes(&DOMAIN_USER[..14]));
        assert_eq!(decoded.as_str(), "S-1-5-21");
        assert_eq!(events.len(), 1, "{events:?}");
        assert_eq!(at_level(&events, tracing::Level::WARN).len(), 1);
        assert!(events[0].message.contains("objectSid"), "{events:?}");
    }

    #[test]
    fn invalid_transport_encoding_warns_once() {
        let (_, events) = capture_events(|| decode(&RawAttributeValue::from("not base64!")));
        assert_eq!(at_level(&events, tracing::Level::WARN).len(), 1, "{events:?}");
    }

    #[test]
    fn complete_decode_is_silent() {
        let (decoded, events) = capture_events(|| decode(&RawAttributeValue::encode(DOMAIN_USER)));
        assert!(decoded.is_complete());
        assert!(events.is_empty(), "{events:?}");
    }

    proptest! {
        #[test]
        fn encoded_sid_decodes_to_literal(sid in arb_decoded_sid()) {
            let mut expected = format!("S-{}-{}", sid.revision, sid.identifier_authority.as_u64());
            for sub in sid.get_sub_authorities() {
                expected.push_str(&format!("-{sub}"));
            }
            let decoded = decode(&RawAttributeValue::encode(sid.to_bytes()));
            prop_assert!(decoded.is_complete());
            prop_assert_eq!(decoded.as_str(), expected.as_str());
            prop_assert_eq!(decoded.sid(), Some(&sid));
        }

        #[test]
        fn decoding_is_deterministic(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let raw = RawAttributeValue::encode(&bytes);
            prop_assert_eq!(decode(&raw), decode(&raw));
        }

        #[test]
        fn truncation_yields_field_aligned_prefix(sid in arb_decoded_sid(), cut in any::<prop::sample::Index>()) {
            let bytes = sid.to_bytes();
            let cut = cut.index(bytes.len());
            let full = sid.to_string();
            let decoded = decode_bytes(&bytes[..cut]);
            prop_assert!(!decoded.is_complete());
            prop_assert!(full.starts_with(decoded.as_str()), "{} is not a prefix of {}", decoded, full);
            let rest = &full[decoded.as_str().len()..];
            prop_assert!(decoded.as_str() == "S-" || rest.is_empty() || rest.starts_with('-'));
            prop_assert!(!decoded.as_str().ends_with('-') || decoded.as_str() == "S-");
        }
    }
}
