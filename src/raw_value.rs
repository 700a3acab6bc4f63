use core::fmt::{self, Display};

use base64::Engine as _;
use base64::alphabet;
use base64::engine::DecodePaddingMode;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};

/// Standard alphabet, padding optional on the way in.
const TRANSPORT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A binary directory attribute value as handed over by the directory client:
/// the attribute bytes in base64.
///
/// # Examples
/// ```rust
/// # use msad_sid_mapper::RawAttributeValue;
/// let raw = RawAttributeValue::encode([1, 1, 0, 0, 0, 0, 0, 5, 18, 0, 0, 0]);
/// assert_eq!(raw.as_str(), "AQEAAAAAAAUSAAAA");
/// assert_eq!(raw.to_bytes().unwrap().len(), 12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RawAttributeValue(String);

impl RawAttributeValue {
    /// Wraps an already encoded value.
    #[inline]
    #[must_use]
    pub fn new<S: Into<String>>(encoded: S) -> Self {
        Self(encoded.into())
    }

    /// Encodes attribute bytes the way the directory client does.
    #[inline]
    #[must_use]
    pub fn encode<B: AsRef<[u8]>>(bytes: B) -> Self {
        Self(TRANSPORT.encode(bytes))
    }

    /// The encoded text.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reverses the transport encoding. ASCII whitespace anywhere in the text
    /// (line breaks of wrapped base64 included) is ignored.
    ///
    /// # Errors
    /// [`base64::DecodeError`] if the text is not base64.
    #[inline]
    pub fn to_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        let text = self.0.as_bytes();
        if !text.iter().any(u8::is_ascii_whitespace) {
            return TRANSPORT.decode(text);
        }
        let compact: Vec<u8> = text
            .iter()
            .copied()
            .filter(|byte| !byte.is_ascii_whitespace())
            .collect();
        TRANSPORT.decode(compact)
    }
}

impl Display for RawAttributeValue {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RawAttributeValue {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for RawAttributeValue {
    #[inline]
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RawAttributeValue {
    #[inline]
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}
