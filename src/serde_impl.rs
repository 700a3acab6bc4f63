use core::fmt;
use core::marker::PhantomData;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{DecodedSid, MappingConfig};

impl Serialize for DecodedSid {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            serializer.serialize_bytes(&self.to_bytes())
        }
    }
}

// Generic helper to deserialize types that support FromStr and TryFrom<&[u8]>
fn deserialize_sid_like<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    for<'a> T: FromStr + TryFrom<&'a [u8]>,
{
    struct Visitor<T> {
        _marker: PhantomData<T>,
    }

    impl<T> de::Visitor<'_> for Visitor<T>
    where
        for<'a> T: FromStr + TryFrom<&'a [u8]>,
    {
        type Value = T;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a SID as a string (e.g., \"S-1-...\") or as raw binary")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            T::from_str(v).map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }

        fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            T::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Bytes(v), &self))
        }
    }

    let visitor = Visitor {
        _marker: PhantomData,
    };
    if deserializer.is_human_readable() {
        deserializer.deserialize_str(visitor)
    } else {
        deserializer.deserialize_bytes(visitor)
    }
}

impl<'de> Deserialize<'de> for DecodedSid {
    #[inline]
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_sid_like(deserializer)
    }
}

/// Operator-facing settings of the `objectSid` mapping.
#[derive(Serialize, Deserialize)]
struct MappingSettings<S> {
    #[serde(rename = "user.model.attribute")]
    user_model_attribute: S,
}

impl Serialize for MappingConfig {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        MappingSettings {
            user_model_attribute: self.model_attribute_name(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MappingConfig {
    #[inline]
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let settings = MappingSettings::<String>::deserialize(deserializer)?;
        Self::validated(&settings.user_model_attribute).map_err(de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Unwrap is not an issue in test")]
mod test {
    use crate::{DecodedSid, MappingConfig, SidIdentifierAuthority};
    use serde_test::{self, Configure, Token};

    const BYTES: &[u8] = &[1, 3, 0, 0, 0, 0, 0, 5, 5, 0, 0, 0, 32, 0, 0, 0, 32, 2, 0, 0];

    fn sid() -> DecodedSid {
        DecodedSid::new(1, SidIdentifierAuthority::NT_AUTHORITY, vec![5, 32, 544]).unwrap()
    }

    #[test]
    fn test_binary() {
        serde_test::assert_tokens(&sid().compact(), &[Token::Bytes(BYTES)]);
    }

    #[test]
    fn test_human() {
        serde_test::assert_tokens(&sid().readable(), &[Token::String("S-1-5-5-32-544")]);
    }

    #[test]
    fn test_truncated_binary_is_rejected() {
        serde_test::assert_de_tokens_error::<serde_test::Compact<DecodedSid>>(
            &[Token::Bytes(&BYTES[..18])],
            "invalid value: byte array, expected a SID as a string (e.g., \"S-1-...\") or as raw binary",
        );
    }

    #[test]
    fn test_mapping_config_json() {
        let config: MappingConfig =
            serde_json::from_str(r#"{"user.model.attribute": "objectSidString"}"#).unwrap();
        assert_eq!(config, MappingConfig::object_sid("objectSidString"));
        assert_eq!(
            serde_json::to_string(&config).unwrap(),
            r#"{"user.model.attribute":"objectSidString"}"#
        );
    }

    #[test]
    fn test_mapping_config_blank_is_rejected() {
        let error = serde_json::from_str::<MappingConfig>(r#"{"user.model.attribute": " "}"#)
            .unwrap_err();
        assert!(error.to_string().contains("is blank"), "{error}");
    }
}
