use std::borrow::Cow;

use base64::{Engine, prelude::BASE64_STANDARD};
use serde::{Deserialize, Serialize, de::Visitor};

use crate::core::ecdsa::{PublicKey, Signature};

#[derive(PartialEq, Eq, Debug)]
#[repr(transparent)]
struct InternalB64SerContainer<'a>(Cow<'a, [u8]>);

struct B64Visitor;

impl<'de> Visitor<'de> for B64Visitor {
    type Value = InternalB64SerContainer<'de>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("expecting valid b64")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        let data = BASE64_STANDARD.decode(v).map_err(|e| E::custom(e))?;
        Ok(InternalB64SerContainer(Cow::Owned(data)))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        let data = BASE64_STANDARD.decode(v).map_err(|e| E::custom(e))?;
        Ok(InternalB64SerContainer(Cow::Owned(data)))
    }

    fn visit_borrowed_str<E>(self, v: &'de str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        let data = BASE64_STANDARD.decode(v).map_err(|e| E::custom(e))?;
        Ok(InternalB64SerContainer(Cow::Owned(data)))
    }
}

impl<'a> Serialize for InternalB64SerContainer<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            BASE64_STANDARD.encode(&self.0).serialize(serializer)
        } else {
            serializer.collect_seq(self.0.iter())
        }
    }
}

impl<'de> Deserialize<'de> for InternalB64SerContainer<'de> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            deserializer.deserialize_string(B64Visitor)
        } else {
            Ok(InternalB64SerContainer(Cow::Owned(Vec::deserialize(
                deserializer,
            )?)))
        }
    }
}

/* Wire types: b64 strings for human-readable formats, raw byte sequences
otherwise. KeyPair carries private key material and gets no serde surface. */

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        InternalB64SerContainer(Cow::Borrowed(self.as_bytes())).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let InternalB64SerContainer(inner) = InternalB64SerContainer::deserialize(deserializer)?;
        PublicKey::from_bytes(&inner).map_err(serde::de::Error::custom)
    }
}

impl Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        InternalB64SerContainer(Cow::Borrowed(self.as_bytes())).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let InternalB64SerContainer(inner) = InternalB64SerContainer::deserialize(deserializer)?;
        Signature::from_bytes(&inner).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use serde::Deserialize;
    use serde_test::{Configure, Token, assert_tokens};

    use crate::core::ecdsa::{PublicKey, Signature};
    use crate::core::wire::SIGNATURE_LEN;

    use super::InternalB64SerContainer;

    // Base64 of the bytes 0, 1, ..., 63.
    const COUNTING_B64: &str =
        "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8gISIjJCUmJygpKissLS4vMDEyMzQ1Njc4OTo7PD0+Pw==";

    fn counting_bytes() -> [u8; 64] {
        let mut bytes = [0u8; 64];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8;
        }
        bytes
    }

    fn counting_seq_tokens() -> Vec<Token> {
        let mut tokens = vec![Token::Seq { len: Some(64) }];
        tokens.extend((0u8..64).map(Token::U8));
        tokens.push(Token::SeqEnd);
        tokens
    }

    #[test]
    pub fn test_serde_internal_b64_container() {
        assert_tokens(
            &InternalB64SerContainer(Cow::Borrowed(&[1, 2, 3])).compact(),
            &[
                Token::Seq { len: Some(3) },
                Token::U8(1),
                Token::U8(2),
                Token::U8(3),
                Token::SeqEnd,
            ],
        );
        assert_tokens(
            &InternalB64SerContainer(Cow::Borrowed(&[1, 2, 3])).readable(),
            &[Token::Str("AQID")],
        );
    }

    #[test]
    pub fn test_serde_public_key() {
        let key = PublicKey::from(counting_bytes());
        assert_tokens(&key.clone().readable(), &[Token::Str(COUNTING_B64)]);
        assert_tokens(&key.compact(), &counting_seq_tokens());
    }

    #[test]
    pub fn test_serde_signature() {
        let signature = Signature::from(counting_bytes());
        assert_tokens(&signature.clone().readable(), &[Token::Str(COUNTING_B64)]);
        assert_tokens(&signature.compact(), &counting_seq_tokens());
    }

    #[test]
    pub fn test_serde_json_round_trip() {
        // Sanity check that signatures really travel as b64 strings.
        let signature = Signature::from([0x01; SIGNATURE_LEN]);
        let encoded = serde_json::to_string(&signature).unwrap();
        assert_eq!(
            encoded,
            "\"AQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQ==\""
        );

        let decoded: Signature = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, signature);
    }

    #[test]
    pub fn test_serde_rejects_wrong_length() {
        let result: Result<PublicKey, _> = serde_json::from_str("\"AQID\"");
        assert!(result.is_err());
    }

    #[test]
    pub fn test_serde_rejects_invalid_b64() {
        let result: Result<Signature, _> = serde_json::from_str("\"not base64!!\"");
        assert!(result.is_err());
    }

    #[derive(serde::Serialize, Deserialize)]
    pub struct Stub {
        field: Signature,
    }

    #[test]
    pub fn test_serde_nested_field() {
        let encoded = serde_json::to_string(&Stub {
            field: Signature::from(counting_bytes()),
        })
        .unwrap();
        assert_eq!(encoded, format!("{{\"field\":\"{COUNTING_B64}\"}}"));

        let decoded: Stub = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.field, Signature::from(counting_bytes()));
    }
}
