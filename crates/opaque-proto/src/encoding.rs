//! Spec §6/§9: two wire vocabularies coexist on purpose — OPAQUE fields
//! are base64, the legacy `/oprf` endpoint is hex. Don't unify them; a
//! wire-format change there is a protocol version bump, not a refactor.

use crate::error::ProtoError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub mod b64_bytes {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        STANDARD
            .decode(s.as_bytes())
            .map_err(|e| ProtoError::from(e))
            .map_err(serde::de::Error::custom)
    }
}

pub mod hex_bytes {
    use super::*;

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        hex::decode(s)
            .map_err(|e| ProtoError::from(e))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    #[derive(serde::Serialize, serde::Deserialize)]
    struct B64Wrapper(#[serde(with = "super::b64_bytes")] Vec<u8>);

    #[derive(serde::Serialize, serde::Deserialize)]
    struct HexWrapper(#[serde(with = "super::hex_bytes")] Vec<u8>);

    #[test]
    fn b64_round_trips() {
        let w = B64Wrapper(vec![1, 2, 3, 255]);
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, "\"AQID/w==\"");
        let back: B64Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back.0, vec![1, 2, 3, 255]);
    }

    #[test]
    fn hex_round_trips() {
        let w = HexWrapper(vec![0xde, 0xad, 0xbe, 0xef]);
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, "\"deadbeef\"");
        let back: HexWrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back.0, vec![0xde, 0xad, 0xbe, 0xef]);
    }
}
