//! `CipherSuite` as it appears on the wire: a short name string rather
//! than the enum's Rust repr, so the JSON contract doesn't change if the
//! enum is ever reordered.

use crate::error::ProtoError;
use opaque_crypto::CipherSuite;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireCipherSuite(pub CipherSuite);

impl WireCipherSuite {
    pub fn as_str(self) -> &'static str {
        match self.0 {
            CipherSuite::P256Sha256 => "P256_SHA256",
            CipherSuite::P384Sha384 => "P384_SHA384",
            CipherSuite::P521Sha512 => "P521_SHA512",
        }
    }

    pub fn parse(s: &str) -> crate::error::Result<Self> {
        match s {
            "P256_SHA256" => Ok(Self(CipherSuite::P256Sha256)),
            "P384_SHA384" => Ok(Self(CipherSuite::P384Sha384)),
            "P521_SHA512" => Ok(Self(CipherSuite::P521Sha512)),
            other => Err(ProtoError::UnknownCipherSuite(other.to_string())),
        }
    }
}

impl fmt::Display for WireCipherSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for WireCipherSuite {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WireCipherSuite {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
