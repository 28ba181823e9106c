//! Hash functions and digest encodings for `[hash]` placeholders.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::Digest;

use crate::error::ConfigurationError;

/// Default number of digest characters kept by `[hash]`.
pub const DEFAULT_HASH_LENGTH: usize = 20;

/// Supported hash functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HashFunction {
    /// 128-bit MD4, the historical CSS-Modules default.
    #[default]
    Md4,
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

impl HashFunction {
    /// Hashes `salt` followed by `input`.
    pub fn digest(self, salt: &[u8], input: &[u8]) -> Vec<u8> {
        fn run<D: Digest>(salt: &[u8], input: &[u8]) -> Vec<u8> {
            let mut hasher = D::new();
            hasher.update(salt);
            hasher.update(input);
            hasher.finalize().to_vec()
        }

        match self {
            HashFunction::Md4 => run::<md4::Md4>(salt, input),
            HashFunction::Md5 => run::<md5::Md5>(salt, input),
            HashFunction::Sha1 => run::<sha1::Sha1>(salt, input),
            HashFunction::Sha256 => run::<sha2::Sha256>(salt, input),
            HashFunction::Sha512 => run::<sha2::Sha512>(salt, input),
        }
    }
}

impl FromStr for HashFunction {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md4" => Ok(HashFunction::Md4),
            "md5" => Ok(HashFunction::Md5),
            "sha1" => Ok(HashFunction::Sha1),
            "sha256" => Ok(HashFunction::Sha256),
            "sha512" => Ok(HashFunction::Sha512),
            _ => Err(ConfigurationError::UnknownHashFunction {
                name: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for HashFunction {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HashFunction> for String {
    fn from(function: HashFunction) -> Self {
        function.to_string()
    }
}

impl fmt::Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HashFunction::Md4 => "md4",
            HashFunction::Md5 => "md5",
            HashFunction::Sha1 => "sha1",
            HashFunction::Sha256 => "sha256",
            HashFunction::Sha512 => "sha512",
        };
        f.write_str(name)
    }
}

/// How digest bytes are turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DigestEncoding {
    /// Lowercase hexadecimal.
    #[default]
    Hex,
    /// Positional notation over one of the fixed alphabets below, reading the
    /// digest as a little-endian integer.
    Base(u8),
}

const BASE_ALPHABETS: &[(u8, &str)] = &[
    (26, "abcdefghijklmnopqrstuvwxyz"),
    (32, "123456789abcdefghjkmnpqrstuvwxyz"),
    (36, "0123456789abcdefghijklmnopqrstuvwxyz"),
    (49, "abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ"),
    (52, "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ"),
    (58, "123456789abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ"),
    (62, "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ"),
    (64, "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ-_"),
];

fn alphabet(base: u8) -> Option<&'static [u8]> {
    BASE_ALPHABETS
        .iter()
        .find(|(b, _)| *b == base)
        .map(|(_, table)| table.as_bytes())
}

impl DigestEncoding {
    /// Encodes `digest`, keeping at most `length` characters.
    pub fn encode(self, digest: &[u8], length: usize) -> String {
        let mut encoded = match self {
            DigestEncoding::Hex => hex::encode(digest),
            DigestEncoding::Base(base) => encode_base(digest, base),
        };
        encoded.truncate(length);
        encoded
    }
}

fn encode_base(digest: &[u8], base: u8) -> String {
    let Some(table) = alphabet(base) else {
        return hex::encode(digest);
    };
    let base = u32::from(base);

    // Most significant byte first.
    let mut number: Vec<u8> = digest.iter().rev().copied().collect();
    let mut output = Vec::new();

    while number.iter().any(|byte| *byte != 0) {
        let mut remainder = 0u32;
        for byte in number.iter_mut() {
            let acc = remainder * 256 + u32::from(*byte);
            *byte = (acc / base) as u8;
            remainder = acc % base;
        }
        output.push(table[remainder as usize]);
    }

    output.reverse();
    String::from_utf8_lossy(&output).into_owned()
}

impl FromStr for DigestEncoding {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        if lower == "hex" {
            return Ok(DigestEncoding::Hex);
        }
        lower
            .strip_prefix("base")
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|base| alphabet(*base).is_some())
            .map(DigestEncoding::Base)
            .ok_or_else(|| ConfigurationError::UnknownDigest {
                name: s.to_string(),
            })
    }
}

impl TryFrom<String> for DigestEncoding {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DigestEncoding> for String {
    fn from(digest: DigestEncoding) -> Self {
        digest.to_string()
    }
}

impl fmt::Display for DigestEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestEncoding::Hex => f.write_str("hex"),
            DigestEncoding::Base(base) => write!(f, "base{}", base),
        }
    }
}

/// Build-wide hashing parameters.
///
/// Placeholders such as `[sha256:hash:base64:8]` override the function,
/// digest and length for that one placeholder; the salt always applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashOptions {
    pub function: HashFunction,
    pub digest: DigestEncoding,
    pub length: usize,
    pub salt: String,
}

impl Default for HashOptions {
    fn default() -> Self {
        Self {
            function: HashFunction::Md4,
            digest: DigestEncoding::Hex,
            length: DEFAULT_HASH_LENGTH,
            salt: String::new(),
        }
    }
}

impl HashOptions {
    /// Checks that the options can produce a non-empty hash.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.length == 0 {
            return Err(ConfigurationError::InvalidHashLength);
        }
        Ok(())
    }
}
