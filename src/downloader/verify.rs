use crate::error::ChecksumError;
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksum {
    cs_type: CsType,
    contents: String,
}

impl Checksum {
    pub fn new_inner(hash: impl Into<String>, checksum_type: CsType) -> Self {
        Self {
            cs_type: checksum_type,
            contents: hash.into(),
        }
    }
    /// Guesses the algorithm from the length of a hex digest.
    pub fn new(hash: impl Into<String>) -> Result<Self, ChecksumError> {
        let hash = hash.into();
        let checksum_type = match hash.len() {
            32 => CsType::Md5,
            40 => CsType::Sha1,
            64 => CsType::Sha256,
            _ => return Err(ChecksumError::UnrecognizedSize),
        };
        Ok(Self::new_inner(hash, checksum_type))
    }
    /// Builds a checksum from an algorithm name as published by an upstream API.
    pub fn parse(algorithm: &str, hash: impl Into<String>) -> Result<Self, ChecksumError> {
        Ok(Self::new_inner(hash, algorithm.parse()?))
    }
    pub fn none() -> Self {
        Self::new_inner(String::new(), CsType::None)
    }
    pub fn cs_type(&self) -> CsType {
        self.cs_type
    }
    pub fn contents(&self) -> &str {
        &self.contents
    }
    pub(crate) fn verify(&self, computed: &Checksums) -> Result<(), ChecksumError> {
        let Some(actual) = computed.get(self.cs_type) else {
            return Ok(());
        };
        if actual.eq_ignore_ascii_case(&self.contents) {
            Ok(())
        } else {
            Err(ChecksumError::Mismatch {
                algorithm: self.cs_type,
                expected: self.contents.clone(),
                actual: actual.to_owned(),
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CsType {
    Sha256,
    Sha1,
    Md5,
    /// Skip verification.
    None,
}

impl FromStr for CsType {
    type Err = ChecksumError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "sha1" | "sha-1" => Ok(Self::Sha1),
            "md5" => Ok(Self::Md5),
            "" | "none" => Ok(Self::None),
            _ => Err(ChecksumError::UnsupportedAlgorithm(s.to_owned())),
        }
    }
}

impl fmt::Display for CsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sha256 => "sha256",
            Self::Sha1 => "sha1",
            Self::Md5 => "md5",
            Self::None => "none",
        })
    }
}

/// Hex digests of a downloaded file under every supported algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksums {
    pub sha256: String,
    pub sha1: String,
    pub md5: String,
}

impl Checksums {
    pub fn get(&self, checksum_type: CsType) -> Option<&str> {
        match checksum_type {
            CsType::Sha256 => Some(&self.sha256),
            CsType::Sha1 => Some(&self.sha1),
            CsType::Md5 => Some(&self.md5),
            CsType::None => None,
        }
    }
}

/// Feeds the same bytes into all three digests at once.
#[derive(Default)]
pub(crate) struct Hasher {
    sha256: Sha256,
    sha1: Sha1,
    md5: Md5,
}

impl Hasher {
    pub(crate) fn update(&mut self, data: &[u8]) {
        self.sha256.update(data);
        self.sha1.update(data);
        self.md5.update(data);
    }
    pub(crate) fn finalize(self) -> Checksums {
        Checksums {
            sha256: format!("{:x}", self.sha256.finalize()),
            sha1: format!("{:x}", self.sha1.finalize()),
            md5: format!("{:x}", self.md5.finalize()),
        }
    }
}
