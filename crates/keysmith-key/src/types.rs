use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::ParameterError;

/// Container used for the private key text.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivateKeyFormat {
    /// `openssh-key-v1`, as written by `ssh-keygen`
    #[default]
    OpenSsh,
    /// PKCS#8 PEM (`PRIVATE KEY` / `ENCRYPTED PRIVATE KEY`)
    Pkcs8,
}

impl PrivateKeyFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            PrivateKeyFormat::OpenSsh => "openssh",
            PrivateKeyFormat::Pkcs8 => "pkcs8",
        }
    }
}

impl fmt::Display for PrivateKeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrivateKeyFormat {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openssh" => Ok(PrivateKeyFormat::OpenSsh),
            "pkcs8" => Ok(PrivateKeyFormat::Pkcs8),
            _ => Err(ParameterError::UnknownFormat(s.to_string())),
        }
    }
}

/// Single-line free text appended to the public key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Comment(String);

impl Comment {
    pub fn new(comment: impl Into<String>) -> Result<Self, ParameterError> {
        let comment = comment.into();
        if comment.contains(['\n', '\r']) {
            return Err(ParameterError::CommentContainsNewline);
        }
        Ok(Self(comment))
    }

    /// An empty or blank comment is the same as no comment.
    pub fn parse(comment: Option<&str>) -> Result<Option<Self>, ParameterError> {
        match comment {
            Some(comment) if !comment.trim().is_empty() => Self::new(comment).map(Some),
            _ => Ok(None),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Secret used to encrypt the private key.
///
/// Held in a zeroizing buffer; used verbatim, whitespace included.
#[derive(Clone)]
pub struct Passphrase(Zeroizing<String>);

impl Passphrase {
    pub fn new(passphrase: impl Into<String>) -> Result<Self, ParameterError> {
        let passphrase = Zeroizing::new(passphrase.into());
        if passphrase.trim().is_empty() {
            return Err(ParameterError::EmptyPassphrase);
        }
        Ok(Self(passphrase))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase(<redacted>)")
    }
}
