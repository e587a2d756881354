use std::fmt;

use serde::{Deserialize, Serialize};

use crate::turn::require_present;
use crate::TutorError;

const SESSION_TOKEN_BYTES: usize = 16;

/// Opaque per-client token grouping turns across requests.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Mint a fresh token from 16 random bytes, hex encoded.
    pub fn generate() -> Self {
        let bytes: [u8; SESSION_TOKEN_BYTES] = rand::random();
        Self(hex::encode(bytes))
    }

    pub fn parse(raw: impl Into<String>) -> Result<Self, TutorError> {
        let raw = raw.into();
        require_present("Session", &raw)?;
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
