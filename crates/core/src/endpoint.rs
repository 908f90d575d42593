//! Endpoint vocabulary: HTTP methods and request-handling behaviors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// HTTP methods an endpoint can be served on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub const ALL: [Method; 2] = [Method::Get, Method::Post];

    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            _ => Err(Error::UnknownMethod(s.to_string())),
        }
    }
}

/// The closed set of request-handling behaviors an endpoint can execute.
///
/// Adding a variant forces every `match` over behaviors to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Behavior {
    /// Sign a fresh token and return it as the response body.
    Issue,
    /// Check the bearer token's signature and expiry.
    Verify,
    /// Parse the bearer token without checking anything.
    Decode,
    /// Always 200.
    ReturnOk,
    /// Always 401.
    ReturnNotAuthenticated,
}

impl Behavior {
    pub const ALL: [Behavior; 5] = [
        Behavior::Issue,
        Behavior::Verify,
        Behavior::Decode,
        Behavior::ReturnOk,
        Behavior::ReturnNotAuthenticated,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Behavior::Issue => "ISSUE",
            Behavior::Verify => "VERIFY",
            Behavior::Decode => "DECODE",
            Behavior::ReturnOk => "RETURN_OK",
            Behavior::ReturnNotAuthenticated => "RETURN_NOT_AUTHENTICATED",
        }
    }

    /// Whether the behavior reads an `Authorization: Bearer` header.
    pub const fn reads_bearer(self) -> bool {
        matches!(self, Behavior::Verify | Behavior::Decode)
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Behavior {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Behavior::ALL
            .into_iter()
            .find(|behavior| behavior.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownBehavior(s.to_string()))
    }
}
