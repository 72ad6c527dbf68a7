use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OauthProvider {
    Google,
    Github,
}

impl OauthProvider {
    /// Lowercase name used in relay paths such as `/api/github/callback`.
    pub fn slug(self) -> &'static str {
        match self {
            OauthProvider::Google => "google",
            OauthProvider::Github => "github",
        }
    }
}

impl fmt::Display for OauthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OauthProvider::Google => "Google",
            OauthProvider::Github => "GitHub",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for OauthProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(OauthProvider::Google),
            "github" => Ok(OauthProvider::Github),
            _ => Err(s.to_string()),
        }
    }
}
