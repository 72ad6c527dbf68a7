use serde::{Deserialize, Serialize};

/// Shown in place of an email address when a GitHub account keeps it private.
pub const NO_PUBLIC_EMAIL: &str = "No public email";

/// The provider-independent view of a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub image_url: String,
}

/// Claims read from a Google identity token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleIdClaims {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub picture: String,
}

/// Subset of `GET /user` that the profile needs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: String,
}

/// Google OpenID userinfo response, used by the server-side Google relay.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleUserInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<GoogleIdClaims> for Profile {
    fn from(claims: GoogleIdClaims) -> Self {
        Profile {
            name: claims.name,
            email: claims.email,
            image_url: claims.picture,
        }
    }
}

impl From<GitHubUser> for Profile {
    fn from(user: GitHubUser) -> Self {
        Profile {
            name: non_empty(user.name).unwrap_or(user.login),
            email: non_empty(user.email).unwrap_or_else(|| NO_PUBLIC_EMAIL.to_string()),
            image_url: user.avatar_url,
        }
    }
}

impl From<GoogleUserInfo> for Profile {
    fn from(info: GoogleUserInfo) -> Self {
        let email = non_empty(info.email).unwrap_or_default();
        Profile {
            // Fall back to the address the same way GitHub falls back to the login.
            name: non_empty(info.name).unwrap_or_else(|| email.clone()),
            email,
            image_url: info.picture.unwrap_or_default(),
        }
    }
}
