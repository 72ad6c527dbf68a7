use reqwest::Url;

use super::LoginError;

/// What the browser lands on after GitHub sends it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackOutcome {
    pub code: Option<String>,
    /// The landing URL with the code stripped, so a reload cannot replay it.
    pub cleaned_url: Url,
}

pub fn parse_url(raw: &str) -> Result<Url, LoginError> {
    Url::parse(raw.trim()).map_err(|err| LoginError::InvalidUrl {
        url: raw.to_string(),
        message: err.to_string(),
    })
}

/// Link that starts the GitHub login. Only `client_id` and `redirect_uri`
/// are sent; the app asks for no scopes and carries no `state`.
// TODO: add a per-attempt `state` value and check it in `take_code` to close the CSRF gap.
pub fn github_authorize_url(
    authorize_url: &str,
    client_id: &str,
    redirect_uri: &str,
) -> Result<Url, LoginError> {
    let mut url = parse_url(authorize_url)?;
    url.query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("redirect_uri", redirect_uri);
    Ok(url)
}

pub fn take_code(url: &Url) -> CallbackOutcome {
    let code = url
        .query_pairs()
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty());

    let mut cleaned_url = url.clone();
    cleaned_url.set_query(None);
    cleaned_url.set_fragment(None);
    cleaned_url.set_path("/");

    CallbackOutcome { code, cleaned_url }
}
