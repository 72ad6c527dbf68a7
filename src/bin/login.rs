use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use login_relay::login::{
    redirect::parse_url, relay_client::HttpTokenRelay, ClientConfig, LoginSession,
};
use login_relay::models::profile::Profile;
use login_relay::services::oauth::{build_http_client, github::client::GitHubProfileClient};
use login_relay::session::FileProfileStore;
use login_relay::utils::logging::init_tracing;

const USAGE: &str = "usage: login <github | google <credential> | whoami | logout>";

fn print_profile(profile: &Profile) {
    println!("{}", profile.name);
    println!("  email: {}", profile.email);
    println!("  image: {}", profile.image_url);
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ClientConfig::from_env().context("invalid login configuration")?;
    init_tracing("login_relay=warn");

    let http_client =
        build_http_client(config.http_timeout).context("failed to build HTTP client")?;
    let relay = Arc::new(HttpTokenRelay::new(http_client.clone(), &config.relay_url));
    let github_profiles = Arc::new(GitHubProfileClient::new(
        http_client,
        &config.github_user_url,
    ));
    let store = Arc::new(FileProfileStore::new(&config.profile_store_path));

    let mut session = LoginSession::new(relay, github_profiles, store);
    session.restore();

    let args: Vec<String> = env::args().skip(1).collect();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["github"] => {
            let url = LoginSession::github_login_url(&config)?;
            println!("Open this URL and authorize the app:\n\n  {url}\n");
            print!("Paste the URL you were redirected to: ");
            io::stdout().flush()?;

            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            let landing = parse_url(&line)?;

            let result = session.handle_redirect(&landing).await;
            match result {
                Ok(outcome) if outcome.code.is_none() => {
                    bail!("no authorization code in {}", landing)
                }
                Ok(_) => {}
                Err(_) => bail!(session.error().unwrap_or("login failed").to_string()),
            }
        }
        ["google"] | ["google", _] => {
            let credential = args.get(1).map(String::as_str).unwrap_or_default();
            if session.sign_in_with_google(credential).is_err() {
                bail!(session.error().unwrap_or("login failed").to_string());
            }
        }
        ["whoami"] => {}
        ["logout"] => {
            session.logout()?;
            println!("Signed out.");
            return Ok(());
        }
        _ => bail!(USAGE),
    }

    match session.user() {
        Some(profile) => print_profile(profile),
        None => println!("Not signed in."),
    }
    Ok(())
}
