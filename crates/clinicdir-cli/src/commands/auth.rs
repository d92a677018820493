use anyhow::{Context, Result};
use colored::Colorize;
use time::OffsetDateTime;

use crate::auth;
use crate::cli::LoginArgs;
use crate::client::DirectoryClient;
use crate::output::{print_error, print_success};

pub async fn login(server: &str, args: &LoginArgs, profile: &str) -> Result<()> {
    let name = args.name.as_deref().context("--name is required")?;
    let password = args.password.as_deref().context("--password is required")?;

    let client = DirectoryClient::new(server, None);
    let session = client.login(name, password).await?;
    auth::save_session(profile, &session)?;
    print_success(&format!(
        "Logged in to {} as {} (until {})",
        session.server.cyan(),
        session.name.cyan(),
        session.expires_at
    ));
    Ok(())
}

/// Ends the session on the server, then forgets the token locally.
pub async fn logout(profile: &str) -> Result<()> {
    let Some(session) = auth::load_session(profile)? else {
        println!("No session found for profile \"{profile}\"");
        return Ok(());
    };

    if !session.is_expired_at(OffsetDateTime::now_utc()) {
        let client = DirectoryClient::new(&session.server, Some(session.token.clone()));
        if let Err(e) = client.logout().await {
            print_error(&format!("Server logout failed: {e:#}"));
        }
    }
    auth::remove_session(profile)?;
    print_success("Logged out (session removed)");
    Ok(())
}

pub fn whoami(profile: &str) -> Result<()> {
    match auth::load_session(profile)? {
        Some(session) => {
            println!("{}: {}", "Profile".cyan(), profile);
            println!("{}: {}", "Server".cyan(), session.server.cyan());
            println!("{}: {}", "Admin".cyan(), session.name);
            println!("{}: {}", "Token".cyan(), session.token_preview());
            if session.is_expired_at(OffsetDateTime::now_utc()) {
                println!("{}: {} ({})", "Session".cyan(), "expired".red(), session.expires_at);
            } else {
                println!("{}: valid until {}", "Session".cyan(), session.expires_at);
            }
        }
        None => {
            print_error(&format!("Not logged in (profile: \"{profile}\")"));
        }
    }
    Ok(())
}
