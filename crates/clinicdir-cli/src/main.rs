mod auth;
mod cli;
mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands, OutputFormat};
use client::DirectoryClient;
use output::print_error;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let profile = &cli.profile;

    match &cli.command {
        Commands::Login(args) => {
            let server = config::resolve_server(&cli.server, profile)?;
            commands::auth::login(&server, args, profile).await?;
        }
        Commands::Logout => {
            commands::auth::logout(profile).await?;
        }
        Commands::Whoami => {
            commands::auth::whoami(profile)?;
        }
        Commands::Config(args) => match &args.command {
            cli::ConfigCommands::Show => {
                let cfg = config::load_profile(profile)?;
                println!("{}: {}", "Profile".cyan(), profile);
                println!(
                    "{}: {}",
                    "Server".cyan(),
                    cfg.server.as_deref().unwrap_or("(not set)")
                );
                println!(
                    "{}: {}",
                    "Format".cyan(),
                    cfg.format.as_deref().unwrap_or("table")
                );
            }
            cli::ConfigCommands::Set(set_args) => {
                let mut cfg = config::load_profile(profile)?;
                cfg.set(&set_args.key, &set_args.value)?;
                config::save_profile(profile, &cfg)?;
                output::print_success(&format!("Set {} = {}", set_args.key, set_args.value));
            }
        },
        Commands::Status => {
            let server = config::resolve_server(&cli.server, profile)?;
            let client = make_client(&server, profile)?;
            commands::server::status(&client, &server).await?;
        }
        Commands::Search(args) => {
            let server = config::resolve_server(&cli.server, profile)?;
            let client = make_client(&server, profile)?;
            let format = resolve_format(cli.format, profile)?;
            commands::search::search_doctors(&client, args, format).await?;
        }
        Commands::Hospitals => {
            let server = config::resolve_server(&cli.server, profile)?;
            let client = make_client(&server, profile)?;
            let format = resolve_format(cli.format, profile)?;
            commands::directory::hospitals(&client, format).await?;
        }
        Commands::Departments => {
            let server = config::resolve_server(&cli.server, profile)?;
            let client = make_client(&server, profile)?;
            let format = resolve_format(cli.format, profile)?;
            commands::directory::departments(&client, format).await?;
        }
        Commands::Refresh(args) => {
            let server = config::resolve_server(&cli.server, profile)?;
            let client = make_client(&server, profile)?;
            let format = resolve_format(cli.format, profile)?;
            commands::directory::refresh(&client, args.entity, format).await?;
        }
    }

    Ok(())
}

/// `--format`, then the profile's format, then table.
fn resolve_format(flag: Option<OutputFormat>, profile: &str) -> Result<OutputFormat> {
    if let Some(format) = flag {
        return Ok(format);
    }
    Ok(config::load_profile(profile)?
        .output_format()
        .unwrap_or_default())
}

fn make_client(server: &str, profile: &str) -> Result<DirectoryClient> {
    let token = auth::active_token(profile)?;
    Ok(DirectoryClient::new(server, token))
}
