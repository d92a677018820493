use anyhow::Result;
use colored::Colorize;

use crate::client::DirectoryClient;

pub async fn status(client: &DirectoryClient, server: &str) -> Result<()> {
    for (probe, code, body) in client.health().await? {
        if code == 200 {
            println!("{} {} {} is {}", "✓".green(), server.cyan(), probe, "healthy".green());
        } else {
            println!(
                "{} {} {} returned {}",
                "✗".red(),
                server.cyan(),
                probe,
                code.to_string().red()
            );
        }
        if !body.is_empty() {
            println!("  {body}");
        }
    }
    Ok(())
}
