use anyhow::Result;

use crate::cli::{Collection, OutputFormat};
use crate::client::DirectoryClient;
use crate::output::{print_cache_note, print_departments, print_hospitals, print_json, print_success};

pub async fn hospitals(client: &DirectoryClient, format: OutputFormat) -> Result<()> {
    let envelope = client.hospitals().await?;
    match format {
        OutputFormat::Json => print_json(&envelope.data),
        OutputFormat::Table => {
            print_hospitals(&envelope.data);
            print_cache_note(envelope.cached);
        }
    }
    Ok(())
}

pub async fn departments(client: &DirectoryClient, format: OutputFormat) -> Result<()> {
    let envelope = client.departments().await?;
    match format {
        OutputFormat::Json => print_json(&envelope.data),
        OutputFormat::Table => {
            print_departments(&envelope.data);
            print_cache_note(envelope.cached);
        }
    }
    Ok(())
}

pub async fn refresh(
    client: &DirectoryClient,
    collection: Collection,
    format: OutputFormat,
) -> Result<()> {
    let envelope = client.refresh(collection).await?;
    match format {
        OutputFormat::Json => print_json(&envelope.data),
        OutputFormat::Table => {
            let when = time::OffsetDateTime::from_unix_timestamp_nanos(
                i128::from(envelope.timestamp) * 1_000_000,
            )
            .ok()
            .and_then(|t| t.format(&time::format_description::well_known::Rfc3339).ok())
            .unwrap_or_else(|| envelope.timestamp.to_string());
            let verb = if envelope.refreshed { "Refreshed" } else { "Read" };
            print_success(&format!(
                "{verb} {} ({} entries) at {when}",
                collection.path(),
                envelope.data.len()
            ));
        }
    }
    Ok(())
}
