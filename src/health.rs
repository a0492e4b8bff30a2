//! The `tone health` command: probe the analysis service and report.

use anyhow::Result;

use crate::client::ApiClient;
use crate::config::Config;

/// CLI entry point for `tone health`: probe the service and report.
pub async fn run_health(config: &Config) -> Result<()> {
    let client = ApiClient::from_config(&config.api)?;
    let healthy = client.health().await?;

    println!("{:<28} {:<10}", "SERVICE", "HEALTHY");
    println!("{:<28} {:<10}", client.base_url(), healthy);

    if !healthy {
        anyhow::bail!("service at {} reported unhealthy", client.base_url());
    }
    Ok(())
}
