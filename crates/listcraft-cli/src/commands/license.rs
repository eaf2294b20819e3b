use anyhow::{Result, bail};
use colored::Colorize;

use super::session::Session;

pub async fn run(session: &Session, key: Option<String>) -> Result<()> {
    let license = &session.context.license;
    let status = match key {
        Some(key) => license.activate(&key).await?,
        None => license.status().await.unwrap_or_default(),
    };

    if status.is_valid {
        println!(
            "{} {} (validated {})",
            "Licensed".green(),
            status.license_key,
            status.validated_at
        );
        return Ok(());
    }

    match status.error {
        Some(error) => bail!("Not licensed: {error}"),
        None => bail!("Not licensed"),
    }
}
