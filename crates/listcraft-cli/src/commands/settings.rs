use anyhow::Result;
use colored::Colorize;
use listcraft_core::settings::SettingKey;

use super::session::Session;

pub async fn show(session: &Session) -> Result<()> {
    let snapshot = session.context.settings.snapshot().await;
    for key in SettingKey::all() {
        let value = snapshot.get(key);
        let shown = if value.is_empty() {
            "(unset)".dimmed().to_string()
        } else if key.is_secret() {
            mask(value)
        } else {
            value.to_string()
        };
        println!("{:<16} {}", key.as_ref(), shown);
    }
    Ok(())
}

/// Keeps the last four characters of a secret.
fn mask(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}
