//! One CLI run: the context, its backend and the options that seed it.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use listcraft_application::AppContext;
use listcraft_core::config::ClientConfig;
use listcraft_core::settings::SettingKey;
use listcraft_infrastructure::InMemoryBackend;

use crate::GlobalArgs;

pub struct Session {
    pub context: AppContext,
    pub backend: Arc<InMemoryBackend>,
    pub property_id: String,
}

impl Session {
    /// Builds the context, applies `--api-key` and `--set`, then bootstraps.
    pub async fn open(globals: &GlobalArgs, config: &ClientConfig) -> Result<Self> {
        let backend = Arc::new(InMemoryBackend::new(config.backend.clone()));
        let context = AppContext::new(backend.clone());

        let mut seeds = globals
            .settings
            .iter()
            .map(String::as_str)
            .map(parse_setting)
            .collect::<Result<Vec<_>>>()?;
        if let Some(api_key) = &globals.api_key {
            seeds.push((SettingKey::ApiKey, api_key.clone()));
        }
        for (key, value) in seeds {
            context
                .settings
                .save_setting(key, &value)
                .await
                .with_context(|| format!("Failed to apply setting {key}"))?;
        }

        let license = context.bootstrap().await;
        if !license.is_valid {
            tracing::debug!("Running unlicensed: {}", license.error.unwrap_or_default());
        }

        Ok(Self {
            context,
            backend,
            property_id: globals.property.clone(),
        })
    }

    pub fn close(&self) {
        self.context.shutdown();
    }
}

/// Parses `key=value`; the key uses the snake_case setting name.
fn parse_setting(pair: &str) -> Result<(SettingKey, String)> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected KEY=VALUE, got '{pair}'"))?;
    let key = SettingKey::from_str(key.trim()).map_err(|_| {
        let known: Vec<String> = SettingKey::all().map(|k| k.to_string()).collect();
        anyhow!("Unknown setting '{}' (expected one of: {})", key, known.join(", "))
    })?;
    Ok((key, value.trim().to_string()))
}
