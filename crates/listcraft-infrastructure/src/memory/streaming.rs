use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use listcraft_core::commands::GenerationCommands;
use listcraft_core::config::LocalBackendConfig;
use listcraft_core::error::{ListcraftError, Result};
use listcraft_core::generation::{
    EmailParams, EventSink, GenerationRecord, GenerationType, ListingParams, SocialParams,
    StreamEvent,
};
use listcraft_core::settings::SettingKey;
use tokio::sync::RwLock;

use super::{InMemoryBackend, Tables, copywriter, new_id, now};

/// Everything a streamed generation needs once the request was accepted.
struct PreparedGeneration {
    record: GenerationRecord,
    input_tokens: u32,
}

impl InMemoryBackend {
    /// Validates the request against the tables and composes its output.
    async fn prepare(
        &self,
        property_id: &str,
        brand_voice_id: Option<&str>,
        generation_type: GenerationType,
        compose: impl FnOnce(Option<&str>, &Tables) -> String,
    ) -> Result<PreparedGeneration> {
        let tables = self.tables.read().await;
        if tables.setting(SettingKey::ApiKey).is_empty() {
            return Err(ListcraftError::MissingApiKey);
        }
        let voice_name = tables.voice_name(brand_voice_id)?;
        let content = compose(voice_name.as_deref(), &tables);
        let created_at = now();

        Ok(PreparedGeneration {
            input_tokens: copywriter::estimate_tokens(property_id) + 150,
            record: GenerationRecord {
                id: new_id(),
                property_id: property_id.to_string(),
                content,
                generation_type,
                style: None,
                tone: None,
                length: None,
                seo_keywords: Vec::new(),
                brand_voice_id: brand_voice_id.map(str::to_string),
                tokens_used: 0,
                generation_cost_cents: 0,
                is_favorite: false,
                created_at,
            },
        })
    }

    fn dispatch(&self, prepared: PreparedGeneration, sink: EventSink) {
        tokio::spawn(stream_generation(
            prepared,
            sink,
            self.config.clone(),
            self.tables.clone(),
        ));
    }
}

/// Streams `prepared.record.content` in chunks, then stores the record.
///
/// Stops quietly when the client stops listening; nothing is stored then.
async fn stream_generation(
    prepared: PreparedGeneration,
    sink: EventSink,
    config: LocalBackendConfig,
    tables: Arc<RwLock<Tables>>,
) {
    let PreparedGeneration {
        mut record,
        input_tokens,
    } = prepared;
    let output_tokens = copywriter::estimate_tokens(&record.content);
    let session = sink.session_id();

    let mut events = vec![StreamEvent::Started {
        estimated_tokens: output_tokens,
    }];
    events.extend(chunks(&record.content, config.chunk_chars).map(|text| StreamEvent::Delta {
        text: text.to_string(),
    }));

    for event in events {
        if sink.send(event).is_err() {
            tracing::debug!("[InMemoryBackend] Client left session {}, stopping", session);
            return;
        }
        if config.stream_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.stream_delay_ms)).await;
        }
    }

    let cost_cents = copywriter::cost_cents(input_tokens, output_tokens);
    record.tokens_used = input_tokens + output_tokens;
    record.generation_cost_cents = cost_cents;
    let full_text = record.content.clone();
    tables.write().await.listings.insert(0, record);

    let finished = StreamEvent::Finished {
        full_text,
        input_tokens,
        output_tokens,
        cost_cents,
    };
    if sink.send(finished).is_err() {
        tracing::debug!("[InMemoryBackend] Session {} finished unobserved", session);
    }
}

/// Splits `text` into pieces of at most `size` characters, on char
/// boundaries. A zero size yields the whole text at once.
fn chunks(text: &str, size: usize) -> impl Iterator<Item = &str> {
    let size = if size == 0 { usize::MAX } else { size };
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let end = rest
            .char_indices()
            .nth(size)
            .map_or(rest.len(), |(idx, _)| idx);
        let (head, tail) = rest.split_at(end);
        rest = tail;
        Some(head)
    })
}

#[async_trait]
impl GenerationCommands for InMemoryBackend {
    async fn generate_listing(&self, params: ListingParams, sink: EventSink) -> Result<()> {
        let mut prepared = self
            .prepare(
                &params.property_id,
                params.brand_voice_id.as_deref(),
                GenerationType::Listing,
                |voice, tables| copywriter::listing(&params, voice, &tables.agent_info()),
            )
            .await?;
        prepared.record.style = Some(params.style);
        prepared.record.tone = Some(params.tone);
        prepared.record.length = Some(params.length);
        prepared.record.seo_keywords = params.seo_keywords;

        tracing::info!(
            "[InMemoryBackend] Streaming {} listing for {}",
            params.style,
            params.property_id
        );
        self.dispatch(prepared, sink);
        Ok(())
    }

    async fn generate_social(&self, params: SocialParams, sink: EventSink) -> Result<()> {
        let prepared = self
            .prepare(
                &params.property_id,
                params.brand_voice_id.as_deref(),
                params.platform.generation_type(),
                |voice, _| copywriter::social(params.platform, voice),
            )
            .await?;

        tracing::info!(
            "[InMemoryBackend] Streaming {} post for {}",
            params.platform,
            params.property_id
        );
        self.dispatch(prepared, sink);
        Ok(())
    }

    async fn generate_email(&self, params: EmailParams, sink: EventSink) -> Result<()> {
        let prepared = self
            .prepare(
                &params.property_id,
                params.brand_voice_id.as_deref(),
                params.template_type.generation_type(),
                |_, tables| copywriter::email(params.template_type, &tables.agent_info()),
            )
            .await?;

        tracing::info!(
            "[InMemoryBackend] Streaming {} email for {}",
            params.template_type,
            params.property_id
        );
        self.dispatch(prepared, sink);
        Ok(())
    }
}
