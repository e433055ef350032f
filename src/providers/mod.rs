/*!
 * Provider implementations for the structured translation capability.
 *
 * Every provider answers a prompt with a JSON object shaped by a
 * `ResponseSchema`:
 * - Gemini: Google Generative Language API with a response schema
 * - Ollama: Local LLM server with a JSON-schema `format`
 * - Mock: Scripted behaviour for tests
 *
 * Retries belong to this boundary: `RetryingProvider` wraps any provider
 * with exponential backoff so callers see a single fallible operation.
 */

use async_trait::async_trait;
use log::warn;
use serde_json::{json, Map, Value};
use std::fmt::Debug;
use std::time::Duration;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::ProviderError;

pub mod gemini;
pub mod mock;
pub mod ollama;

/// A named string field of a structured response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    /// JSON property name
    pub name: String,
    /// Description given to the model
    pub description: String,
}

/// Shape of the JSON object a provider must return (string fields only)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSchema {
    /// Schema name, used in logs
    pub name: String,
    /// Required string fields
    pub fields: Vec<SchemaField>,
}

impl ResponseSchema {
    /// Create an empty schema
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a required string field
    pub fn field(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.fields.push(SchemaField {
            name: name.into(),
            description: description.into(),
        });
        self
    }

    /// Names of the fields, in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Standard JSON Schema representation
    pub fn to_json_schema(&self) -> Value {
        self.render("object", "string")
    }

    /// OpenAPI-style representation with upper-case type names
    pub fn to_openapi_schema(&self) -> Value {
        self.render("OBJECT", "STRING")
    }

    fn render(&self, object_type: &str, string_type: &str) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| {
                (
                    f.name.clone(),
                    json!({ "type": string_type, "description": f.description }),
                )
            })
            .collect();

        json!({
            "type": object_type,
            "properties": properties,
            "required": self.field_names().collect::<Vec<_>>(),
        })
    }
}

/// Common trait for all structured translation providers
#[async_trait]
pub trait StructuredProvider: Send + Sync + Debug {
    /// Short provider name for logs
    fn name(&self) -> String;

    /// Answer `prompt` with a JSON object following `schema`
    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &ResponseSchema,
    ) -> Result<Value, ProviderError>;
}

#[async_trait]
impl StructuredProvider for Box<dyn StructuredProvider> {
    fn name(&self) -> String {
        (**self).name()
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &ResponseSchema,
    ) -> Result<Value, ProviderError> {
        (**self).generate_structured(prompt, schema).await
    }
}

/// Parse model output into a JSON object.
///
/// Tolerates a surrounding markdown code fence.
pub fn parse_json_object(text: &str) -> Result<Value, ProviderError> {
    let mut body = text.trim();
    if body.starts_with("```") {
        body = body.split_once('\n').map_or("", |(_, rest)| rest);
        body = body.trim_end().trim_end_matches("```").trim_end();
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| ProviderError::ParseError(format!("Invalid JSON from model: {}", e)))?;

    if value.is_object() {
        Ok(value)
    } else {
        Err(ProviderError::ParseError(
            "Model output is not a JSON object".to_string(),
        ))
    }
}

/// Provider wrapper that retries transient failures with exponential backoff
#[derive(Debug)]
pub struct RetryingProvider<P> {
    inner: P,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl<P: StructuredProvider> RetryingProvider<P> {
    /// Wrap `inner`, retrying up to `max_retries` times
    pub fn new(inner: P, max_retries: u32, backoff_base_ms: u64) -> Self {
        Self {
            inner,
            max_retries,
            backoff_base_ms,
        }
    }
}

#[async_trait]
impl<P: StructuredProvider> StructuredProvider for RetryingProvider<P> {
    fn name(&self) -> String {
        self.inner.name()
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &ResponseSchema,
    ) -> Result<Value, ProviderError> {
        let mut attempt = 0u32;
        loop {
            match self.inner.generate_structured(prompt, schema).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let backoff_ms = self.backoff_base_ms.saturating_mul(1u64 << attempt.min(16));
                    attempt += 1;
                    warn!(
                        "{} request for '{}' failed ({}), retry {}/{} in {}ms",
                        self.inner.name(),
                        schema.name,
                        e,
                        attempt,
                        self.max_retries,
                        backoff_ms
                    );
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Build the configured provider, wrapped with retries
pub fn build_provider(config: &TranslationConfig) -> Result<Box<dyn StructuredProvider>, ProviderError> {
    let timeout = Duration::from_secs(config.get_timeout_secs());
    let temperature = config.common.temperature;
    let retries = config.common.retry_count;
    let backoff = config.common.retry_backoff_ms;

    let provider: Box<dyn StructuredProvider> = match config.provider {
        TranslationProvider::Gemini => {
            let api_key = config.get_api_key();
            if api_key.is_empty() {
                return Err(ProviderError::AuthenticationError(
                    "No Gemini API key configured".to_string(),
                ));
            }
            let client = gemini::Gemini::new(api_key, config.get_endpoint(), config.get_model(), timeout)?
                .temperature(temperature);
            Box::new(RetryingProvider::new(client, retries, backoff))
        }
        TranslationProvider::Ollama => {
            let client = ollama::Ollama::new(config.get_endpoint(), config.get_model(), timeout)?
                .temperature(temperature);
            Box::new(RetryingProvider::new(client, retries, backoff))
        }
    };

    Ok(provider)
}
