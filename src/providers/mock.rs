/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Echoes the source block back as the answer
 * - `MockProvider::intermittent(n)` - Fails every nth request
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::fail_on(schema)` - Fails only for one response schema
 */

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use crate::providers::{ResponseSchema, StructuredProvider};
use crate::translation::prompts::extract_source;

/// A request seen by the mock provider
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// The full prompt
    pub prompt: String,
    /// Name of the requested schema
    pub schema: String,
    /// The source block of the prompt
    pub source: String,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with a server error
    Failing,
    /// Fails with a client error for one schema, works for the others
    FailOn { schema: &'static str },
    /// Returns an empty JSON object
    Empty,
    /// Returns output that is not JSON
    Malformed,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
    /// Every request received, in order
    requests: Arc<Mutex<Vec<MockRequest>>>,
    /// Transformation applied to each source text (optional)
    custom_response: Option<fn(&str) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that fails only for the named schema
    pub fn fail_on(schema: &'static str) -> Self {
        Self::new(MockBehavior::FailOn { schema })
    }

    /// Create a mock that returns empty objects
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that returns invalid JSON
    pub fn malformed() -> Self {
        Self::new(MockBehavior::Malformed)
    }

    /// Set the transformation applied to each source text
    pub fn with_custom_response(mut self, generator: fn(&str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Snapshot of the requests received so far
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn answer(&self, request: &MockRequest, schema: &ResponseSchema) -> Value {
        let transform = |text: &str| match self.custom_response {
            Some(generator) => generator(text),
            None => text.to_string(),
        };

        let mut object = Map::new();
        if schema.fields.len() == 1 {
            object.insert(
                schema.fields[0].name.clone(),
                Value::String(transform(&request.source)),
            );
        } else {
            let source: Value = serde_json::from_str(&request.source).unwrap_or(Value::Null);
            for name in schema.field_names() {
                let text = source.get(name).and_then(Value::as_str).unwrap_or_default();
                object.insert(name.to_string(), Value::String(transform(text)));
            }
        }
        Value::Object(object)
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            requests: Arc::clone(&self.requests),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl StructuredProvider for MockProvider {
    fn name(&self) -> String {
        "mock".to_string()
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &ResponseSchema,
    ) -> Result<Value, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        let request = MockRequest {
            prompt: prompt.to_string(),
            schema: schema.name.clone(),
            source: extract_source(prompt).unwrap_or(prompt).to_string(),
        };
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        match self.behavior {
            MockBehavior::Working => Ok(self.answer(&request, schema)),

            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(self.answer(&request, schema))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::FailOn { schema: failing } => {
                if schema.name == failing {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated rejection of '{}'", failing),
                        status_code: 400,
                    })
                } else {
                    Ok(self.answer(&request, schema))
                }
            }

            MockBehavior::Empty => Ok(Value::Object(Map::new())),

            MockBehavior::Malformed => Err(ProviderError::ParseError(
                "Simulated non-JSON model output".to_string(),
            )),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.answer(&request, schema))
            }
        }
    }
}
