//! Main request dispatcher: validates a body, runs the operation, builds the envelope.

use std::sync::Arc;

use serde_json::Value;

use bfhl::{math, parse_request, ContentGuard, Envelope, Operation, Rejection};

use crate::ai::{ask_ai, AiProvider};
use crate::types::{ServerError, ServerResult, INTERNAL_ERROR_MESSAGE};

/// A response ready to be written: status code plus envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub envelope: Envelope,
}

/// Stateless request dispatcher shared by all connections.
pub struct Dispatcher {
    official_email: Option<String>,
    guard: ContentGuard,
    provider: Arc<dyn AiProvider>,
}

impl Dispatcher {
    pub fn new(
        official_email: Option<String>,
        guard: ContentGuard,
        provider: Arc<dyn AiProvider>,
    ) -> Self {
        Self {
            official_email,
            guard,
            provider,
        }
    }

    /// Body of `GET /health`.
    pub fn health(&self) -> Envelope {
        Envelope::health(self.official_email.clone())
    }

    /// Handle a request body as sent, given its `Content-Type`.
    ///
    /// Only JSON media types are parsed. Any other body, or none at all, is
    /// handled as an empty object.
    pub async fn handle_body(&self, content_type: Option<&str>, body: &[u8]) -> Reply {
        if content_type.is_some_and(is_json_content_type) {
            self.handle_raw(body).await
        } else {
            tracing::debug!("Ignoring body with content type {content_type:?}");
            self.handle(&empty_object()).await
        }
    }

    /// Handle a raw JSON body. A zero-length body is an empty object.
    pub async fn handle_raw(&self, body: &[u8]) -> Reply {
        if body.is_empty() {
            return self.handle(&empty_object()).await;
        }
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => self.handle(&value).await,
            Err(e) => {
                tracing::debug!("Malformed request body: {e}");
                self.reject(Rejection::MalformedJson)
            }
        }
    }

    /// Handle a parsed request body.
    pub async fn handle(&self, body: &Value) -> Reply {
        let operation = match parse_request(body, &self.guard) {
            Ok(op) => op,
            Err(rejection) => return self.reject(rejection),
        };

        let kind = operation.kind();
        match self.execute(operation).await {
            Ok(data) => {
                tracing::debug!("Handled {kind}");
                Reply {
                    status: 200,
                    envelope: Envelope::success(self.official_email.clone(), data),
                }
            }
            Err(e) => {
                tracing::error!("Operation {kind} failed: {e}");
                self.internal_error()
            }
        }
    }

    /// Run a validated operation under its failure policy.
    pub async fn execute(&self, operation: Operation) -> ServerResult<Value> {
        let policy = operation.failure_policy();
        let result = match operation {
            Operation::Fibonacci(n) => serde_json::to_value(math::fibonacci(n)).map_err(Into::into),
            Operation::Prime(values) => Ok(Value::from(math::primes(&values))),
            Operation::Lcm(values) => math::lcm(&values)
                .map(Value::from)
                .map_err(ServerError::from),
            Operation::Hcf(values) => Ok(Value::from(math::hcf(&values))),
            Operation::Ai(question) => {
                tracing::debug!("Asking {} provider", self.provider.name());
                Ok(Value::String(ask_ai(self.provider.as_ref(), &question).await))
            }
        };
        policy.resolve(result)
    }

    /// The 400/403 reply for a rejected request.
    pub fn reject(&self, rejection: Rejection) -> Reply {
        tracing::debug!("Rejected request: {rejection}");
        Reply {
            status: rejection.status(),
            envelope: Envelope::failure(self.official_email.clone(), rejection.to_string()),
        }
    }

    /// The generic 500 reply. Never carries internal details.
    pub fn internal_error(&self) -> Reply {
        Reply {
            status: 500,
            envelope: Envelope::failure(self.official_email.clone(), INTERNAL_ERROR_MESSAGE),
        }
    }
}

/// Whether a `Content-Type` header names JSON: `application/json` or any
/// `+json` structured syntax suffix, parameters ignored.
pub fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.split_once('/') {
        Some((kind, subtype)) => {
            !kind.is_empty()
                && !kind.contains(char::is_whitespace)
                && (essence == "application/json" || subtype.ends_with("+json"))
        }
        None => false,
    }
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}
