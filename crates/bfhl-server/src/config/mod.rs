//! Configuration loading and resolution.
//!
//! Everything the server needs from its environment is gathered into a
//! [`ServerConfig`] once, at startup, and handed to the components that
//! need it.

use std::time::Duration;

use clap::Args;

/// OpenAI-compatible Groq endpoint.
pub const DEFAULT_AI_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_AI_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
/// Request body limit, matching common JSON body-parser defaults.
pub const DEFAULT_BODY_LIMIT: usize = 100 * 1024;

/// AI provider settings.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_AI_BASE_URL.to_string(),
            model: DEFAULT_AI_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
        }
    }
}

impl AiConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Process-wide server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Returned in every response envelope. Omitted from responses when unset.
    pub official_email: Option<String>,
    pub host: String,
    pub port: u16,
    pub body_limit: usize,
    pub ai: AiConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            official_email: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            body_limit: DEFAULT_BODY_LIMIT,
            ai: AiConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Listen address (host:port).
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Log the startup summary.
    pub fn log_summary(&self) {
        tracing::info!("BFHL API server");
        tracing::info!("Port: {}", self.port);
        tracing::info!(
            "Email: {}",
            self.official_email.as_deref().unwrap_or("Not configured")
        );
        if self.ai.is_configured() {
            tracing::info!("AI: configured ({})", self.ai.model);
        } else {
            tracing::warn!("AI: not configured, AI questions will answer \"Unavailable\"");
        }
        tracing::info!("Endpoints: GET /health, POST /bfhl");
    }
}

/// AI provider command-line arguments.
#[derive(Args, Debug, Clone)]
pub struct AiArgs {
    /// API key for the AI provider.
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible chat completion API.
    #[arg(long, env = "GROQ_BASE_URL", default_value = DEFAULT_AI_BASE_URL)]
    pub ai_base_url: String,

    /// Chat model to query.
    #[arg(long, env = "GROQ_MODEL", default_value = DEFAULT_AI_MODEL)]
    pub ai_model: String,

    /// Timeout for one AI call, in seconds.
    #[arg(long, env = "AI_TIMEOUT_SECS", default_value_t = DEFAULT_AI_TIMEOUT_SECS)]
    pub ai_timeout_secs: u64,
}

impl AiArgs {
    pub fn into_config(self) -> AiConfig {
        AiConfig {
            api_key: non_empty(self.api_key),
            base_url: self.ai_base_url,
            model: self.ai_model,
            timeout: Duration::from_secs(self.ai_timeout_secs),
        }
    }
}

/// Server command-line arguments.
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Email reported in every response.
    #[arg(long, env = "OFFICIAL_EMAIL")]
    pub email: Option<String>,

    /// Listen host.
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Listen port.
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Maximum request body size, in bytes.
    #[arg(long, env = "BODY_LIMIT", default_value_t = DEFAULT_BODY_LIMIT)]
    pub body_limit: usize,

    #[command(flatten)]
    pub ai: AiArgs,
}

impl ServeArgs {
    pub fn into_config(self) -> ServerConfig {
        ServerConfig {
            official_email: non_empty(self.email),
            host: self.host,
            port: self.port,
            body_limit: self.body_limit,
            ai: self.ai.into_config(),
        }
    }
}

/// Treat blank values (e.g. `GROQ_API_KEY=` in a `.env` file) as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
