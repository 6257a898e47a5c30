//! BFHL API server: one multiplexed endpoint for fibonacci, prime, lcm, hcf, and AI queries.

pub mod ai;
pub mod config;
pub mod protocol;
pub mod transport;
pub mod types;

use std::sync::Arc;

use bfhl::ContentGuard;

pub use ai::{ask_ai, AiProvider, GroqClient};
pub use config::ServerConfig;
pub use protocol::{Dispatcher, Reply};
pub use transport::HttpTransport;
pub use types::{ServerError, ServerResult};

/// Build the dispatcher for `config`, talking to the configured AI provider.
pub fn build_dispatcher(config: &ServerConfig) -> ServerResult<Dispatcher> {
    let provider: Arc<dyn AiProvider> = if config.ai.is_configured() {
        Arc::new(GroqClient::new(config.ai.clone()))
    } else {
        Arc::new(ai::UnconfiguredProvider)
    };
    Ok(Dispatcher::new(
        config.official_email.clone(),
        ContentGuard::new()?,
        provider,
    ))
}
