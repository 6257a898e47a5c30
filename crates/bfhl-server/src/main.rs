//! BFHL API server: entry point.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use bfhl::{OperationKind, MAX_ARRAY_LEN, MAX_ELEMENT, MAX_FIBONACCI_INDEX, MAX_QUESTION_LEN};
use bfhl_server::ai::ask_ai;
use bfhl_server::config::ServeArgs;
use bfhl_server::{build_dispatcher, GroqClient, HttpTransport};

#[derive(Parser)]
#[command(
    name = "bfhl-server",
    about = "BFHL API server: fibonacci, prime, lcm, hcf, and AI over one endpoint",
    version
)]
struct Cli {
    #[command(flatten)]
    serve: ServeArgs,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default).
    Serve,

    /// Ask the AI provider one question and print the one-word answer.
    Ask {
        /// The question.
        question: String,
    },

    /// Print the operation catalogue and bounds as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   bfhl-server completions bash > ~/.local/share/bash-completion/completions/bfhl-server
    ///   bfhl-server completions zsh > ~/.zfunc/_bfhl-server
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal in production.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let config = cli.serve.into_config();
            config.log_summary();
            let dispatcher = build_dispatcher(&config)?;
            let transport = HttpTransport::new(dispatcher, config.body_limit);
            transport.run(&config.addr()).await?;
        }

        Commands::Ask { question } => {
            let client = GroqClient::new(cli.serve.ai.into_config());
            println!("{}", ask_ai(&client, &question).await);
        }

        Commands::Info => {
            let operations: Vec<_> = OperationKind::ALL
                .iter()
                .map(|kind| {
                    serde_json::json!({
                        "key": kind.key(),
                        "argument": kind.argument_shape(),
                    })
                })
                .collect();
            let info = serde_json::json!({
                "version": env!("CARGO_PKG_VERSION"),
                "endpoints": ["GET /health", "POST /bfhl"],
                "operations": operations,
                "bounds": {
                    "max_fibonacci_index": MAX_FIBONACCI_INDEX,
                    "max_array_len": MAX_ARRAY_LEN,
                    "max_element": MAX_ELEMENT,
                    "max_question_len": MAX_QUESTION_LEN,
                },
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "bfhl-server", &mut std::io::stdout());
        }
    }

    Ok(())
}
