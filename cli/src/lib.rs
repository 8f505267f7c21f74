use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use deckgen_common::{Config, Style};
use deckgen_core::{generate, GenerateRequest, TemplateSource};
use deckgen_outline::OutlineClient;
use deckgen_pptx::inspect_template;

#[derive(Parser)]
#[command(name = "deckgen")]
#[command(about = "AI-powered presentation generation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Override model (e.g., gpt-4o, gpt-4o-mini)
    #[arg(long)]
    pub model: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive deck creation mode
    Interactive,
    /// Generate a presentation from a topic
    Generate {
        /// Presentation topic
        topic: String,
        /// Number of slides (1-20)
        #[arg(short, long, default_value = "5")]
        pages: usize,
        /// Slide style: default | minimal | business
        #[arg(short, long, default_value = "default")]
        style: String,
        /// Optional .pptx template whose layouts should be reused
        #[arg(short, long)]
        template: Option<PathBuf>,
        /// Output file
        #[arg(short, long, default_value = "presentation.pptx")]
        output: PathBuf,
    },
    /// Show the layouts a template offers
    Inspect {
        /// Path to a .pptx template
        template: PathBuf,
    },
    /// Check that the configured API endpoint answers
    TestConnection,
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.debug);

    if let Some(model) = &cli.model {
        std::env::set_var("DECKGEN_MODEL", model);
    }

    let config = Config::from_env();

    match cli.command {
        Some(Commands::Interactive) | None => {
            deckgen_tui::run_interactive(config).await?;
        }
        Some(Commands::Generate {
            topic,
            pages,
            style,
            template,
            output,
        }) => {
            ensure!(
                (1..=20).contains(&pages),
                "pages must be between 1 and 20, got {pages}"
            );
            let request = GenerateRequest {
                topic,
                num_pages: pages,
                style: Style::parse_lenient(&style),
                template: template.map(TemplateSource::Path),
                output,
            };
            let path = generate(&config, &request).await?;
            println!("Presentation saved to: {}", path.display());
        }
        Some(Commands::Inspect { template }) => {
            let info = inspect_template(&template)?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Some(Commands::TestConnection) => {
            let client = OutlineClient::new(&config);
            if client.test_connection().await {
                println!("Connection OK ({} @ {})", config.model, config.base_url);
            } else {
                println!("Connection failed ({} @ {})", config.model, config.base_url);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    let debug_enabled = debug;
    info!(debug = debug_enabled, "logging initialized");
}
