use clap::{Parser, Subcommand};
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

use intake_cli::config::Config;

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Intake - conversational profile intake chat service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to bind (overrides INTAKE_HOST)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides INTAKE_PORT / PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Check that a running server answers its health endpoint
    Ping {
        /// Base URL of the server
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        url: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = handle_command(cli.command).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Serve { host, port } => {
            let config = Config::from_env()?.with_overrides(host, port)?;
            println!("{}", "🚀 Starting Intake server...".green().bold());
            println!(
                "{} http://{}",
                "📡 Listening on".cyan(),
                config.bind_address()
            );
            intake_cli::run_server(config).await
        }
        Commands::Ping { url } => ping(&url).await,
    }
}

async fn ping(base_url: &str) -> anyhow::Result<()> {
    let url = format!("{}/api/health", base_url.trim_end_matches('/'));
    let response = reqwest::get(&url).await?.error_for_status()?;
    let body: serde_json::Value = response.json().await?;

    println!("{} {}", "✅ Server healthy:".green(), url);
    println!(
        "{} {}",
        "🤖 Model:".cyan(),
        body["model"].as_str().unwrap_or("unknown")
    );
    if body["model_configured"] != true {
        println!(
            "{}",
            "⚠️  OPENAI_API_KEY is not configured; chat requests will fail".yellow()
        );
    }
    Ok(())
}
