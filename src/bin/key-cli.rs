use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

use tesla_key_server::config::load_config;
use tesla_key_server::key::{FsKeySource, KeySource};
use tesla_key_server::verify::Verifier;

#[derive(Parser)]
#[command(name = "key-cli")]
#[command(about = "Operator CLI for the Tesla public key server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which candidate file the server would serve
    Locate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Fetch the public well-known URL and check it holds a PEM public key
    Verify {
        url: String,

        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,

        #[arg(long, default_value_t = 200)]
        preview_chars: usize,
    },
    /// Query the admin status endpoint
    Status {
        #[arg(short, long, default_value = "http://localhost:8081")]
        url: String,

        #[arg(short, long)]
        key: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Locate { config } => {
            let config = load_config(&config)?;
            let source = FsKeySource::from_config(&config.key);
            match source.locate() {
                Some(located) => {
                    println!("{} -> {}", located.candidate, located.path.display());
                }
                None => {
                    eprintln!(
                        "No public key under {}. Searched: {}",
                        source.base_dir().display(),
                        source.candidates().describe()
                    );
                    std::process::exit(1);
                }
            }
        }
        Commands::Verify {
            url,
            timeout_secs,
            preview_chars,
        } => {
            let verifier = Verifier::new(Duration::from_secs(timeout_secs), preview_chars)?;
            let report = verifier.check(&url).await;
            println!("{}", report.summary());
            if !report.preview.is_empty() {
                println!("\n{}", report.preview);
            }
            if !report.passed {
                std::process::exit(1);
            }
        }
        Commands::Status { url, key } => {
            let mut headers = HeaderMap::new();
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", key))?,
            );
            let res = reqwest::Client::new()
                .get(format!("{}/admin/status", url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
