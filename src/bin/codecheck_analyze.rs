//! Command-line front end for the analysis action.
//!
//! Sends text to the deployment configured by `SITE_URL` and prints the JSON envelope. Exits
//! with status 1 when the envelope carries an error.
use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use anyhow::{Context, Result, bail};
use clap::Parser;
use codecheck::{action::AnalysisAction, config::ActionConfig, logging};

#[derive(Parser)]
#[command(
    name = "codecheck-analyze",
    about = "Send a document or question to the code-check analysis route"
)]
struct Cli {
    /// Text to analyze; read from stdin when neither this nor --file is given.
    text: Option<String>,
    /// Read the text to analyze from a file.
    #[arg(long, conflicts_with = "text")]
    file: Option<PathBuf>,
    /// Override the deployment base URL (defaults to SITE_URL).
    #[arg(long)]
    site_url: Option<String>,
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(2);
        }
    }
}

async fn run() -> Result<bool> {
    dotenvy::dotenv().ok();
    logging::init_cli_tracing();
    let cli = Cli::parse();

    let config = match cli.site_url {
        Some(site_url) => ActionConfig {
            site_url,
            timeout: None,
        },
        None => ActionConfig::from_env().context("failed to load action configuration")?,
    };
    let text = read_input(cli.text, cli.file.as_deref())?;

    let action = AnalysisAction::new(&config).context("invalid SITE_URL")?;
    let response = action.analyze_document(&text).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(!response.is_error())
}

fn read_input(text: Option<String>, file: Option<&std::path::Path>) -> Result<String> {
    let input = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };
    if input.trim().is_empty() {
        bail!("no text to analyze");
    }
    Ok(input)
}
