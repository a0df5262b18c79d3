//! Command-line surface for the Relwarc analysis client.
//!
//! Thin wrapper: each subcommand maps to one client operation and writes
//! the opaque result JSON verbatim to stdout.

use clap::{Parser, Subcommand};
use log::debug;
use relwarc_client::config::{get_config_path, Config};
use relwarc_client::{AnalysisClient, DEFAULT_SERVER_ADDR};
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Command-line arguments
struct Args {
    /// Relwarc server address.
    #[arg(long, value_name = "ADDR")]
    server_addr: Option<String>,

    /// API token; falls back to the saved configuration.
    #[arg(long, value_name = "TOKEN")]
    api_token: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a JavaScript source code file
    AnalyzeSourceFile {
        /// Path to the JavaScript source file to analyze
        file_path: PathBuf,
    },
    /// Analyze the page at a URL
    AnalyzeUrl {
        /// URL of the page to analyze
        page_url: String,
    },
    /// Analyze a page captured as a TAR archive
    AnalyzeTar {
        /// Path to the TAR archive to analyze
        tar_path: PathBuf,
    },
    /// Save the API token (and server address, if given) for later runs
    Login {
        /// API token to save
        #[arg(long, value_name = "TOKEN")]
        api_token: String,
    },
    /// Remove the saved configuration
    Logout,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    match &args.command {
        Command::Login { api_token } => {
            let path = get_config_path()?;
            let server_addr = args.server_addr.clone().unwrap_or_default();
            Config::new(api_token.clone(), server_addr).save(&path)?;
            println!("Credentials saved to {}", path.display());
            return Ok(());
        }
        Command::Logout => {
            let path = get_config_path()?;
            Config::clear(&path)?;
            println!("Logged out");
            return Ok(());
        }
        _ => {}
    }

    let saved = get_config_path()
        .ok()
        .filter(|path| path.exists())
        .and_then(|path| Config::load_from_file(&path).ok());

    let api_token = args
        .api_token
        .or_else(|| {
            saved
                .as_ref()
                .map(|config| config.api_token.clone())
                .filter(|token| !token.is_empty())
        })
        .ok_or("no API token: pass --api-token or run the login command")?;

    let server_addr = args
        .server_addr
        .or_else(|| {
            saved
                .as_ref()
                .map(|config| config.server_addr.clone())
                .filter(|addr| !addr.is_empty())
        })
        .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
    debug!("using server {}", server_addr);

    let client = AnalysisClient::with_server(api_token, &server_addr)?;

    let result = match args.command {
        Command::AnalyzeSourceFile { file_path } => {
            let file = tokio::fs::File::open(&file_path).await?;
            client.analyze_source_code(file).await?
        }
        Command::AnalyzeUrl { page_url } => client.analyze_page_url(&page_url).await?,
        Command::AnalyzeTar { tar_path } => {
            let file = tokio::fs::File::open(&tar_path).await?;
            client.analyze_page_tar(file).await?
        }
        Command::Login { .. } | Command::Logout => unreachable!("handled above"),
    };

    println!("{}", result.get());
    Ok(())
}
