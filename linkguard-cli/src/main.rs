//! LinkGuard CLI
//!
//! Command-line interface for inspecting links, managing the lookup cache,
//! and running or talking to the inspection service.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use linkguard_api::{ApiClient, ApiConfig, ApiServer, AppState, SelectedLinkResponse};
use linkguard_core::types::{CacheStats, Link, PageSnapshot, RiskVerdict};
use linkguard_scanner::BatchVerdict;

/// LinkGuard - Link risk inspection
#[derive(Parser)]
#[command(name = "linkguard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print raw JSON instead of formatted output
    #[arg(long, global = true)]
    json: bool,

    /// Cache snapshot file
    #[arg(long, global = true, env = "LINKGUARD_CACHE_PATH", default_value = ".linkguard/cache.json")]
    cache: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect one or more URLs
    Inspect {
        /// URLs to inspect
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Inspect the links of a captured page (PageSnapshot JSON)
    Page {
        /// Snapshot file
        file: PathBuf,
        /// Inspect only the selected link
        #[arg(short, long)]
        selected: bool,
    },

    /// Show cache statistics
    Stats,

    /// Clear the lookup cache
    ClearCache {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "127.0.0.1")]
        bind: String,
    },

    /// Send an action to a running server
    Remote {
        /// Server base URL
        #[arg(short, long, env = "LINKGUARD_SERVER", default_value = "http://127.0.0.1:3001")]
        server: String,

        #[command(subcommand)]
        action: RemoteAction,
    },
}

#[derive(Subcommand)]
enum RemoteAction {
    /// Inspect the links of a captured page
    Inspect {
        /// Snapshot file
        file: PathBuf,
    },
    /// Inspect the selected link of a captured page
    Selected {
        /// Snapshot file
        file: PathBuf,
    },
    /// Show the server's cache statistics
    Stats,
    /// Clear the server's cache
    ClearCache,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "linkguard=debug,info"
    } else {
        "linkguard=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let json = cli.json;
    match cli.command {
        Commands::Inspect { urls } => cmd_inspect(&cli.cache, &urls, json).await,
        Commands::Page { file, selected } => cmd_page(&cli.cache, &file, selected, json).await,
        Commands::Stats => cmd_stats(&cli.cache, json).await,
        Commands::ClearCache { yes } => cmd_clear_cache(&cli.cache, yes).await,
        Commands::Serve { port, bind } => cmd_serve(&cli.cache, port, &bind).await,
        Commands::Remote { server, action } => cmd_remote(&server, action, json).await,
    }
}

/// Builds local inspection state backed by the snapshot file.
async fn local_state(cache_path: &Path) -> Result<AppState> {
    let config = ApiConfig {
        cache_path: Some(cache_path.to_path_buf()),
        ..ApiConfig::from_env()
    };
    AppState::initialize(config)
        .await
        .context("Failed to initialize inspection state")
}

fn spinner(message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Page file contents: a full snapshot or a bare list of links.
#[derive(Deserialize)]
#[serde(untagged)]
enum PageFile {
    Links(Vec<Link>),
    Snapshot(PageSnapshot),
}

fn load_page(path: &Path) -> Result<PageSnapshot> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open page snapshot {}", path.display()))?;
    let page: PageFile = serde_json::from_reader(file).context("Invalid page snapshot JSON")?;
    Ok(match page {
        PageFile::Links(links) => PageSnapshot::new(links),
        PageFile::Snapshot(snapshot) => snapshot,
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_verdict(verdict: &RiskVerdict) {
    if verdict.safe {
        println!("{}", verdict.message.green());
    } else {
        println!("{}", verdict.message.yellow());
    }
    if let Some(status) = verdict.cache_status() {
        println!("   {} {}", "Result:".dimmed(), status);
    }
}

fn print_batch(verdict: &BatchVerdict) {
    println!("{}", verdict.message);
    let Some(details) = &verdict.details else {
        return;
    };
    let summary = format!(
        "{} of {} links flagged",
        details.unsafe_links, details.total_links
    );
    if verdict.safe {
        println!("{}", summary.green().bold());
    } else {
        println!("{}", summary.red().bold());
    }
}

fn print_selected(response: &SelectedLinkResponse) {
    if response.safe {
        println!("{}", response.message.green());
    } else {
        println!("{}", response.message.yellow());
    }
}

/// Formats epoch milliseconds as a local date and time.
fn format_timestamp(millis: u64) -> String {
    i64::try_from(millis)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn print_stats(stats: &CacheStats) {
    println!("{}", "📦 Cache statistics:".cyan().bold());
    println!(
        "   {} {} / {} ({:.1}%)",
        "Entries:".dimmed(),
        stats.total_entries,
        stats.max_entries,
        stats.usage_percent()
    );
    println!("   {} {}", "Expired:".dimmed(), stats.expired_entries);
    match (stats.oldest_entry, stats.newest_entry) {
        (Some(oldest), Some(newest)) => {
            println!("   {} {}", "Oldest:".dimmed(), format_timestamp(oldest));
            println!("   {} {}", "Newest:".dimmed(), format_timestamp(newest));
        }
        _ => println!("   {}", "Cache is empty.".dimmed()),
    }
}

/// Inspect URLs locally
async fn cmd_inspect(cache_path: &Path, urls: &[String], json: bool) -> Result<()> {
    let state = local_state(cache_path).await?;
    let analyzer = state.router.analyzer();

    for url in urls {
        let pb = spinner(&format!("Inspecting {}", url))?;
        let verdict = analyzer.analyze(url).await;
        pb.finish_and_clear();

        if json {
            print_json(&verdict)?;
        } else {
            println!("{} {}", "🔍".cyan(), url.bold());
            print_verdict(&verdict);
            println!();
        }
    }

    Ok(())
}

/// Inspect a captured page locally
async fn cmd_page(cache_path: &Path, file: &Path, selected: bool, json: bool) -> Result<()> {
    let page = load_page(file)?;
    let state = local_state(cache_path).await?;

    let pb = spinner("Inspecting page links")?;
    if selected {
        let response = state.router.inspect_selected_link(&page).await;
        pb.finish_and_clear();
        if json {
            print_json(&response)?;
        } else {
            print_selected(&response);
        }
    } else {
        let verdict = state.router.inspect_all_links(&page).await;
        pb.finish_and_clear();
        if json {
            print_json(&verdict)?;
        } else {
            print_batch(&verdict);
        }
    }

    Ok(())
}

/// Show local cache statistics
async fn cmd_stats(cache_path: &Path, json: bool) -> Result<()> {
    let state = local_state(cache_path).await?;
    let response = state.router.cache_stats();

    if json {
        print_json(&response)?;
    } else {
        print_stats(&response.stats);
    }
    Ok(())
}

/// Clear the local cache
async fn cmd_clear_cache(cache_path: &Path, yes: bool) -> Result<()> {
    let state = local_state(cache_path).await?;
    let entries = state.router.analyzer().cache().len();

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Clear {} cached lookup(s)?", entries))
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;
        if !confirmed {
            println!("{}", "Aborted.".yellow());
            return Ok(());
        }
    }

    let response = state.router.clear_cache().await;
    println!("{} {}", "✅".green(), response.message);
    Ok(())
}

/// Run API server
async fn cmd_serve(cache_path: &Path, port: u16, bind: &str) -> Result<()> {
    println!("{}", "🚀 Starting LinkGuard API server...".cyan().bold());

    let state = local_state(cache_path).await?;
    if !state.config.lookup_enabled() {
        println!(
            "   {}",
            "SAFE_BROWSING_API_KEY not set: verdicts use local signals only.".yellow()
        );
    }

    println!("   {} http://{}:{}", "Listening on:".green(), bind, port);
    println!("   {} http://{}:{}/health", "Health check:".dimmed(), bind, port);
    println!("\n   Press Ctrl+C to stop.\n");

    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .context("Invalid bind address")?;
    ApiServer::new(state).run(addr).await?;

    Ok(())
}

/// Send an action to a running server
async fn cmd_remote(server: &str, action: RemoteAction, json: bool) -> Result<()> {
    let client = ApiClient::new(server)?;

    match action {
        RemoteAction::Inspect { file } => {
            let page = load_page(&file)?;
            let pb = spinner("Waiting for the inspection service")?;
            let verdict = client.inspect_all_links(page).await;
            pb.finish_and_clear();
            let verdict = verdict?;
            if json {
                print_json(&verdict)?;
            } else {
                print_batch(&verdict);
            }
        }
        RemoteAction::Selected { file } => {
            let page = load_page(&file)?;
            let response = client.inspect_selected_link(page).await?;
            if json {
                print_json(&response)?;
            } else {
                print_selected(&response);
            }
        }
        RemoteAction::Stats => {
            let response = client.cache_stats().await?;
            if json {
                print_json(&response)?;
            } else {
                print_stats(&response.stats);
            }
        }
        RemoteAction::ClearCache => {
            let response = client.clear_cache().await?;
            println!("{} {}", "✅".green(), response.message);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_remote_action() {
        let cli = Cli::try_parse_from([
            "linkguard",
            "remote",
            "--server",
            "http://localhost:9000",
            "stats",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Remote {
                action: RemoteAction::Stats,
                ..
            }
        ));
    }

    #[test]
    fn test_load_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");
        std::fs::write(
            &path,
            r#"{"links":[{"href":"http://bit.ly/abc","text":"short"}],"selected":{"href":"https://example.com/"}}"#,
        )
        .unwrap();

        let page = load_page(&path).unwrap();
        assert_eq!(page.links.len(), 1);
        assert_eq!(page.selected.unwrap().href, "https://example.com/");
    }

    #[test]
    fn test_load_page_accepts_bare_link_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.json");
        std::fs::write(&path, r#"[{"href":"https://a.example/"},{"href":"https://b.example/"}]"#).unwrap();

        let page = load_page(&path).unwrap();
        assert_eq!(page.links.len(), 2);
        assert!(page.selected.is_none());
    }

    #[test]
    fn test_format_timestamp_uses_local_time() {
        let millis = 1_700_000_000_000u64;
        let expected = DateTime::<Utc>::from_timestamp_millis(millis as i64)
            .unwrap()
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        assert_eq!(format_timestamp(millis), expected);
        assert_eq!(format_timestamp(u64::MAX), u64::MAX.to_string());
    }

    #[test]
    fn test_load_page_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(load_page(&path).is_err());
    }
}
