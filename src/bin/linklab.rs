//! Command line front end for the LinkLab client.
//!
//! Resolves links against the configured LinkLab API and prints what a host
//! app's listener would receive.
//!
//! # Usage
//!
//! ```bash
//! # Classify a URI and resolve it if it is a LinkLab link
//! cargo run --bin linklab -- open https://linklab.cc/abcd1234
//!
//! # Resolve any URI (foreign links come back unrecognized)
//! cargo run --bin linklab -- resolve "https://go.example.com/promo?utm_source=mail"
//!
//! # Run install attribution for a raw base64 install referrer
//! cargo run --bin linklab -- referrer bGlua2xhYl9pZD14eXomZG9tYWluPWxpbmtsYWIuY2M=
//! ```
//!
//! # Environment Variables
//!
//! See [`linklab::config`]. A `.env` file in the working directory is loaded
//! first.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use linklab::config::load_from_env;
use linklab::infrastructure::referrer::StaticReferrerProvider;
use linklab::infrastructure::settings::MemorySettings;
use linklab::prelude::*;
use linklab::telemetry::init_tracing;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Resolve LinkLab dynamic links from the command line.
#[derive(Parser)]
#[command(name = "linklab")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Override the LinkLab API base URL
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    /// Additional custom link domain (repeatable)
    #[arg(short, long = "domain", global = true)]
    domains: Vec<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a URI the way an app does on launch
    Open {
        uri: String,

        /// Seconds to wait for the listener callback
        #[arg(long, default_value_t = 15)]
        wait: u64,
    },

    /// Resolve a URI, falling back to an unrecognized link
    Resolve { uri: String },

    /// Attribute an install from a base64 install referrer
    Referrer { payload: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = load_from_env().context("Failed to load configuration")?;
    if let Some(url) = cli.api_base_url {
        config = config.with_api_base_url(url);
    }
    if !cli.domains.is_empty() {
        let mut domains = config.custom_domains.clone();
        domains.extend(cli.domains);
        config = config.with_custom_domains(domains);
    }
    init_tracing(&config);
    config.print_summary();

    match cli.command {
        Commands::Open { uri, wait } => open(config, &uri, wait, cli.json).await,
        Commands::Resolve { uri } => resolve(config, &uri, cli.json).await,
        Commands::Referrer { payload } => referrer(config, payload, cli.json).await,
    }
}

async fn open(config: Config, uri: &str, wait_secs: u64, json: bool) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let linklab = LinkLab::builder(config)
        .listener(Arc::new(move |result: &LinkResult| {
            let _ = tx.send(result.clone());
        }))
        .build()?;

    let is_service_link = linklab.resolver().matcher().belongs_to_service(uri);
    linklab.classify_and_dispatch(Some(uri));

    if is_service_link {
        println!("{}", "LinkLab link, resolving...".bright_blue());
    } else {
        println!("{}", "Not a LinkLab link, delivered as unrecognized".yellow());
    }
    let result = tokio::time::timeout(Duration::from_secs(wait_secs), rx.recv())
        .await
        .context("Timed out waiting for the link result")?
        .context("Dispatcher stopped before delivering a result")?;

    print_result(&result, json)
}

async fn resolve(config: Config, uri: &str, json: bool) -> Result<()> {
    let linklab = LinkLab::builder(config).build()?;

    match linklab.resolve(uri).wait().await {
        Some(result) => print_result(&result, json),
        None => {
            println!("{}", "No result delivered".yellow());
            Ok(())
        }
    }
}

async fn referrer(config: Config, payload: String, json: bool) -> Result<()> {
    let linklab = LinkLab::builder(config)
        .settings(Arc::new(MemorySettings::new()))
        .referrer_provider(Arc::new(StaticReferrerProvider::new(payload)))
        .build()?;

    match linklab.wait_for_attribution().await {
        Some(result) => print_result(&result, json),
        None => {
            println!("{}", "Install not attributed to a LinkLab link".yellow());
            Ok(())
        }
    }
}

fn print_result(result: &LinkResult, json: bool) -> Result<()> {
    match result {
        LinkResult::Resolved(link) if json => {
            println!("{}", serde_json::to_string_pretty(link)?);
        }
        LinkResult::Resolved(link) => print_link(link),
        LinkResult::Failed(e) => {
            println!("{} {}", "Failed:".red().bold(), e);
        }
    }
    Ok(())
}

fn print_link(link: &LinkData) {
    if link.is_unrecognized() {
        println!("{}", "Unrecognized link".yellow().bold());
    } else {
        println!("{}", "Resolved link".green().bold());
    }
    println!();
    println!("  {:<14} {}", "Full link".bright_white(), link.full_link().cyan());
    println!("  {:<14} {}", "Domain type".bright_white(), link.domain_type());
    if let Some(id) = link.id() {
        println!("  {:<14} {}", "ID".bright_white(), id);
    }
    if let Some(domain) = link.domain() {
        println!("  {:<14} {}", "Domain".bright_white(), domain);
    }
    if let Some(package) = link.package_name() {
        println!("  {:<14} {}", "Package".bright_white(), package);
    }
    if let Some(bundle) = link.bundle_id() {
        println!("  {:<14} {}", "Bundle ID".bright_white(), bundle);
    }
    if let Some(store) = link.app_store_id() {
        println!("  {:<14} {}", "App Store ID".bright_white(), store);
    }
    if let Some(params) = link.parameters() {
        println!("  {}", "Parameters".bright_white());
        for (key, value) in params {
            println!("    {} = {}", key.bright_cyan(), value);
        }
    }
    println!();
}
