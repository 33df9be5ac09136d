use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trendlens::config::EngineConfig;
use trendlens::engine::{EngineOptions, TrendEngine};
use trendlens::models::{Query, SearchProperty};
use trendlens::provider::{Pacer, TrendsClient, TrendsProvider};

#[derive(Parser)]
#[command(
    name = "trendlens",
    version,
    about = "Search-trend aggregation with interest-over-time, related and regional analysis",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (TOML); environment variables otherwise
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate trend data for one or more keywords
    Analyze {
        /// Keywords to analyze (up to 5 distinct are used)
        #[arg(required = true)]
        keywords: Vec<String>,

        /// Analysis timeframe token
        #[arg(short, long, default_value = "today 12-m")]
        timeframe: String,

        /// Region code (e.g. US, GB; empty for worldwide)
        #[arg(short, long)]
        geo: Option<String>,

        /// Provider category ID (0 for all categories)
        #[arg(long, default_value = "0")]
        category: u32,

        /// Search property (web, images, news, youtube, shopping)
        #[arg(short, long, default_value = "web")]
        property: String,

        /// Skip related topics and queries
        #[arg(long, default_value = "false")]
        no_related: bool,

        /// Skip regional interest breakdown
        #[arg(long, default_value = "false")]
        no_regional: bool,

        /// Skip trending-now lookup
        #[arg(long, default_value = "false")]
        no_trending: bool,

        /// Write the JSON report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List currently trending searches for a region
    Trending {
        /// Region code
        #[arg(short, long, default_value = "US")]
        region: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(&cli.log_format, cli.verbose)?;

    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::from_env()?,
    };
    config.validate().context("Invalid configuration")?;

    let pacer = Arc::new(Pacer::new(config.provider.min_call_interval()));
    let client = TrendsClient::new(&config.provider, pacer)
        .context("Failed to create provider client")?;

    match cli.command {
        Commands::Analyze {
            keywords,
            timeframe,
            geo,
            category,
            property,
            no_related,
            no_regional,
            no_trending,
            output,
        } => {
            let property = SearchProperty::parse(&property)
                .with_context(|| format!("Unknown search property: {property}"))?;

            let mut query = Query::new(keywords)?
                .with_timeframe(timeframe)
                .with_category(category)
                .with_property(property);
            if let Some(geo) = geo {
                query = query.with_geo(geo);
            }

            let options = EngineOptions {
                include_related: !no_related,
                include_regional: !no_regional,
                include_trending: !no_trending,
                trending_region: query.geo.clone().unwrap_or_else(|| String::from("US")),
            };

            let engine = TrendEngine::new(Arc::new(client), &config);
            let report = engine.aggregate_with(&query, &options).await?;
            let json = serde_json::to_string_pretty(&report)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::info!(path = %path.display(), "Report written");
                }
                None => println!("{json}"),
            }
        }

        Commands::Trending { region } => {
            let searches = client.trending_now(&region).await?;
            if searches.is_empty() {
                println!("No trending data for region {region}");
            } else {
                for (i, term) in searches.iter().enumerate() {
                    println!("{:2}. {term}", i + 1);
                }
            }
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("trendlens=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("trendlens=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
