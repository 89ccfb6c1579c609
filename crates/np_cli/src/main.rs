use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use np_core::{ArticleStore, Error, Result};
use np_ingest::providers::{http_client, NewsApiClient, OpenCageClient};
use np_ingest::{
    run_global_cycle, run_local_cycle, run_retention_sweep, IngestorConfig, NewsIngestor,
    RefreshGate, DEFAULT_TTL,
};
use np_storage::{MemoryStore, SqliteStore};
use np_web::AppState;
use tracing::{error, info};

const DEFAULT_RETENTION_DAYS: i64 = 14;

#[derive(Debug, Clone)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_unit = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if let Ok(num) = current_number.parse::<u64>() {
                match c {
                    's' => total_seconds += num,
                    'm' => total_seconds += num * 60,
                    'h' => total_seconds += num * 3600,
                    'd' => total_seconds += num * 86400,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                }
                current_number.clear();
                has_unit = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // A bare number is taken as seconds
        if !current_number.is_empty() {
            match current_number.parse::<u64>() {
                Ok(num) => {
                    total_seconds += num;
                    has_unit = true;
                }
                Err(_) => return Err("Invalid number in duration".to_string()),
            }
        }

        if !has_unit {
            return Err("Duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser)]
#[command(name = "np", about = "Headline ingestion, enrichment and serving")]
struct Cli {
    /// SQLite database file; in-memory stores when omitted
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Bind address, NEWS_BIND_ADDR when omitted
        #[arg(long)]
        addr: Option<SocketAddr>,
    },
    /// Run one global ingest cycle, plus a local cycle when coordinates are given
    Fetch {
        #[arg(long, requires = "lon")]
        lat: Option<f64>,
        #[arg(long, requires = "lat")]
        lon: Option<f64>,
    },
    /// Re-run the sentiment pass over everything stored
    Classify,
    /// Delete records older than the retention threshold
    Prune {
        /// Age threshold in days, NEWS_RETENTION_DAYS or 14 when omitted
        #[arg(long)]
        days: Option<i64>,
    },
    /// Fetch on an interval and prune once a day
    Watch {
        #[arg(long, default_value = "6h")]
        every: HumanDuration,
    },
}

async fn open_stores(
    db: Option<PathBuf>,
) -> Result<(Arc<dyn ArticleStore>, Arc<dyn ArticleStore>)> {
    let db = db.or_else(|| env::var("NEWS_DB_PATH").ok().map(PathBuf::from));
    match db {
        Some(path) => {
            info!(path = %path.display(), "using sqlite stores");
            let pool = SqliteStore::connect(&path).await?;
            Ok((
                Arc::new(SqliteStore::global(pool.clone())),
                Arc::new(SqliteStore::local(pool)),
            ))
        }
        None => {
            info!("using in-memory stores");
            Ok((Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new())))
        }
    }
}

fn build_ingestor(
    global: Arc<dyn ArticleStore>,
    local: Arc<dyn ArticleStore>,
) -> Result<NewsIngestor> {
    let news_key = env::var("NEWSAPI_KEY")
        .map_err(|_| Error::InvalidInput("NEWSAPI_KEY must be set".to_string()))?;
    // Without a geocoding key every local sweep degrades to the literal
    // fallback query, which is still a working pipeline
    let geo_key = env::var("OPENCAGE_API_KEY").unwrap_or_default();

    let client = http_client()?;
    let news = Arc::new(NewsApiClient::new(client.clone(), news_key));
    let geo = Arc::new(OpenCageClient::new(client, geo_key));
    let gate = Arc::new(RefreshGate::new(DEFAULT_TTL));

    Ok(NewsIngestor::new(
        news,
        geo,
        gate,
        global,
        local,
        IngestorConfig::default(),
    ))
}

fn retention_days(flag: Option<i64>) -> i64 {
    flag.or_else(|| {
        env::var("NEWS_RETENTION_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
    })
    .unwrap_or(DEFAULT_RETENTION_DAYS)
}

fn report_cycle(label: &str, report: &np_ingest::CycleReport) {
    if report.ingest.suppressed {
        println!("{}: still fresh, nothing fetched", label);
        return;
    }
    println!(
        "{}: {} fetched, {} new, {} skipped, {} categories failed, {} sentiment changes",
        label,
        report.ingest.fetched,
        report.ingest.inserted,
        report.ingest.skipped,
        report.ingest.failed_categories.len(),
        report.sentiment_changes
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let (global, local) = open_stores(cli.db).await?;

    match cli.command {
        Commands::Serve { addr } => {
            let addr = addr
                .or_else(|| env::var("NEWS_BIND_ADDR").ok().and_then(|v| v.parse().ok()))
                .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));

            let ingestor = build_ingestor(global.clone(), local.clone())?;
            let app = np_web::create_app(AppState {
                global_store: global,
                local_store: local,
                ingestor: Arc::new(ingestor),
            })
            .await;

            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!(%addr, "listening");
            axum::serve(listener, app).await?;
        }
        Commands::Fetch { lat, lon } => {
            let ingestor = build_ingestor(global, local)?;
            let report = run_global_cycle(&ingestor).await?;
            report_cycle("global", &report);

            if let (Some(lat), Some(lon)) = (lat, lon) {
                let report = run_local_cycle(&ingestor, lat, lon).await?;
                report_cycle("local", &report);
            }
        }
        Commands::Classify => {
            let changed = np_sentiment::classify_all(global.as_ref(), local.as_ref()).await?;
            println!("sentiment recomputed, {} records changed", changed);
        }
        Commands::Prune { days } => {
            let days = retention_days(days);
            let removed = run_retention_sweep(global.as_ref(), local.as_ref(), days).await?;
            println!("removed {} records older than {} days", removed, days);
        }
        Commands::Watch { every } => {
            let ingestor = build_ingestor(global.clone(), local.clone())?;
            let days = retention_days(None);

            let mut fetch_tick = tokio::time::interval(every.0);
            let mut prune_tick = tokio::time::interval(Duration::from_secs(24 * 60 * 60));
            info!(every = ?every.0, retention_days = days, "watch loop starting");

            loop {
                tokio::select! {
                    _ = fetch_tick.tick() => {
                        match run_global_cycle(&ingestor).await {
                            Ok(report) => report_cycle("global", &report),
                            Err(e) => error!(error = %e, "ingest cycle failed"),
                        }
                    }
                    _ = prune_tick.tick() => {
                        match run_retention_sweep(global.as_ref(), local.as_ref(), days).await {
                            Ok(removed) => info!(removed, "retention sweep done"),
                            Err(e) => error!(error = %e, "retention sweep failed"),
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_parse_with_units() {
        assert_eq!(HumanDuration::from_str("6h").unwrap().0, Duration::from_secs(6 * 3600));
        assert_eq!(HumanDuration::from_str("30m").unwrap().0, Duration::from_secs(1800));
        assert_eq!(
            HumanDuration::from_str("1d 2h").unwrap().0,
            Duration::from_secs(86400 + 7200)
        );
        assert_eq!(HumanDuration::from_str("45").unwrap().0, Duration::from_secs(45));
        assert!(HumanDuration::from_str("5x").is_err());
        assert!(HumanDuration::from_str("").is_err());
    }

    #[test]
    fn retention_default_applies() {
        assert_eq!(retention_days(Some(7)), 7);
    }
}
