use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use tracing::info;

use ng_core::{Error, Result, RunSummary};
use ng_pipeline::{FetchPipeline, PipelineConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch article pages and extract normalized records", long_about = None)]
struct Cli {
    /// Target article URLs, processed in the order given.
    urls: Vec<String>,

    /// File with one URL per line; blank lines and `#` comments are skipped.
    #[arg(long)]
    urls_file: Option<PathBuf>,

    /// Politeness pause between fetches, in seconds.
    #[arg(long, default_value_t = 1)]
    delay: u64,

    /// Per-request timeout, in seconds.
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    #[arg(long, default_value = "memory")]
    storage: String,
}

fn read_url_file(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn print_summary(summary: &RunSummary) {
    println!("Scraping finished!");
    println!("   - total:      {}", summary.total);
    println!("   - successful: {}", summary.successful);
    println!("   - failed:     {}", summary.failed);
    println!("   - skipped:    {}", summary.skipped);

    if !summary.articles.is_empty() {
        println!("\nScraped articles:");
        for article in &summary.articles {
            println!(
                "   - {} | {} | {}",
                article.url,
                article.title,
                article.published_at.format("%d.%m.%Y %H:%M:%S")
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let mut urls = cli.urls.clone();
    if let Some(path) = &cli.urls_file {
        urls.extend(read_url_file(path)?);
    }
    if urls.is_empty() {
        return Err(Error::InvalidUrl(
            "no target URLs given (pass URLs or --urls-file)".to_string(),
        ));
    }

    let store = ng_storage::create_store(&cli.storage)?;
    info!("Storage backend initialized (using {})", cli.storage);

    let config = PipelineConfig {
        request_timeout: Duration::from_secs(cli.timeout),
        request_delay: Duration::from_secs(cli.delay),
    };
    let pipeline = FetchPipeline::new(store, config)?;

    let summary = pipeline.run(&urls).await;
    print_summary(&summary);

    Ok(())
}
