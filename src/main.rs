use anyhow::Result;
use bizcrawl::{
    config::Config, crawl::Crawler, fetcher::HttpPageSource, report::write_report,
};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const DEFAULT_CATEGORY: &str = "contractors";
const DEFAULT_LOCATION: &str = "San Francisco, CA";

/// Reads one line from stdin; blank input falls back to `default`.
fn prompt(label: &str, default: &str) -> io::Result<String> {
    print!("{label} [{default}]: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let value = line.trim();
    Ok(if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let category = prompt("Category", DEFAULT_CATEGORY)?;
    let location = prompt("Location", DEFAULT_LOCATION)?;

    let start = Instant::now();
    println!("Program started...");

    let results_file = config.results_file().to_string();
    let crawler = Crawler::new(config, Arc::new(HttpPageSource::new()))?;
    let report = crawler.crawl(&category, &location).await?;
    write_report(&report, &results_file).await?;

    println!("Results successfully saved to {results_file}");
    println!(
        "Program execution took: {:.2} seconds.",
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
