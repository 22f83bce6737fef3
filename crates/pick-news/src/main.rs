use anyhow::{Context, Result};
use clap::Parser;
use shared::{read_feed_list, FeedPicker};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pick-news")]
#[command(about = "Pick AI/tech news candidates from RSS feeds")]
struct Args {
    /// Feed list file: one URL per line, blank lines and # comments ignored
    #[arg(long)]
    feeds: PathBuf,

    /// Only keep entries published within the last N hours
    #[arg(long, default_value = "24")]
    hours: i64,

    /// Maximum number of candidates to emit
    #[arg(long, default_value = "15")]
    limit: usize,

    /// Write the JSON here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let feeds = read_feed_list(&args.feeds)?;
    if feeds.is_empty() {
        anyhow::bail!("Feed list {} contains no feed URLs.", args.feeds.display());
    }

    let picker = FeedPicker::new()?;
    let candidates = picker.pick(&feeds, args.hours, args.limit).await;

    let json =
        serde_json::to_string_pretty(&candidates).context("Failed to serialize candidates")?;

    match args.out {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "✓ Wrote {} candidate(s) to {}",
                candidates.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
