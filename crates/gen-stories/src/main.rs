use anyhow::{Context, Result};
use clap::Parser;
use shared::{
    load_items, render_story, shot_filename, story_filename, BrowserEngine, FontSet, Item,
    ShotCapturer, StoryLayout, VIEWPORT_H, VIEWPORT_W,
};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gen-stories")]
#[command(about = "Generate Instagram Stories (1080x1920) from a list of article URLs")]
struct Args {
    /// JSON file with title, url, subtitle, impact per item
    #[arg(long, default_value = "items.json")]
    items: PathBuf,

    /// Directory for page screenshots
    #[arg(long, default_value = "shots")]
    shots_dir: PathBuf,

    /// Directory for the finished Stories
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// Browser engine used for capture
    #[arg(long, value_enum, default_value_t = BrowserEngine::Chromium)]
    browser: BrowserEngine,

    /// Per-page navigation timeout in milliseconds
    #[arg(long, default_value = "30000")]
    timeout: u64,

    /// Reuse existing screenshots in --shots-dir instead of capturing
    #[arg(long)]
    skip_screenshots: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let items = load_items(&args.items)?;
    println!(
        "✓ Loaded {} item(s) from {}",
        items.len(),
        args.items.display()
    );

    fs::create_dir_all(&args.shots_dir)
        .with_context(|| format!("Failed to create {}", args.shots_dir.display()))?;
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;

    if args.skip_screenshots {
        println!(
            "✓ Reusing existing screenshots in {}",
            args.shots_dir.display()
        );
    } else {
        println!(
            "✓ Capturing {} screenshot(s) ({}, {}x{})",
            items.len(),
            args.browser,
            VIEWPORT_W,
            VIEWPORT_H
        );
        let capturer = ShotCapturer::launch(args.browser, args.timeout)?;
        for (i, item) in items.iter().enumerate() {
            let url = item.url.trim();
            if url.is_empty() {
                eprintln!("⚠ Item {} has no URL, skipping capture.", i + 1);
                continue;
            }
            let shot_path = args.shots_dir.join(shot_filename(i + 1));
            println!("  [{}/{}] {}", i + 1, items.len(), url);
            capturer.capture(url, &shot_path)?;
        }
    }

    // Every item needs its screenshot on disk before composing starts.
    let mut augmented = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        let shot_path = args.shots_dir.join(shot_filename(i + 1));
        if !shot_path.exists() {
            anyhow::bail!(
                "Screenshot missing: {}\nRun without --skip-screenshots or check {}.",
                shot_path.display(),
                args.shots_dir.display()
            );
        }
        augmented.push(Item {
            screenshot: Some(shot_path),
            ..item
        });
    }

    println!(
        "\n✓ Composing {} Story(ies) into {}",
        augmented.len(),
        args.out_dir.display()
    );
    let layout = StoryLayout::default();
    let fonts = FontSet::load_system()?;
    let mut written = Vec::new();
    for (i, item) in augmented.iter().enumerate() {
        let out_path = args.out_dir.join(story_filename(i + 1));
        render_story(item, &layout, &fonts, &out_path)?;
        written.push(out_path);
    }

    println!("\n✓ {} Story(ies) generated:", written.len());
    for path in &written {
        let size_kb = fs::metadata(path).map(|m| m.len() / 1024).unwrap_or(0);
        println!("   {}  ({} KB)", path.display(), size_kb);
    }

    Ok(())
}
