use anyhow::{Context, Result};
use clap::Parser;
use shared::{load_items, render_story, story_filename, FontSet, StoryLayout};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "make-story")]
#[command(about = "Compose Instagram Stories (1080x1920) from screenshots plus copy")]
struct Args {
    /// Items JSON with title, url, subtitle, impact and screenshot path
    #[arg(long = "in")]
    input: PathBuf,

    /// Directory for the finished story_NN.png files
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let items = load_items(&args.input)?;
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;

    let layout = StoryLayout::default();
    let fonts = FontSet::load_system()?;

    for (i, item) in items.iter().enumerate() {
        let out_path = args.out_dir.join(story_filename(i + 1));
        render_story(item, &layout, &fonts, &out_path)?;
        println!("WROTE {}", out_path.display());
    }

    Ok(())
}
