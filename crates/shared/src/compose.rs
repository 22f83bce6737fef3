use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result};
use image::{imageops, DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::Path;

use crate::fonts::FontSet;
use crate::models::Item;

/// Layout of a Story canvas. All distances are pixels; the defaults
/// produce the standard 1080x1920 Instagram Story.
#[derive(Debug, Clone)]
pub struct StoryLayout {
    pub width: u32,
    pub height: u32,
    /// Left/right margin shared by every text block.
    pub margin: u32,
    pub blur_sigma: f32,
    /// Alpha of the full-canvas darkening layer.
    pub overlay_alpha: u8,
    pub title_size: f32,
    pub title_top: i32,
    pub title_line_gap: i32,
    /// Gap between the title and subtitle blocks.
    pub block_gap: i32,
    pub subtitle_size: f32,
    pub subtitle_line_gap: i32,
    pub impact_size: f32,
    pub impact_bar_height: u32,
    /// Distance from the bottom edge to the bottom of the impact bar.
    pub impact_bar_bottom_offset: u32,
    pub impact_bar_alpha: u8,
    pub impact_top_inset: i32,
    pub impact_line_gap: i32,
    pub footer_size: f32,
    pub footer_bottom_offset: i32,
    pub footer_max_chars: usize,
    /// Lines kept per text block; overflow is dropped silently.
    pub max_lines: usize,
}

impl Default for StoryLayout {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            margin: 70,
            blur_sigma: 2.0,
            overlay_alpha: 140,
            title_size: 64.0,
            title_top: 140,
            title_line_gap: 10,
            block_gap: 20,
            subtitle_size: 42.0,
            subtitle_line_gap: 8,
            impact_size: 48.0,
            impact_bar_height: 220,
            impact_bar_bottom_offset: 170,
            impact_bar_alpha: 170,
            impact_top_inset: 40,
            impact_line_gap: 10,
            footer_size: 28.0,
            footer_bottom_offset: 70,
            footer_max_chars: 60,
            max_lines: 3,
        }
    }
}

/// Scale so the image fully covers `w x h` (uniform, preserving aspect
/// ratio), then center-crop to exactly that box. The output is always
/// exactly `w x h` regardless of the source dimensions.
pub fn fit_cover(img: &DynamicImage, w: u32, h: u32) -> RgbaImage {
    let (iw, ih) = (img.width(), img.height());
    let scale = (w as f64 / iw as f64).max(h as f64 / ih as f64);
    // Round up to the target so the crop never runs short.
    let nw = ((iw as f64 * scale).round() as u32).max(w);
    let nh = ((ih as f64 * scale).round() as u32).max(h);
    let resized = img.resize_exact(nw, nh, imageops::FilterType::Lanczos3);
    let left = (nw - w) / 2;
    let top = (nh - h) / 2;
    resized.crop_imm(left, top, w, h).to_rgba8()
}

/// Greedy word wrap: each line takes words (space-joined) while the
/// rendered width stays within `max_width`; a word that would overflow
/// closes the line and starts the next. Single pass, no rebalancing. A
/// word wider than `max_width` on its own gets an overflowing line.
pub fn wrap_text<F>(text: &str, max_width: u32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> u32,
{
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let test = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if measure(&test) <= max_width {
            current = test;
        } else {
            if !current.is_empty() {
                lines.push(current);
            }
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wrap and keep at most `max_lines` lines; overflow beyond that is
/// dropped silently, with no ellipsis.
pub fn wrap_clamped<F>(text: &str, max_width: u32, max_lines: usize, measure: F) -> Vec<String>
where
    F: Fn(&str) -> u32,
{
    let mut lines = wrap_text(text, max_width, measure);
    lines.truncate(max_lines);
    lines
}

/// Footer label: URL with the scheme prefix stripped, truncated.
pub fn footer_text(url: &str, max_chars: usize) -> String {
    let stripped = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    stripped.chars().take(max_chars).collect()
}

#[allow(clippy::too_many_arguments)]
fn draw_block(
    canvas: &mut RgbaImage,
    text: &str,
    font: &FontVec,
    size: f32,
    color: Rgba<u8>,
    x: i32,
    mut y: i32,
    line_gap: i32,
    max_width: u32,
    max_lines: usize,
) -> i32 {
    let scale = PxScale::from(size);
    let lines = wrap_clamped(text, max_width, max_lines, |s| text_size(scale, font, s).0);
    for line in &lines {
        draw_text_mut(canvas, color, x, y, scale, font, line);
        y += size as i32 + line_gap;
    }
    y
}

/// Compose one Story canvas: cover-fitted screenshot, blur + darkening
/// layer, then the wrapped title/subtitle/impact blocks and the footer.
pub fn compose_canvas(
    shot: &DynamicImage,
    item: &Item,
    layout: &StoryLayout,
    fonts: &FontSet,
) -> RgbaImage {
    let (w, h) = (layout.width, layout.height);

    let bg = fit_cover(shot, w, h);
    let mut canvas = imageops::blur(&bg, layout.blur_sigma);

    // Darkening layer so text stays readable over any page content.
    let overlay = RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, layout.overlay_alpha]));
    imageops::overlay(&mut canvas, &overlay, 0, 0);

    let max_width = w - 2 * layout.margin;
    let x = layout.margin as i32;

    let mut y = draw_block(
        &mut canvas,
        item.title.trim(),
        &fonts.bold,
        layout.title_size,
        Rgba([255, 255, 255, 255]),
        x,
        layout.title_top,
        layout.title_line_gap,
        max_width,
        layout.max_lines,
    );

    y += layout.block_gap;
    let subtitle = item.subtitle.trim();
    if !subtitle.is_empty() {
        draw_block(
            &mut canvas,
            subtitle,
            &fonts.regular,
            layout.subtitle_size,
            Rgba([230, 230, 230, 255]),
            x,
            y,
            layout.subtitle_line_gap,
            max_width,
            layout.max_lines,
        );
    }

    let impact = item.impact.trim();
    if !impact.is_empty() {
        let bar_y = (h - layout.impact_bar_height - layout.impact_bar_bottom_offset) as i64;
        let bar = RgbaImage::from_pixel(
            w,
            layout.impact_bar_height,
            Rgba([0, 0, 0, layout.impact_bar_alpha]),
        );
        imageops::overlay(&mut canvas, &bar, 0, bar_y);
        draw_block(
            &mut canvas,
            impact,
            &fonts.bold,
            layout.impact_size,
            Rgba([255, 255, 255, 255]),
            x,
            bar_y as i32 + layout.impact_top_inset,
            layout.impact_line_gap,
            max_width,
            layout.max_lines,
        );
    }

    let footer = footer_text(&item.url, layout.footer_max_chars);
    draw_text_mut(
        &mut canvas,
        Rgba([200, 200, 200, 255]),
        x,
        h as i32 - layout.footer_bottom_offset,
        PxScale::from(layout.footer_size),
        &fonts.regular,
        &footer,
    );

    canvas
}

/// Render one item to `out_path`: load its screenshot, compose the
/// canvas, flatten to opaque RGB and encode as PNG.
pub fn render_story(
    item: &Item,
    layout: &StoryLayout,
    fonts: &FontSet,
    out_path: &Path,
) -> Result<()> {
    let shot_path = item
        .screenshot
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("Item \"{}\" has no screenshot path", item.title))?;

    if !shot_path.exists() {
        anyhow::bail!("Screenshot not found: {}", shot_path.display());
    }

    let shot = image::open(shot_path)
        .with_context(|| format!("Failed to open screenshot {}", shot_path.display()))?;

    let canvas = compose_canvas(&shot, item, layout, fonts);

    DynamicImage::ImageRgba8(canvas)
        .to_rgb8()
        .save(out_path)
        .with_context(|| format!("Failed to write {}", out_path.display()))?;

    Ok(())
}
