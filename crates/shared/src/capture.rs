use anyhow::{Context, Result};
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Story viewport: portrait 1080x1920, captured without scrolling.
pub const VIEWPORT_W: u32 = 1080;
pub const VIEWPORT_H: u32 = 1920;

const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 12; Pixel 6) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";

/// Time given to late-rendering content after navigation settles.
const SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Which Chromium-family binary to drive. The choice selects the
/// executable to look for on PATH; `Chromium` also falls back to the
/// browser auto-detection of the CDP backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BrowserEngine {
    Chromium,
    Chrome,
    Edge,
}

impl BrowserEngine {
    fn executable_names(&self) -> &'static [&'static str] {
        match self {
            BrowserEngine::Chromium => &["chromium", "chromium-browser"],
            BrowserEngine::Chrome => &["google-chrome", "google-chrome-stable", "chrome"],
            BrowserEngine::Edge => &["microsoft-edge", "microsoft-edge-stable"],
        }
    }

    /// Locate the engine's executable on PATH.
    pub fn locate(&self) -> Option<PathBuf> {
        let path_var = std::env::var_os("PATH")?;
        for dir in std::env::split_paths(&path_var) {
            for name in self.executable_names() {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
        None
    }
}

impl fmt::Display for BrowserEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BrowserEngine::Chromium => "chromium",
            BrowserEngine::Chrome => "chrome",
            BrowserEngine::Edge => "edge",
        };
        f.write_str(name)
    }
}

/// Captures above-the-fold screenshots of article pages.
///
/// One browser instance is launched per run and reused for every item;
/// each capture gets a fresh tab.
pub struct ShotCapturer {
    browser: Browser,
    timeout: Duration,
}

impl ShotCapturer {
    pub fn launch(engine: BrowserEngine, timeout_ms: u64) -> Result<Self> {
        let mut builder = LaunchOptions::default_builder();
        builder
            .headless(true)
            .window_size(Some((VIEWPORT_W, VIEWPORT_H)));

        match engine.locate() {
            Some(path) => {
                builder.path(Some(path));
            }
            None if engine == BrowserEngine::Chromium => {
                // Let the CDP backend find an installed browser itself.
            }
            None => anyhow::bail!("No {} executable found on PATH", engine),
        }

        let launch_options = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build launch options: {}", e))?;

        let browser = Browser::new(launch_options).context("Failed to launch browser")?;

        Ok(Self {
            browser,
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    /// Navigate to `url` and write a PNG of the visible viewport to
    /// `out_path`. A navigation failure is a warning, not an error: the
    /// screenshot is still taken of whatever state the page reached.
    pub fn capture(&self, url: &str, out_path: &Path) -> Result<()> {
        let tab = self
            .browser
            .new_tab()
            .context("Failed to open browser tab")?;
        tab.set_default_timeout(self.timeout);
        tab.set_user_agent(MOBILE_USER_AGENT, None, None)
            .context("Failed to set user agent")?;

        if let Err(e) = tab
            .navigate_to(url)
            .and_then(|t| t.wait_until_navigated())
        {
            eprintln!("⚠ Error loading {}: {}", url, e);
        }

        std::thread::sleep(SETTLE_DELAY);

        let clip = Page::Viewport {
            x: 0.0,
            y: 0.0,
            width: VIEWPORT_W as f64,
            height: VIEWPORT_H as f64,
            scale: 1.0,
        };
        let png = tab
            .capture_screenshot(
                Page::CaptureScreenshotFormatOption::Png,
                None,
                Some(clip),
                true,
            )
            .context("Screenshot failed")?;

        std::fs::write(out_path, png)
            .with_context(|| format!("Failed to write {}", out_path.display()))?;

        let _ = tab.close(true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_names_lowercase() {
        assert_eq!(BrowserEngine::Chromium.to_string(), "chromium");
        assert_eq!(BrowserEngine::Chrome.to_string(), "chrome");
        assert_eq!(BrowserEngine::Edge.to_string(), "edge");
    }

    #[test]
    fn test_capture_blank_page() {
        let capturer = match ShotCapturer::launch(BrowserEngine::Chromium, 10_000) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("skipping: no browser available ({})", e);
                return;
            }
        };
        let dir = tempfile::tempdir().unwrap();
        let shot = dir.path().join("shot_01.png");
        capturer.capture("about:blank", &shot).unwrap();
        assert!(shot.exists());
    }
}
