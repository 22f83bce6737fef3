use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use feed_rs::model::Feed;
use regex::{Regex, RegexBuilder};
use reqwest::Client;
use std::collections::HashSet;

use crate::models::Candidate;

/// AI/ML terms an entry must mention (in title or summary) to qualify.
pub const DEFAULT_KEYWORDS: &str = r"\b(ai|artificial intelligence|llm|agent|agents|copilot|gemini|openai|anthropic|deepmind|model|models|inference|training|chip|gpu|nvidia)\b";

/// Filters feed entries down to recent, keyword-matching candidates.
///
/// Feeds are fetched one at a time and a failed fetch is a warning, not an
/// error: that feed simply contributes no entries.
pub struct FeedPicker {
    client: Client,
    keywords: Regex,
}

impl FeedPicker {
    pub fn new() -> Result<Self> {
        Self::with_keywords(DEFAULT_KEYWORDS)
    }

    pub fn with_keywords(pattern: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (compatible; StoryPipeline/1.0)")
            .build()
            .context("Failed to create HTTP client")?;

        let keywords = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .context("Invalid keyword pattern")?;

        Ok(Self { client, keywords })
    }

    /// Fetch every feed in order, filter entries, dedupe by URL
    /// (first-seen wins), sort newest first, and keep at most `limit`.
    pub async fn pick(&self, feed_urls: &[String], hours: i64, limit: usize) -> Vec<Candidate> {
        let cutoff = Utc::now() - Duration::hours(hours);

        let mut candidates = Vec::new();
        for feed_url in feed_urls {
            if url::Url::parse(feed_url).is_err() {
                eprintln!("⚠ Skipping invalid feed URL: {}", feed_url);
                continue;
            }
            match self.fetch_feed(feed_url).await {
                Ok(feed) => candidates.extend(self.collect_candidates(&feed, feed_url, cutoff)),
                Err(e) => eprintln!("⚠ Failed to fetch {}: {:#}", feed_url, e),
            }
        }

        let mut deduped = dedupe_by_url(candidates);
        sort_newest_first(&mut deduped);
        deduped.truncate(limit);
        deduped
    }

    async fn fetch_feed(&self, feed_url: &str) -> Result<Feed> {
        let response = self
            .client
            .get(feed_url)
            .send()
            .await
            .context("Failed to send HTTP request")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP error: {}", status);
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read response body")?;

        feed_rs::parser::parse(bytes.as_ref()).context("Failed to parse feed")
    }

    /// Qualifying entries of one feed: has a link, title+summary matches
    /// the keyword pattern, and published within the window (entries with
    /// no timestamp always pass).
    pub fn collect_candidates(
        &self,
        feed: &Feed,
        feed_url: &str,
        cutoff: DateTime<Utc>,
    ) -> Vec<Candidate> {
        let source = feed
            .title
            .as_ref()
            .map(|t| t.content.trim().to_string())
            .filter(|s| !s.is_empty())
            .or_else(|| feed.links.first().map(|l| l.href.clone()))
            .unwrap_or_else(|| feed_url.to_string());

        let mut out = Vec::new();
        for entry in &feed.entries {
            let title = entry
                .title
                .as_ref()
                .map(|t| t.content.trim().to_string())
                .unwrap_or_default();
            let link = entry
                .links
                .first()
                .map(|l| l.href.trim().to_string())
                .unwrap_or_default();
            if link.is_empty() {
                continue;
            }

            let summary = entry
                .summary
                .as_ref()
                .map(|s| s.content.trim().to_string())
                .unwrap_or_default();

            let blob = format!("{} {}", title, summary);
            if !self.keywords.is_match(&blob) {
                continue;
            }

            let published = entry.published.or(entry.updated);
            if let Some(when) = published {
                if when < cutoff {
                    continue;
                }
            }

            out.push(Candidate {
                title,
                url: link,
                source: source.clone(),
                published,
            });
        }
        out
    }
}

/// First occurrence of a URL wins; feed order is significant.
pub fn dedupe_by_url(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.url.clone()))
        .collect()
}

/// Newest first; entries with unknown publish time sort last. Stable, so
/// entries with equal timestamps keep their discovery order.
pub fn sort_newest_first(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| b.published.cmp(&a.published));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn cand(url: &str, published: Option<DateTime<Utc>>) -> Candidate {
        Candidate {
            title: format!("entry {}", url),
            url: url.to_string(),
            source: "Feed".to_string(),
            published,
        }
    }

    fn parse_feed(xml: &str) -> Feed {
        feed_rs::parser::parse(xml.as_bytes()).unwrap()
    }

    const SAMPLE_RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
<title>Example Tech</title>
<link>https://example.test</link>
<item>
  <title>New GPU shipped</title>
  <link>https://example.test/gpu</link>
  <description>Benchmarks of the latest nvidia silicon.</description>
  <pubDate>Mon, 02 Jun 2025 12:00:00 GMT</pubDate>
</item>
<item>
  <title>Gardening tips</title>
  <link>https://example.test/garden</link>
  <description>Nothing technical here.</description>
  <pubDate>Mon, 02 Jun 2025 13:00:00 GMT</pubDate>
</item>
<item>
  <title>LLM roundup</title>
  <link>https://example.test/llm</link>
  <description>Weekly roundup.</description>
</item>
</channel></rss>"#;

    #[test]
    fn test_keyword_filter_is_case_insensitive() {
        let picker = FeedPicker::new().unwrap();
        let feed = parse_feed(SAMPLE_RSS);
        let cutoff = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let cands = picker.collect_candidates(&feed, "https://example.test/rss", cutoff);
        let urls: Vec<&str> = cands.iter().map(|c| c.url.as_str()).collect();
        assert!(urls.contains(&"https://example.test/gpu"));
        assert!(!urls.contains(&"https://example.test/garden"));
    }

    #[test]
    fn test_entry_without_timestamp_always_passes_window() {
        let picker = FeedPicker::new().unwrap();
        let feed = parse_feed(SAMPLE_RSS);
        // Cutoff after every dated entry: only the undated one survives.
        let cutoff = Utc.with_ymd_and_hms(2025, 6, 3, 0, 0, 0).unwrap();
        let cands = picker.collect_candidates(&feed, "https://example.test/rss", cutoff);
        assert_eq!(cands.len(), 1);
        assert_eq!(cands[0].url, "https://example.test/llm");
        assert!(cands[0].published.is_none());
    }

    #[test]
    fn test_entry_older_than_window_is_excluded() {
        let picker = FeedPicker::new().unwrap();
        let feed = parse_feed(SAMPLE_RSS);
        // Entry published 2025-06-02T12:00Z; a cutoff one hour later (the
        // 25-hours-ago-vs-24h-window case) excludes it.
        let cutoff = Utc.with_ymd_and_hms(2025, 6, 2, 13, 0, 0).unwrap();
        let cands = picker.collect_candidates(&feed, "https://example.test/rss", cutoff);
        assert!(cands.iter().all(|c| c.url != "https://example.test/gpu"));
    }

    #[test]
    fn test_entry_without_link_is_dropped() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>F</title>
<item><title>AI story with no link</title><description>ai</description></item>
</channel></rss>"#;
        let picker = FeedPicker::new().unwrap();
        let feed = parse_feed(xml);
        let cutoff = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert!(picker
            .collect_candidates(&feed, "https://f.test", cutoff)
            .is_empty());
    }

    #[test]
    fn test_source_falls_back_to_feed_url() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
<item><title>AI story</title><link>https://f.test/a</link></item>
</channel></rss>"#;
        let picker = FeedPicker::new().unwrap();
        let feed = parse_feed(xml);
        let cutoff = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let cands = picker.collect_candidates(&feed, "https://f.test/rss", cutoff);
        assert_eq!(cands[0].source, "https://f.test/rss");
    }

    #[test]
    fn test_dedupe_first_seen_wins() {
        let a = Candidate {
            source: "Feed A".to_string(),
            ..cand("https://x.test/story", None)
        };
        let b = Candidate {
            source: "Feed B".to_string(),
            ..cand("https://x.test/story", None)
        };
        let deduped = dedupe_by_url(vec![a, b, cand("https://x.test/other", None)]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].source, "Feed A");
    }

    #[test]
    fn test_sort_newest_first_unknown_last() {
        let t1 = Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2025, 6, 2, 18, 0, 0).unwrap();
        let mut cands = vec![
            cand("https://x.test/a", None),
            cand("https://x.test/b", Some(t1)),
            cand("https://x.test/c", Some(t2)),
        ];
        sort_newest_first(&mut cands);
        assert_eq!(cands[0].url, "https://x.test/c");
        assert_eq!(cands[1].url, "https://x.test/b");
        assert_eq!(cands[2].url, "https://x.test/a");
    }

    #[test]
    fn test_sort_is_stable_for_equal_timestamps() {
        let t = Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap();
        let mut cands = vec![
            cand("https://x.test/first", Some(t)),
            cand("https://x.test/second", Some(t)),
            cand("https://x.test/u1", None),
            cand("https://x.test/u2", None),
        ];
        sort_newest_first(&mut cands);
        assert_eq!(cands[0].url, "https://x.test/first");
        assert_eq!(cands[1].url, "https://x.test/second");
        assert_eq!(cands[2].url, "https://x.test/u1");
        assert_eq!(cands[3].url, "https://x.test/u2");
    }
}
