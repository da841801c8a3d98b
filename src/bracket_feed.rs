use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Raw bracket feed as produced by the scraper/parser collaborators:
/// events, each holding categories, each holding matches with two corners.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BracketFeed {
    #[serde(default)]
    pub events: Vec<FeedEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedEvent {
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub categories: Vec<FeedCategory>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedCategory {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub matches: Vec<FeedMatch>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedMatch {
    #[serde(default)]
    pub round: Option<String>,
    #[serde(default)]
    pub red_corner: FeedCorner,
    #[serde(default)]
    pub blue_corner: FeedCorner,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub winner_country: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedCorner {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub score: Option<CornerScore>,
}

/// Scraped corner scores show up either as numbers or as strings
/// depending on which parser produced the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CornerScore {
    Number(i64),
    Text(String),
}

impl CornerScore {
    /// Render the score for the canonical "{red}-{blue}" string; a missing
    /// score renders as 0.
    pub fn render(value: Option<&CornerScore>) -> String {
        match value {
            Some(CornerScore::Number(n)) => n.to_string(),
            Some(CornerScore::Text(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    "0".to_string()
                } else {
                    trimmed.to_string()
                }
            }
            None => "0".to_string(),
        }
    }
}

pub fn parse_feed_json(raw: &str) -> Result<BracketFeed> {
    serde_json::from_str(raw).context("invalid bracket feed json")
}

/// Reads a feed file. An unreadable file is the one hard error in the
/// ingestion path; everything past this point is skip-and-continue.
pub fn load_feed(path: &Path) -> Result<BracketFeed> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("unable to read match feed {}", path.display()))?;
    parse_feed_json(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_score_renders_numbers_strings_and_missing() {
        assert_eq!(CornerScore::render(Some(&CornerScore::Number(7))), "7");
        assert_eq!(
            CornerScore::render(Some(&CornerScore::Text("12".to_string()))),
            "12"
        );
        assert_eq!(
            CornerScore::render(Some(&CornerScore::Text("  ".to_string()))),
            "0"
        );
        assert_eq!(CornerScore::render(None), "0");
    }

    #[test]
    fn feed_parses_with_mixed_score_types() {
        let raw = r#"{
            "events": [{
                "event_name": "Test Open",
                "categories": [{
                    "category": "Male -77kg",
                    "matches": [{
                        "round": "Final",
                        "red_corner": {"name": "A", "country": "KSA", "score": 5},
                        "blue_corner": {"name": "B", "country": "UAE", "score": "3"},
                        "winner": "A",
                        "winner_country": "KSA"
                    }]
                }]
            }]
        }"#;
        let feed = parse_feed_json(raw).expect("feed should parse");
        assert_eq!(feed.events.len(), 1);
        let entry = &feed.events[0].categories[0].matches[0];
        assert_eq!(entry.winner.as_deref(), Some("A"));
        assert_eq!(CornerScore::render(entry.red_corner.score.as_ref()), "5");
        assert_eq!(CornerScore::render(entry.blue_corner.score.as_ref()), "3");
    }

    #[test]
    fn empty_object_parses_as_empty_feed() {
        let feed = parse_feed_json("{}").expect("empty feed should parse");
        assert!(feed.events.is_empty());
    }
}
