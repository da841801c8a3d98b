use serde::{Deserialize, Serialize};

use crate::bracket_feed::{BracketFeed, CornerScore, FeedCorner};

/// One completed bout, normalized from the raw feed. Immutable once built;
/// graph edges and athlete records reference these by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub winner: String,
    pub winner_country: String,
    pub loser: String,
    pub loser_country: String,
    pub score: Option<String>,
    pub event: Option<String>,
    pub category: Option<String>,
    pub round: Option<String>,
    pub date: Option<String>,
}

/// Ordered canonical match list built from one or more feeds.
///
/// Malformed entries (missing winner or a corner name) carry no signal and
/// are skipped, not errored; the skip total stays observable for diagnostics.
#[derive(Debug, Default)]
pub struct MatchStore {
    matches: Vec<MatchRecord>,
    skipped: usize,
}

impl MatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes a feed into the store, preserving feed order. Returns the
    /// number of matches accepted from this feed.
    pub fn load(&mut self, feed: &BracketFeed) -> usize {
        let mut count = 0usize;

        for event in &feed.events {
            let event_name = non_empty(&event.event_name);

            for category in &event.categories {
                let category_name = non_empty(&category.category);

                for entry in &category.matches {
                    let Some(winner) = entry.winner.as_deref().map(str::trim).filter(|s| !s.is_empty())
                    else {
                        self.skipped += 1;
                        continue;
                    };
                    let (Some(red_name), Some(blue_name)) =
                        (corner_name(&entry.red_corner), corner_name(&entry.blue_corner))
                    else {
                        self.skipped += 1;
                        continue;
                    };

                    // Loser is whichever corner the declared winner is not.
                    let (loser, loser_country, winner_country) = if winner == red_name {
                        (
                            blue_name,
                            corner_country(&entry.blue_corner),
                            corner_country(&entry.red_corner),
                        )
                    } else {
                        (
                            red_name,
                            corner_country(&entry.red_corner),
                            corner_country(&entry.blue_corner),
                        )
                    };

                    let score = format!(
                        "{}-{}",
                        CornerScore::render(entry.red_corner.score.as_ref()),
                        CornerScore::render(entry.blue_corner.score.as_ref()),
                    );

                    self.matches.push(MatchRecord {
                        winner: winner.to_string(),
                        winner_country,
                        loser: loser.to_string(),
                        loser_country,
                        score: Some(score),
                        event: event_name.clone(),
                        category: category_name.clone(),
                        round: entry.round.clone(),
                        date: entry.date.clone(),
                    });
                    count += 1;
                }
            }
        }

        count
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Entries dropped during ingestion for missing winner/corner names.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

fn corner_name(corner: &FeedCorner) -> Option<&str> {
    corner.name.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn corner_country(corner: &FeedCorner) -> String {
    corner
        .country
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
