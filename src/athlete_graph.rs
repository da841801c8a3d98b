use std::collections::{BTreeSet, HashMap, HashSet};

use crate::match_store::MatchRecord;
use crate::regions::CountrySet;

/// Aggregated career record for one (name, country) identity.
///
/// Identity is the exact name string as it appears in source data; spelling
/// variants and transliterations are not merged. When the same name recurs
/// with a different country the first-seen country is kept.
#[derive(Debug, Clone, Default)]
pub struct AthleteRecord {
    pub name: String,
    pub country: String,
    pub wins: Vec<MatchRecord>,
    pub losses: Vec<MatchRecord>,
}

impl AthleteRecord {
    pub fn total_matches(&self) -> usize {
        self.wins.len() + self.losses.len()
    }

    /// wins / (wins + losses); 0.0 with no matches, by convention.
    pub fn win_rate(&self) -> f64 {
        let total = self.total_matches();
        if total == 0 {
            0.0
        } else {
            self.wins.len() as f64 / total as f64
        }
    }
}

/// Win/loss records plus the two directed adjacency structures:
/// `loss_graph[X]` = who beat X, `win_graph[X]` = who X beat.
///
/// Built by one sequential pass over a match feed; all report generation
/// treats the finished graph as immutable.
#[derive(Debug, Default)]
pub struct AthleteGraph {
    records: HashMap<String, AthleteRecord>,
    win_graph: HashMap<String, HashSet<String>>,
    loss_graph: HashMap<String, HashSet<String>>,
    // First-appearance order, so grouping and tie-breaks stay feed-ordered.
    order: Vec<String>,
    matches_recorded: usize,
}

impl AthleteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from an ordered match slice.
    pub fn from_matches(matches: &[MatchRecord]) -> Self {
        let mut graph = Self::new();
        for record in matches {
            graph.record(record);
        }
        graph
    }

    /// Folds one match into the records and both adjacency sets.
    pub fn record(&mut self, record: &MatchRecord) {
        self.ensure_athlete(&record.winner, &record.winner_country)
            .wins
            .push(record.clone());
        self.ensure_athlete(&record.loser, &record.loser_country)
            .losses
            .push(record.clone());

        self.win_graph
            .entry(record.winner.clone())
            .or_default()
            .insert(record.loser.clone());
        self.loss_graph
            .entry(record.loser.clone())
            .or_default()
            .insert(record.winner.clone());

        self.matches_recorded += 1;
    }

    fn ensure_athlete(&mut self, name: &str, country: &str) -> &mut AthleteRecord {
        if !self.records.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.records
            .entry(name.to_string())
            .or_insert_with(|| AthleteRecord {
                name: name.to_string(),
                country: country.to_string(),
                wins: Vec::new(),
                losses: Vec::new(),
            })
    }

    pub fn athlete(&self, name: &str) -> Option<&AthleteRecord> {
        self.records.get(name)
    }

    /// All athletes in first-appearance order.
    pub fn athletes(&self) -> impl Iterator<Item = &AthleteRecord> {
        self.order.iter().filter_map(|name| self.records.get(name))
    }

    pub fn athlete_count(&self) -> usize {
        self.records.len()
    }

    pub fn matches_recorded(&self) -> usize {
        self.matches_recorded
    }

    /// Athletes whose country is in `countries`, first-appearance order.
    pub fn athletes_in(&self, countries: &CountrySet) -> Vec<&AthleteRecord> {
        self.athletes()
            .filter(|record| countries.contains(&record.country))
            .collect()
    }

    /// Names who beat `name` at least once.
    pub fn beaten_by(&self, name: &str) -> Option<&HashSet<String>> {
        self.loss_graph.get(name)
    }

    /// Names `name` beat at least once.
    pub fn victims_of(&self, name: &str) -> Option<&HashSet<String>> {
        self.win_graph.get(name)
    }

    /// Distinct category labels from an athlete's wins and losses, in the
    /// order first encountered. Recomputed per call, not stored.
    pub fn categories_for(&self, name: &str) -> Vec<String> {
        let Some(record) = self.records.get(name) else {
            return Vec::new();
        };
        let mut seen: HashSet<&str> = HashSet::new();
        let mut out = Vec::new();
        for m in record.wins.iter().chain(record.losses.iter()) {
            if let Some(category) = m.category.as_deref()
                && seen.insert(category)
            {
                out.push(category.to_string());
            }
        }
        out
    }

    /// Whether any of the athlete's matches carry a category label containing
    /// `needle` (case-insensitive substring).
    pub fn competed_in_category(&self, name: &str, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.categories_for(name)
            .iter()
            .any(|category| category.to_lowercase().contains(&needle))
    }

    /// Names faced by both athletes (either beaten or beaten-by), sorted so
    /// identical inputs produce identical output order.
    pub fn shared_opponents(&self, a: &str, b: &str) -> Vec<String> {
        let faced_a = self.faced_by(a);
        let faced_b = self.faced_by(b);
        faced_a
            .intersection(&faced_b)
            .map(|name| name.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn faced_by(&self, name: &str) -> HashSet<&str> {
        let mut faced: HashSet<&str> = HashSet::new();
        if let Some(victims) = self.win_graph.get(name) {
            faced.extend(victims.iter().map(String::as_str));
        }
        if let Some(beaters) = self.loss_graph.get(name) {
            faced.extend(beaters.iter().map(String::as_str));
        }
        faced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bout(winner: &str, winner_country: &str, loser: &str, loser_country: &str) -> MatchRecord {
        MatchRecord {
            winner: winner.to_string(),
            winner_country: winner_country.to_string(),
            loser: loser.to_string(),
            loser_country: loser_country.to_string(),
            score: Some("5-3".to_string()),
            event: Some("Open".to_string()),
            category: Some("Male -77kg".to_string()),
            round: None,
            date: None,
        }
    }

    #[test]
    fn single_match_populates_records_and_both_graphs() {
        let graph = AthleteGraph::from_matches(&[bout("ALI", "KSA", "SMITH", "UAE")]);

        let ali = graph.athlete("ALI").expect("winner should exist");
        assert_eq!(ali.wins.len(), 1);
        assert_eq!(ali.losses.len(), 0);
        assert_eq!(ali.win_rate(), 1.0);

        let smith = graph.athlete("SMITH").expect("loser should exist");
        assert_eq!(smith.wins.len(), 0);
        assert_eq!(smith.losses.len(), 1);
        assert_eq!(smith.win_rate(), 0.0);

        assert!(graph.beaten_by("SMITH").unwrap().contains("ALI"));
        assert!(graph.victims_of("ALI").unwrap().contains("SMITH"));
    }

    #[test]
    fn first_seen_country_wins_on_conflict() {
        let graph = AthleteGraph::from_matches(&[
            bout("ALI", "KSA", "SMITH", "UAE"),
            bout("ALI", "QAT", "OMAR", "JOR"),
        ]);
        assert_eq!(graph.athlete("ALI").unwrap().country, "KSA");
    }

    #[test]
    fn adjacency_sets_are_idempotent_but_match_lists_keep_multiplicity() {
        let graph = AthleteGraph::from_matches(&[
            bout("ALI", "KSA", "SMITH", "UAE"),
            bout("ALI", "KSA", "SMITH", "UAE"),
        ]);
        assert_eq!(graph.victims_of("ALI").unwrap().len(), 1);
        assert_eq!(graph.athlete("ALI").unwrap().wins.len(), 2);
        assert_eq!(graph.athlete("SMITH").unwrap().losses.len(), 2);
    }

    #[test]
    fn categories_are_distinct_and_in_first_seen_order() {
        let mut heavier = bout("ALI", "KSA", "OMAR", "JOR");
        heavier.category = Some("Male -85kg".to_string());
        let graph = AthleteGraph::from_matches(&[
            bout("ALI", "KSA", "SMITH", "UAE"),
            heavier,
            bout("ALI", "KSA", "SMITH", "UAE"),
        ]);
        assert_eq!(
            graph.categories_for("ALI"),
            vec!["Male -77kg".to_string(), "Male -85kg".to_string()]
        );
        assert!(graph.competed_in_category("ALI", "-85kg"));
        assert!(!graph.competed_in_category("ALI", "-94kg"));
    }

    #[test]
    fn shared_opponents_is_a_sorted_symmetric_intersection() {
        let graph = AthleteGraph::from_matches(&[
            bout("ALI", "KSA", "OMAR", "JOR"),
            bout("SMITH", "UAE", "OMAR", "JOR"),
            bout("KENJI", "JPN", "SMITH", "UAE"),
            bout("ALI", "KSA", "KENJI", "JPN"),
        ]);
        let shared = graph.shared_opponents("ALI", "SMITH");
        assert_eq!(shared, vec!["KENJI".to_string(), "OMAR".to_string()]);
        assert_eq!(shared, graph.shared_opponents("SMITH", "ALI"));
    }

    #[test]
    fn unknown_athlete_queries_return_empty() {
        let graph = AthleteGraph::new();
        assert!(graph.athlete("NOBODY").is_none());
        assert!(graph.beaten_by("NOBODY").is_none());
        assert!(graph.categories_for("NOBODY").is_empty());
        assert!(graph.shared_opponents("A", "B").is_empty());
    }
}
