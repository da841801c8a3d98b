use std::cmp::Reverse;
use std::collections::HashSet;

use chrono::Utc;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::athlete_graph::{AthleteGraph, AthleteRecord};
use crate::regions::CountrySet;
use crate::scouting::{ScoringWeights, ScoutingTarget, calculate_beatability};

const TARGETS_PER_ATHLETE: usize = 10;
const TRACE_SECOND_HOP_LIMIT: usize = 3;

/// Per-athlete scouting report: for each reference athlete, the top
/// beatable candidates from the scouting pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutingReport {
    pub generated_at: String,
    pub total_matches_analyzed: usize,
    pub scouting_reports: Vec<AthleteScoutingReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteScoutingReport {
    pub athlete: String,
    pub country: String,
    pub total_wins: usize,
    pub total_losses: usize,
    pub win_rate: f64,
    pub scouting_targets: Vec<ScoutingTarget>,
}

/// Category leaderboard: most active athletes per category with full loss
/// detail. A scouting surface, not a skill ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryLeaderboard {
    pub generated_at: String,
    pub total_matches_analyzed: usize,
    pub report_type: String,
    pub categories: Vec<CategoryGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: String,
    pub athletes: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub country: String,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: String,
    pub total_matches: usize,
    pub loss_details: Vec<LossDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LossDetail {
    pub lost_to: String,
    pub winner_country: String,
    pub score: Option<String>,
    pub event: Option<String>,
    pub round: Option<String>,
}

/// Depth-bounded expansion of who beat an athlete, then who beat those.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LossChainTrace {
    pub athlete: String,
    pub country: String,
    pub beaten_by: Vec<ChainNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainNode {
    pub name: String,
    pub country: String,
    pub beaten_by: Vec<ChainNode>,
}

/// Builds the per-athlete scouting report.
///
/// `name_filter` is a case-insensitive substring over the home athletes;
/// returns None when it matches nobody, which is distinct from a report
/// whose athletes simply have zero beatable candidates.
pub fn generate_scouting_report(
    graph: &AthleteGraph,
    name_filter: Option<&str>,
    category: Option<&str>,
    home: &CountrySet,
    pool: &CountrySet,
    weights: &ScoringWeights,
) -> Option<ScoutingReport> {
    let mut references = graph.athletes_in(home);
    // Most active first; stable sort keeps feed-encounter order on ties.
    references.sort_by_key(|record| Reverse(record.total_matches()));
    if let Some(filter) = name_filter {
        let needle = filter.to_lowercase();
        references.retain(|record| record.name.to_lowercase().contains(&needle));
    }
    if references.is_empty() {
        return None;
    }

    let candidates = scouting_candidates(graph, category, home, pool);

    let scouting_reports = references
        .iter()
        .map(|reference| {
            let mut targets: Vec<ScoutingTarget> = candidates
                .iter()
                .filter(|candidate| candidate.name != reference.name)
                .map(|candidate| calculate_beatability(graph, reference, candidate, weights))
                .filter(|target| target.beatability_score > 0.0)
                .collect();
            targets.sort_by(|a, b| {
                b.beatability_score
                    .partial_cmp(&a.beatability_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            targets.truncate(TARGETS_PER_ATHLETE);

            AthleteScoutingReport {
                athlete: reference.name.clone(),
                country: reference.country.clone(),
                total_wins: reference.wins.len(),
                total_losses: reference.losses.len(),
                win_rate: reference.win_rate(),
                scouting_targets: targets,
            }
        })
        .collect();

    Some(ScoutingReport {
        generated_at: Utc::now().to_rfc3339(),
        total_matches_analyzed: graph.matches_recorded(),
        scouting_reports,
    })
}

/// Pool athletes outside the home federation, optionally narrowed to one
/// competition category.
fn scouting_candidates<'a>(
    graph: &'a AthleteGraph,
    category: Option<&str>,
    home: &CountrySet,
    pool: &CountrySet,
) -> Vec<&'a AthleteRecord> {
    graph
        .athletes_in(pool)
        .into_iter()
        .filter(|record| !home.contains(&record.country))
        .filter(|record| {
            category.is_none_or(|needle| graph.competed_in_category(&record.name, needle))
        })
        .collect()
}

/// Regional leaderboard: top athletes per category, restricted to `region`.
pub fn generate_regional_leaderboard(
    graph: &AthleteGraph,
    region_label: &str,
    region: &CountrySet,
    category_filter: Option<&str>,
    top_n: usize,
) -> CategoryLeaderboard {
    build_leaderboard(graph, region_label, Some(region), category_filter, top_n)
}

/// World leaderboard: same shape, no country restriction.
pub fn generate_world_leaderboard(
    graph: &AthleteGraph,
    category_filter: Option<&str>,
    top_n: usize,
) -> CategoryLeaderboard {
    build_leaderboard(graph, "World", None, category_filter, top_n)
}

fn build_leaderboard(
    graph: &AthleteGraph,
    label: &str,
    region: Option<&CountrySet>,
    category_filter: Option<&str>,
    top_n: usize,
) -> CategoryLeaderboard {
    // Group membership is per category label: an athlete competing in two
    // categories appears once in each, with the same underlying record.
    let mut category_names: Vec<String> = Vec::new();
    let mut members: Vec<Vec<&AthleteRecord>> = Vec::new();

    for record in graph.athletes() {
        if let Some(region) = region
            && !region.contains(&record.country)
        {
            continue;
        }
        for category in graph.categories_for(&record.name) {
            match category_names.iter().position(|name| *name == category) {
                Some(idx) => members[idx].push(record),
                None => {
                    category_names.push(category);
                    members.push(vec![record]);
                }
            }
        }
    }

    let mut groups: Vec<(String, Vec<&AthleteRecord>)> =
        category_names.into_iter().zip(members).collect();
    if let Some(filter) = category_filter {
        let needle = filter.to_lowercase();
        groups.retain(|(name, _)| name.to_lowercase().contains(&needle));
    }
    groups.sort_by(|a, b| a.0.cmp(&b.0));

    // Each category group is independent and read-only over the finished
    // graph, so the per-group work maps in parallel.
    let categories: Vec<CategoryGroup> = groups
        .into_par_iter()
        .map(|(category, mut athletes)| {
            athletes.sort_by_key(|record| Reverse(record.total_matches()));
            athletes.truncate(top_n);
            CategoryGroup {
                category,
                athletes: athletes.into_iter().map(leaderboard_entry).collect(),
            }
        })
        .collect();

    CategoryLeaderboard {
        generated_at: Utc::now().to_rfc3339(),
        total_matches_analyzed: graph.matches_recorded(),
        report_type: format!("{label} Top {top_n}"),
        categories,
    }
}

fn leaderboard_entry(record: &AthleteRecord) -> LeaderboardEntry {
    let loss_details = record
        .losses
        .iter()
        .map(|loss| LossDetail {
            lost_to: loss.winner.clone(),
            winner_country: loss.winner_country.clone(),
            score: loss.score.clone(),
            event: loss.event.clone(),
            round: loss.round.clone(),
        })
        .collect();

    LeaderboardEntry {
        name: record.name.clone(),
        country: record.country.clone(),
        wins: record.wins.len(),
        losses: record.losses.len(),
        win_rate: format!("{:.0}%", record.win_rate() * 100.0),
        total_matches: record.total_matches(),
        loss_details,
    }
}

/// Expands the loss chain of one athlete. None when the athlete has no
/// record at all. The first hop lists every beater; deeper hops are capped
/// at a few beaters each, and a visited set guards against cycles (A beat B
/// at one event, B beat A at another).
pub fn generate_loss_chain(
    graph: &AthleteGraph,
    athlete: &str,
    depth: usize,
) -> Option<LossChainTrace> {
    let record = graph.athlete(athlete)?;
    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(athlete.to_string());
    let beaten_by = expand_chain(graph, athlete, depth, &mut visited, None);
    Some(LossChainTrace {
        athlete: record.name.clone(),
        country: record.country.clone(),
        beaten_by,
    })
}

fn expand_chain(
    graph: &AthleteGraph,
    name: &str,
    depth_left: usize,
    visited: &mut HashSet<String>,
    limit: Option<usize>,
) -> Vec<ChainNode> {
    if depth_left == 0 {
        return Vec::new();
    }
    let Some(beaters) = graph.beaten_by(name) else {
        return Vec::new();
    };

    let mut ordered: Vec<&str> = beaters.iter().map(String::as_str).collect();
    ordered.sort_unstable();
    if let Some(limit) = limit {
        ordered.truncate(limit);
    }

    let mut out = Vec::new();
    for beater in ordered {
        if visited.contains(beater) {
            continue;
        }
        visited.insert(beater.to_string());
        let children = expand_chain(
            graph,
            beater,
            depth_left - 1,
            visited,
            Some(TRACE_SECOND_HOP_LIMIT),
        );
        visited.remove(beater);
        out.push(ChainNode {
            name: beater.to_string(),
            country: graph
                .athlete(beater)
                .map(|record| record.country.clone())
                .unwrap_or_else(|| "???".to_string()),
            beaten_by: children,
        });
    }
    out
}

impl LossChainTrace {
    /// Indented text rendering in the shape the batch binary prints.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== LOSS CHAIN: {} ===\n\n", self.athlete));
        if self.beaten_by.is_empty() {
            out.push_str(&format!("  No recorded losses for {}\n", self.athlete));
            return out;
        }
        out.push_str(&format!("  {} lost to:\n", self.athlete));
        for node in &self.beaten_by {
            render_node(&mut out, node, 1);
        }
        out
    }
}

fn render_node(out: &mut String, node: &ChainNode, level: usize) {
    let indent = "    ".repeat(level);
    out.push_str(&format!("{indent}-> {} ({})\n", node.name, node.country));
    for child in &node.beaten_by {
        render_node(out, child, level + 2);
    }
}
