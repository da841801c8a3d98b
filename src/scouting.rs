use serde::{Deserialize, Serialize};

use crate::athlete_graph::{AthleteGraph, AthleteRecord};
use crate::match_store::MatchRecord;

/// Tunable knobs of the beatability heuristic. The defaults are the
/// production constants; none of them is a load-bearing invariant.
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    /// Per shared loss: opponent lost to someone the reference has beaten.
    pub shared_loss: f64,
    /// Scaled by the win-rate difference when the reference rates higher.
    pub win_rate_gap: f64,
    /// Flat bonus when the opponent's recent window skews to losses.
    pub declining_form: f64,
    /// Flat bonus when the reference has more matches on record.
    pub experience_gap: f64,
    /// Per close loss, counted up to `close_loss_cap`.
    pub close_loss: f64,
    pub close_loss_cap: usize,
    /// Max score-point margin for a loss to count as close.
    pub close_margin: i64,
    /// How many recent wins/losses the form signal inspects.
    pub form_window: usize,
    /// Total score ceiling. No floor is applied; every contribution is >= 0.
    pub score_cap: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            shared_loss: 0.3,
            win_rate_gap: 0.2,
            declining_form: 0.15,
            experience_gap: 0.1,
            close_loss: 0.1,
            close_loss_cap: 3,
            close_margin: 3,
            form_window: 3,
            score_cap: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecentForm {
    Improving,
    Stable,
    Declining,
}

impl RecentForm {
    pub fn label(self) -> &'static str {
        match self {
            RecentForm::Improving => "improving",
            RecentForm::Stable => "stable",
            RecentForm::Declining => "declining",
        }
    }
}

/// One of the opponent's recent losses, kept for scouting context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyLoss {
    pub to: String,
    pub country: String,
    pub score: Option<String>,
    pub event: Option<String>,
    pub round: Option<String>,
}

/// Scored analysis of one (reference athlete, candidate opponent) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoutingTarget {
    pub opponent_name: String,
    pub opponent_country: String,
    pub beatability_score: f64,
    pub reasoning: Vec<String>,
    pub key_losses: Vec<KeyLoss>,
    pub shared_opponents: Vec<String>,
    pub recent_form: RecentForm,
}

/// Scores how beatable `opponent` looks for `reference` from five
/// independent signals, summed then capped.
///
/// Pure function of the two records plus the finished graph; identical
/// inputs produce an identical score and identical reasoning order.
pub fn calculate_beatability(
    graph: &AthleteGraph,
    reference: &AthleteRecord,
    opponent: &AthleteRecord,
    weights: &ScoringWeights,
) -> ScoutingTarget {
    let mut score = 0.0;
    let mut reasoning = Vec::new();

    // 1. Shared losses: opponent fell to someone the reference has beaten.
    let mut shared_losses: Vec<&str> = match (
        graph.victims_of(&reference.name),
        graph.beaten_by(&opponent.name),
    ) {
        (Some(victims), Some(beaters)) => victims
            .intersection(beaters)
            .map(String::as_str)
            .collect(),
        _ => Vec::new(),
    };
    shared_losses.sort_unstable();
    if !shared_losses.is_empty() {
        score += weights.shared_loss * shared_losses.len() as f64;
        for name in &shared_losses {
            reasoning.push(format!(
                "Lost to {name} - whom {} has beaten",
                reference.name
            ));
        }
    }

    // 2. Win-rate gap.
    if reference.win_rate() > opponent.win_rate() {
        let diff = reference.win_rate() - opponent.win_rate();
        score += weights.win_rate_gap * diff;
        reasoning.push(format!(
            "Lower win rate ({:.0}% vs {:.0}%)",
            opponent.win_rate() * 100.0,
            reference.win_rate() * 100.0
        ));
    }

    // 3. Recent form over the last few matches, in feed order.
    let recent_losses = tail(&opponent.losses, weights.form_window);
    let recent_wins = tail(&opponent.wins, weights.form_window);
    let recent_form = if recent_losses.len() > recent_wins.len() {
        score += weights.declining_form;
        reasoning.push(format!(
            "Recent form declining ({} losses in recent matches)",
            recent_losses.len()
        ));
        RecentForm::Declining
    } else if recent_wins.len() > recent_losses.len() {
        RecentForm::Improving
    } else {
        RecentForm::Stable
    };

    // 4. Experience gap.
    if reference.total_matches() > opponent.total_matches() {
        score += weights.experience_gap;
        reasoning.push(format!(
            "Less experienced ({} vs {} matches)",
            opponent.total_matches(),
            reference.total_matches()
        ));
    }

    // 5. Close losses: narrow margins mark a competitive but beatable
    // opponent. Unparseable scores simply don't count.
    let close_losses = opponent
        .losses
        .iter()
        .filter(|loss| is_close_loss(loss, weights.close_margin))
        .count();
    if close_losses > 0 {
        score += weights.close_loss * close_losses.min(weights.close_loss_cap) as f64;
        reasoning.push(format!(
            "Has {close_losses} close losses (competitive but beatable)"
        ));
    }

    let key_losses = tail(&opponent.losses, 5)
        .iter()
        .map(|loss| KeyLoss {
            to: loss.winner.clone(),
            country: loss.winner_country.clone(),
            score: loss.score.clone(),
            event: loss.event.clone(),
            round: loss.round.clone(),
        })
        .collect();

    ScoutingTarget {
        opponent_name: opponent.name.clone(),
        opponent_country: opponent.country.clone(),
        beatability_score: score.min(weights.score_cap),
        reasoning,
        key_losses,
        shared_opponents: graph.shared_opponents(&reference.name, &opponent.name),
        recent_form,
    }
}

fn is_close_loss(loss: &MatchRecord, margin: i64) -> bool {
    let Some(score) = loss.score.as_deref() else {
        return false;
    };
    let Some((a, b)) = parse_score(score) else {
        return false;
    };
    (a - b).abs() <= margin
}

/// Parses a "X-Y" score string into two integers.
pub fn parse_score(raw: &str) -> Option<(i64, i64)> {
    let (left, right) = raw.split_once('-')?;
    let a = left.trim().parse::<i64>().ok()?;
    let b = right.trim().parse::<i64>().ok()?;
    Some((a, b))
}

fn tail<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}
