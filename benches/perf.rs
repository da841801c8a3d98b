use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use bracket_scout::athlete_graph::AthleteGraph;
use bracket_scout::match_store::MatchRecord;
use bracket_scout::regions::CountrySet;
use bracket_scout::reports::generate_world_leaderboard;
use bracket_scout::scouting::{ScoringWeights, calculate_beatability};

const COUNTRIES: &[&str] = &["KSA", "UAE", "KAZ", "UZB", "JPN", "KOR", "CHN", "THA", "JOR", "QAT"];
const CATEGORIES: &[&str] = &["Male -69kg", "Male -77kg", "Male -85kg", "Male -94kg"];

fn synth_matches(count: usize) -> Vec<MatchRecord> {
    (0..count)
        .map(|idx| {
            let winner_id = idx % 120;
            let loser_id = (idx * 7 + 1) % 120;
            MatchRecord {
                winner: format!("ATHLETE {winner_id:03}"),
                winner_country: COUNTRIES[winner_id % COUNTRIES.len()].to_string(),
                loser: format!("ATHLETE {loser_id:03}"),
                loser_country: COUNTRIES[loser_id % COUNTRIES.len()].to_string(),
                score: Some(format!("{}-{}", idx % 12, (idx + 3) % 12)),
                event: Some("Asian Championship 2025".to_string()),
                category: Some(CATEGORIES[idx % CATEGORIES.len()].to_string()),
                round: Some("Quarter-Final".to_string()),
                date: None,
            }
        })
        .filter(|record| record.winner != record.loser)
        .collect()
}

fn bench_graph_build(c: &mut Criterion) {
    let matches = synth_matches(5_000);
    c.bench_function("graph_build_5k", |b| {
        b.iter(|| {
            let graph = AthleteGraph::from_matches(black_box(&matches));
            black_box(graph.athlete_count());
        })
    });
}

fn bench_beatability(c: &mut Criterion) {
    let matches = synth_matches(5_000);
    let graph = AthleteGraph::from_matches(&matches);
    let weights = ScoringWeights::default();
    let reference = graph.athlete("ATHLETE 000").expect("athlete exists");
    let opponent = graph.athlete("ATHLETE 001").expect("athlete exists");

    c.bench_function("beatability_single_pair", |b| {
        b.iter(|| {
            let target = calculate_beatability(
                black_box(&graph),
                black_box(reference),
                black_box(opponent),
                &weights,
            );
            black_box(target.beatability_score);
        })
    });
}

fn bench_beatability_full_pool(c: &mut Criterion) {
    let matches = synth_matches(5_000);
    let graph = AthleteGraph::from_matches(&matches);
    let weights = ScoringWeights::default();
    let home = CountrySet::from_codes(["KSA"]);
    let references = graph.athletes_in(&home);

    c.bench_function("beatability_full_pool", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for reference in &references {
                for opponent in graph.athletes() {
                    if opponent.name == reference.name {
                        continue;
                    }
                    sum += calculate_beatability(&graph, reference, opponent, &weights)
                        .beatability_score;
                }
            }
            black_box(sum);
        })
    });
}

fn bench_world_leaderboard(c: &mut Criterion) {
    let matches = synth_matches(5_000);
    let graph = AthleteGraph::from_matches(&matches);

    c.bench_function("world_leaderboard_5k", |b| {
        b.iter(|| {
            let report = generate_world_leaderboard(black_box(&graph), None, 20);
            black_box(report.categories.len());
        })
    });
}

criterion_group!(
    benches,
    bench_graph_build,
    bench_beatability,
    bench_beatability_full_pool,
    bench_world_leaderboard
);
criterion_main!(benches);
