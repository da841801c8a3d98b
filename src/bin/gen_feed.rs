use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::Rng;
use rand::seq::SliceRandom;

use bracket_scout::bracket_feed::{BracketFeed, CornerScore, FeedCategory, FeedCorner, FeedEvent, FeedMatch};

const EVENTS: &[&str] = &[
    "Asian Championship 2025",
    "Grand Slam Abu Dhabi",
    "World Championship 2025",
];

const CATEGORIES: &[&str] = &[
    "Male -69kg",
    "Male -77kg",
    "Male -85kg",
    "Male -94kg",
    "Female -57kg",
    "Female -63kg",
];

const ROUNDS: &[&str] = &["Round of 16", "Quarter-Final", "Semi-Final", "Final"];

const COUNTRIES: &[&str] = &[
    "KSA", "UAE", "KAZ", "UZB", "JPN", "KOR", "CHN", "THA", "JOR", "QAT", "FRA", "GER", "USA",
    "BRA",
];

const NAME_PARTS: &[&str] = &[
    "ALI", "OMAR", "NADA", "KENJI", "TIMUR", "RASHID", "MIN", "WEI", "SOMSAK", "KHALID", "LUCAS",
    "MAX", "JOAO", "DANIEL",
];

fn main() -> Result<()> {
    let out_path = parse_out_arg().unwrap_or_else(|| PathBuf::from("Results/all_matches.json"));
    let matches_per_category = parse_count_arg().unwrap_or(12);

    let mut rng = rand::thread_rng();

    // Fixed roster so names recur across events and loss chains form.
    let roster: Vec<(String, String)> = NAME_PARTS
        .iter()
        .enumerate()
        .map(|(idx, first)| {
            let last = NAME_PARTS[(idx + 5) % NAME_PARTS.len()];
            let country = COUNTRIES[idx % COUNTRIES.len()];
            (format!("{first} {last}"), country.to_string())
        })
        .collect();

    let events = EVENTS
        .iter()
        .map(|event_name| FeedEvent {
            event_name: event_name.to_string(),
            categories: CATEGORIES
                .iter()
                .map(|category| FeedCategory {
                    category: category.to_string(),
                    matches: (0..matches_per_category)
                        .map(|_| synth_match(&roster, &mut rng))
                        .collect(),
                })
                .collect(),
        })
        .collect();

    let feed = BracketFeed { events };
    let total: usize = feed
        .events
        .iter()
        .flat_map(|event| event.categories.iter())
        .map(|category| category.matches.len())
        .sum();

    if let Some(dir) = out_path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)
            .with_context(|| format!("unable to create {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(&feed).context("feed serialization failed")?;
    fs::write(&out_path, json)
        .with_context(|| format!("unable to write {}", out_path.display()))?;

    println!("Synthetic feed written: {}", out_path.display());
    println!("Events: {}", feed.events.len());
    println!("Matches: {total}");
    Ok(())
}

fn synth_match(roster: &[(String, String)], rng: &mut impl Rng) -> FeedMatch {
    let pair: Vec<&(String, String)> = roster.choose_multiple(rng, 2).collect();
    let (red, blue) = (pair[0], pair[1]);

    let red_score = rng.gen_range(0..15);
    let blue_score = rng.gen_range(0..15);
    let red_wins = red_score > blue_score || (red_score == blue_score && rng.r#gen::<bool>());
    let (winner, winner_country) = if red_wins { red } else { blue };

    FeedMatch {
        round: Some(ROUNDS.choose(rng).copied().unwrap_or("Final").to_string()),
        red_corner: FeedCorner {
            name: Some(red.0.clone()),
            country: Some(red.1.clone()),
            score: Some(CornerScore::Number(red_score)),
        },
        blue_corner: FeedCorner {
            name: Some(blue.0.clone()),
            country: Some(blue.1.clone()),
            score: Some(CornerScore::Number(blue_score)),
        },
        winner: Some(winner.clone()),
        winner_country: Some(winner_country.clone()),
        date: None,
    }
}

fn parse_out_arg() -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix("--out=") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == "--out"
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(PathBuf::from(next));
        }
    }
    None
}

fn parse_count_arg() -> Option<usize> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix("--matches-per-category=") {
            if let Ok(count) = raw.trim().parse::<usize>() {
                return Some(count);
            }
        }
        if arg == "--matches-per-category"
            && let Some(next) = args.get(idx + 1)
            && let Ok(count) = next.trim().parse::<usize>()
        {
            return Some(count);
        }
    }
    None
}
