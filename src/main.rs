use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::Utc;

use bracket_scout::athlete_graph::AthleteGraph;
use bracket_scout::bracket_feed;
use bracket_scout::match_store::MatchStore;
use bracket_scout::regions::{self, CountrySet};
use bracket_scout::report_export;
use bracket_scout::reports::{self, CategoryLeaderboard};
use bracket_scout::scouting::ScoringWeights;

const DEFAULT_FEED_PATH: &str = "Results/all_matches.json";

#[derive(Debug, Default)]
struct CliArgs {
    matches_path: Option<PathBuf>,
    athlete: Option<String>,
    all: bool,
    category: Option<String>,
    chains: Option<String>,
    depth: usize,
    top_asian: bool,
    top_world: bool,
    top_n: usize,
    output: Option<PathBuf>,
    xlsx: Option<PathBuf>,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = parse_args(std::env::args().skip(1).collect())?;

    let feed_path = args
        .matches_path
        .clone()
        .or_else(|| std::env::var("MATCHES_FILE").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FEED_PATH));

    // An unreadable feed file is the only fatal condition.
    let feed = bracket_feed::load_feed(&feed_path)?;

    let mut store = MatchStore::new();
    let count = store.load(&feed);
    println!("Loaded {count} matches from {}", feed_path.display());
    if store.skipped() > 0 {
        println!("Skipped {} malformed entries", store.skipped());
    }
    if count == 0 {
        println!("\nNo matches loaded. Run the bracket scraper first.");
        return Ok(());
    }

    let graph = AthleteGraph::from_matches(store.matches());
    let home = regions::home_codes();
    let pool = regions::region_codes();

    println!("\nTotal athletes in database: {}", graph.athlete_count());
    println!("Home athletes found: {}", graph.athletes_in(&home).len());
    println!(
        "Scouting pool opponents: {}",
        graph
            .athletes_in(&pool)
            .iter()
            .filter(|record| !home.contains(&record.country))
            .count()
    );

    if let Some(name) = &args.chains {
        return run_chains(&graph, name, args.depth);
    }
    if args.top_asian {
        let report = reports::generate_regional_leaderboard(
            &graph,
            "Asian",
            &pool,
            args.category.as_deref(),
            args.top_n,
        );
        return run_leaderboard(&args, &feed_path, "asian", report);
    }
    if args.top_world {
        let report =
            reports::generate_world_leaderboard(&graph, args.category.as_deref(), args.top_n);
        return run_leaderboard(&args, &feed_path, "world", report);
    }
    if args.athlete.is_some() || args.all {
        return run_scouting(&args, &feed_path, &graph, &home, &pool);
    }

    print_usage();
    Ok(())
}

fn run_chains(graph: &AthleteGraph, name: &str, depth: usize) -> Result<()> {
    match reports::generate_loss_chain(graph, name, depth) {
        Some(trace) => println!("\n{}", trace.render_text()),
        None => println!("\nNo athlete found matching: {name}"),
    }
    Ok(())
}

fn run_scouting(
    args: &CliArgs,
    feed_path: &Path,
    graph: &AthleteGraph,
    home: &CountrySet,
    pool: &CountrySet,
) -> Result<()> {
    let name_filter = if args.all { None } else { args.athlete.as_deref() };
    let weights = ScoringWeights::default();

    let Some(report) = reports::generate_scouting_report(
        graph,
        name_filter,
        args.category.as_deref(),
        home,
        pool,
        &weights,
    ) else {
        println!(
            "\nNo home athletes found matching: {}",
            name_filter.unwrap_or("<all>")
        );
        return Ok(());
    };

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| timestamped_path(feed_path, "scouting_report"));
    write_json(&output_path, &report)?;
    println!("\nScouting report saved: {}", output_path.display());

    for athlete_report in &report.scouting_reports {
        println!("\n{}", "=".repeat(60));
        println!("ATHLETE: {}", athlete_report.athlete);
        println!(
            "Win Rate: {:.0}% ({}W-{}L)",
            athlete_report.win_rate * 100.0,
            athlete_report.total_wins,
            athlete_report.total_losses
        );
        if athlete_report.scouting_targets.is_empty() {
            println!("No beatable opponents identified");
            continue;
        }
        println!("\nTOP BEATABLE OPPONENTS:");
        for (idx, target) in athlete_report.scouting_targets.iter().take(5).enumerate() {
            println!(
                "\n  {}. {} ({})",
                idx + 1,
                target.opponent_name,
                target.opponent_country
            );
            println!("     Beatability: {:.0}%", target.beatability_score * 100.0);
            println!("     Form: {}", target.recent_form.label());
            for reason in target.reasoning.iter().take(3) {
                println!("     - {reason}");
            }
        }
    }
    Ok(())
}

fn run_leaderboard(
    args: &CliArgs,
    feed_path: &Path,
    label: &str,
    report: CategoryLeaderboard,
) -> Result<()> {
    let output_path = args.output.clone().unwrap_or_else(|| {
        timestamped_path(feed_path, &format!("{label}_top{}", args.top_n))
    });
    write_json(&output_path, &report)?;
    println!(
        "\n{} scouting report saved: {}",
        report.report_type,
        output_path.display()
    );

    if let Some(xlsx_path) = &args.xlsx {
        let summary = report_export::export_leaderboard_xlsx(xlsx_path, &report)?;
        println!(
            "XLSX export: {} ({} categories, {} athletes, {} loss rows)",
            xlsx_path.display(),
            summary.categories,
            summary.athletes,
            summary.loss_rows
        );
    }

    for group in &report.categories {
        println!("\n{}", "=".repeat(70));
        println!("CATEGORY: {}", group.category);
        println!("{}", "=".repeat(70));

        for (idx, athlete) in group.athletes.iter().enumerate() {
            println!("\n  {}. {} ({})", idx + 1, athlete.name, athlete.country);
            println!(
                "     Record: {}W-{}L ({})",
                athlete.wins, athlete.losses, athlete.win_rate
            );
            if athlete.loss_details.is_empty() {
                println!("     No losses recorded");
                continue;
            }
            println!("     LOSSES:");
            for loss in athlete.loss_details.iter().take(5) {
                println!(
                    "       - to {} ({}) {}",
                    loss.lost_to,
                    loss.winner_country,
                    loss.score.as_deref().unwrap_or("")
                );
                if let Some(event) = &loss.event {
                    let short: String = event.chars().take(40).collect();
                    println!("         @ {short}");
                }
            }
        }
    }
    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)
            .with_context(|| format!("unable to create output dir {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(value).context("report serialization failed")?;
    fs::write(path, json).with_context(|| format!("unable to write {}", path.display()))
}

fn timestamped_path(feed_path: &Path, stem: &str) -> PathBuf {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let dir = feed_path.parent().unwrap_or_else(|| Path::new("."));
    dir.join(format!("{stem}_{timestamp}.json"))
}

fn parse_args(args: Vec<String>) -> Result<CliArgs> {
    let mut out = CliArgs {
        depth: 2,
        top_n: std::env::var("SCOUT_TOP_N")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(20),
        ..CliArgs::default()
    };

    let mut idx = 0;
    while idx < args.len() {
        let arg = args[idx].as_str();
        match arg {
            "--all" => out.all = true,
            "--top-asian" => out.top_asian = true,
            "--top-world" => out.top_world = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => {
                if let Some(value) = flag_value(&args, &mut idx, "--matches")? {
                    out.matches_path = Some(PathBuf::from(value));
                } else if let Some(value) = flag_value(&args, &mut idx, "--athlete")? {
                    out.athlete = Some(value);
                } else if let Some(value) = flag_value(&args, &mut idx, "--category")? {
                    out.category = Some(value);
                } else if let Some(value) = flag_value(&args, &mut idx, "--chains")? {
                    out.chains = Some(value);
                } else if let Some(value) = flag_value(&args, &mut idx, "--depth")? {
                    out.depth = value
                        .parse::<usize>()
                        .with_context(|| format!("invalid --depth value: {value}"))?;
                } else if let Some(value) = flag_value(&args, &mut idx, "--top-n")? {
                    out.top_n = value
                        .parse::<usize>()
                        .with_context(|| format!("invalid --top-n value: {value}"))?;
                } else if let Some(value) = flag_value(&args, &mut idx, "--output")? {
                    out.output = Some(PathBuf::from(value));
                } else if let Some(value) = flag_value(&args, &mut idx, "--xlsx")? {
                    out.xlsx = Some(PathBuf::from(value));
                } else {
                    return Err(anyhow!("unknown argument: {arg}"));
                }
            }
        }
        idx += 1;
    }
    Ok(out)
}

/// Accepts both `--flag value` and `--flag=value`. Advances `idx` past a
/// separate value token.
fn flag_value(args: &[String], idx: &mut usize, flag: &str) -> Result<Option<String>> {
    let arg = args[*idx].as_str();
    if let Some(value) = arg.strip_prefix(&format!("{flag}=")) {
        if value.trim().is_empty() {
            return Err(anyhow!("missing value for {flag}"));
        }
        return Ok(Some(value.to_string()));
    }
    if arg == flag {
        let Some(next) = args.get(*idx + 1) else {
            return Err(anyhow!("missing value for {flag}"));
        };
        *idx += 1;
        return Ok(Some(next.clone()));
    }
    Ok(None)
}

fn print_usage() {
    println!("bracket_scout - loss-chain scouting over bracket results");
    println!();
    println!("Usage:");
    println!("  bracket_scout --all                     scouting report for every home athlete");
    println!("  bracket_scout --athlete 'OMAR NADA'     scouting report for one athlete");
    println!("  bracket_scout --chains 'ATHLETE NAME'   loss-chain trace (--depth N, default 2)");
    println!("  bracket_scout --top-asian               top athletes per category (region pool)");
    println!("  bracket_scout --top-world               top athletes per category (all countries)");
    println!();
    println!("Options:");
    println!("  --matches PATH    match feed (default {DEFAULT_FEED_PATH}, env MATCHES_FILE)");
    println!("  --category CAT    filter by category substring");
    println!("  --top-n N         leaderboard size (default 20, env SCOUT_TOP_N)");
    println!("  --output PATH     report destination (default timestamped JSON next to feed)");
    println!("  --xlsx PATH       also export a leaderboard workbook");
}
