use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::reports::CategoryLeaderboard;

/// Row counts from a leaderboard export.
pub struct ExportReport {
    pub categories: usize,
    pub athletes: usize,
    pub loss_rows: usize,
}

/// Writes a category leaderboard to an XLSX workbook: one sheet of athlete
/// rows, one sheet of per-loss rows.
pub fn export_leaderboard_xlsx(
    path: &Path,
    report: &CategoryLeaderboard,
) -> Result<ExportReport> {
    let mut athlete_rows = vec![vec![
        "Category".to_string(),
        "Rank".to_string(),
        "Athlete".to_string(),
        "Country".to_string(),
        "Wins".to_string(),
        "Losses".to_string(),
        "Win Rate".to_string(),
        "Total Matches".to_string(),
    ]];

    let mut loss_rows = vec![vec![
        "Category".to_string(),
        "Athlete".to_string(),
        "Country".to_string(),
        "Lost To".to_string(),
        "Winner Country".to_string(),
        "Score".to_string(),
        "Event".to_string(),
        "Round".to_string(),
    ]];

    for group in &report.categories {
        for (rank, athlete) in group.athletes.iter().enumerate() {
            athlete_rows.push(vec![
                group.category.clone(),
                (rank + 1).to_string(),
                athlete.name.clone(),
                athlete.country.clone(),
                athlete.wins.to_string(),
                athlete.losses.to_string(),
                athlete.win_rate.clone(),
                athlete.total_matches.to_string(),
            ]);

            for loss in &athlete.loss_details {
                loss_rows.push(vec![
                    group.category.clone(),
                    athlete.name.clone(),
                    athlete.country.clone(),
                    loss.lost_to.clone(),
                    loss.winner_country.clone(),
                    loss.score.clone().unwrap_or_default(),
                    loss.event.clone().unwrap_or_default(),
                    loss.round.clone().unwrap_or_default(),
                ]);
            }
        }
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Athletes")?;
        write_rows(sheet, &athlete_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Losses")?;
        write_rows(sheet, &loss_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        categories: report.categories.len(),
        athletes: athlete_rows.len().saturating_sub(1),
        loss_rows: loss_rows.len().saturating_sub(1),
    })
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
