//! Tables for the exploration stage

use std::collections::BTreeMap;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{FareBounds, MissingStat, NumericSummary, SurvivalRate};

fn section(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|n| Cell::new(n).add_attribute(Attribute::Bold))
        .collect()
}

pub fn missing_table(stats: &[MissingStat]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Column", "Missing", "Ratio"]));
    for stat in stats.iter().filter(|s| s.missing > 0) {
        table.add_row(vec![
            Cell::new(&stat.column),
            Cell::new(stat.missing).fg(Color::Yellow),
            Cell::new(format!("{:.1}%", stat.ratio * 100.0)),
        ]);
    }
    table
}

pub fn display_missing(stats: &[MissingStat]) {
    section("🕳️ ", "MISSING VALUES");
    if stats.iter().all(|s| s.missing == 0) {
        println!("      {}", style("No missing values").green());
        return;
    }
    print_indented(&missing_table(stats));
}

/// One row per group: its levels under `columns`, count and survival rate
pub fn survival_table(columns: &[&str], rates: &[SurvivalRate]) -> Table {
    let mut names: Vec<&str> = columns.to_vec();
    names.extend(["Passengers", "Survival"]);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&names));
    for rate in rates {
        let mut row: Vec<Cell> = rate.levels.iter().map(Cell::new).collect();
        let color = if rate.rate() >= 0.5 {
            Color::Green
        } else {
            Color::Red
        };
        row.push(Cell::new(rate.count));
        row.push(Cell::new(format!("{:.1}%", rate.rate() * 100.0)).fg(color));
        table.add_row(row);
    }
    table
}

pub fn display_survival(title: &str, columns: &[&str], rates: &[SurvivalRate]) {
    section("📊", title);
    print_indented(&survival_table(columns, rates));
}

pub fn display_numeric_summaries(summaries: &[NumericSummary]) {
    section("🔢", "NUMERIC COLUMNS");
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Column", "Count", "Missing", "Mean", "Min", "Median", "Max"]));
    for s in summaries {
        table.add_row(vec![
            Cell::new(&s.column),
            Cell::new(s.count),
            Cell::new(s.missing),
            Cell::new(format!("{:.2}", s.mean)),
            Cell::new(format!("{:.2}", s.min)),
            Cell::new(format!("{:.2}", s.median)),
            Cell::new(format!("{:.2}", s.max)),
        ]);
    }
    print_indented(&table);
}

pub fn display_fare_bounds(bounds: &BTreeMap<u8, FareBounds>) {
    section("🎫", "FARE BY CLASS");
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Class", "Min", "Median", "Max"]));
    for (class, b) in bounds {
        table.add_row(vec![
            Cell::new(class),
            Cell::new(format!("{:.2}", b.min)),
            Cell::new(format!("{:.2}", b.median)),
            Cell::new(format!("{:.2}", b.max)),
        ]);
    }
    print_indented(&table);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_survival_table_has_level_columns() {
        let rates = vec![SurvivalRate {
            levels: vec!["1".to_string(), "female".to_string()],
            count: 4,
            survivors: 3,
        }];
        let rendered = survival_table(&["Pclass", "Sex"], &rates).to_string();
        assert!(rendered.contains("Pclass"));
        assert!(rendered.contains("female"));
        assert!(rendered.contains("75.0%"));
    }

    #[test]
    fn test_missing_table_skips_complete_columns() {
        let stats = vec![
            MissingStat {
                column: "Cabin".to_string(),
                missing: 687,
                ratio: 0.771,
            },
            MissingStat {
                column: "Fare".to_string(),
                missing: 0,
                ratio: 0.0,
            },
        ];
        let rendered = missing_table(&stats).to_string();
        assert!(rendered.contains("Cabin"));
        assert!(!rendered.contains("Fare"));
    }
}
