//! Whole-dataset prediction ranking

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;
use polars::prelude::*;

/// Survival probability of one passenger
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPrediction {
    pub passenger_id: i64,
    pub probability: f64,
    pub predicted: u8,
    pub actual: Option<u8>,
}

impl RankedPrediction {
    /// Whether the prediction matches the known outcome
    pub fn correct(&self) -> Option<bool> {
        self.actual.map(|a| a == self.predicted)
    }
}

/// Predictions ordered by survival probability, highest first
#[derive(Debug, Clone)]
pub struct PredictionRanking {
    pub model: String,
    pub entries: Vec<RankedPrediction>,
}

/// Correct and incorrect prediction counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictionAccuracy {
    pub correct: usize,
    pub incorrect: usize,
}

impl PredictionAccuracy {
    pub fn ratio(&self) -> f64 {
        let total = self.correct + self.incorrect;
        if total == 0 {
            0.0
        } else {
            self.correct as f64 / total as f64
        }
    }
}

impl PredictionRanking {
    /// Build the ranking. `actual`, when given, must align with `ids`.
    pub fn new(
        model: impl Into<String>,
        ids: &[i64],
        probabilities: &[f64],
        actual: Option<&[u8]>,
    ) -> Result<Self> {
        if ids.len() != probabilities.len() || actual.is_some_and(|a| a.len() != ids.len()) {
            anyhow::bail!(
                "Prediction length mismatch: {} ids, {} probabilities",
                ids.len(),
                probabilities.len()
            );
        }

        let mut entries: Vec<RankedPrediction> = ids
            .iter()
            .zip(probabilities)
            .enumerate()
            .map(|(i, (&passenger_id, &probability))| RankedPrediction {
                passenger_id,
                probability,
                predicted: u8::from(probability >= 0.5),
                actual: actual.map(|a| a[i]),
            })
            .collect();
        entries.sort_by(|a, b| b.probability.total_cmp(&a.probability));

        Ok(Self {
            model: model.into(),
            entries,
        })
    }

    /// `None` when no outcome is known
    pub fn accuracy(&self) -> Option<PredictionAccuracy> {
        let flags: Vec<bool> = self.entries.iter().filter_map(|e| e.correct()).collect();
        if flags.is_empty() {
            return None;
        }
        let correct = flags.iter().filter(|&&c| c).count();
        Some(PredictionAccuracy {
            correct,
            incorrect: flags.len() - correct,
        })
    }

    pub fn to_frame(&self) -> Result<DataFrame> {
        let ids: Vec<i64> = self.entries.iter().map(|e| e.passenger_id).collect();
        let chance: Vec<f64> = self
            .entries
            .iter()
            .map(|e| (e.probability * 10000.0).round() / 100.0)
            .collect();
        let predicted: Vec<i32> = self.entries.iter().map(|e| i32::from(e.predicted)).collect();
        let actual: Vec<Option<i32>> = self.entries.iter().map(|e| e.actual.map(i32::from)).collect();
        let correct: Vec<Option<bool>> = self.entries.iter().map(|e| e.correct()).collect();

        df! {
            "PassengerId" => ids,
            "SurvivalChance" => chance,
            "Predicted" => predicted,
            "Survived" => actual,
            "Correct" => correct,
        }
        .context("Failed to build prediction frame")
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut df = self.to_frame()?;
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        CsvWriter::new(&mut file)
            .finish(&mut df)
            .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        Ok(())
    }

    pub fn display(&self, top: usize) {
        println!();
        println!(
            "    {} {}",
            style("🎯").cyan(),
            style(format!("PREDICTIONS: {}", self.model)).white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("PassengerId").add_attribute(Attribute::Bold),
            Cell::new("Survival Chance").add_attribute(Attribute::Bold),
            Cell::new("Correct?").add_attribute(Attribute::Bold),
        ]);
        for entry in self.entries.iter().take(top) {
            let color = if entry.predicted == 1 {
                Color::Green
            } else {
                Color::Red
            };
            let correct = match entry.correct() {
                Some(true) => Cell::new("✔").fg(Color::Green),
                Some(false) => Cell::new("✘").fg(Color::Red),
                None => Cell::new("-"),
            };
            table.add_row(vec![
                Cell::new(entry.passenger_id),
                Cell::new(format!("{:.2} %", entry.probability * 100.0)).fg(color),
                correct,
            ]);
        }
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if self.entries.len() > top {
            println!(
                "    {}",
                style(format!("... {} more", self.entries.len() - top)).dim()
            );
        }

        if let Some(acc) = self.accuracy() {
            println!();
            println!(
                "      {} correct, {} incorrect ({})",
                style(acc.correct).green().bold(),
                style(acc.incorrect).red().bold(),
                style(format!("{:.2} %", acc.ratio() * 100.0)).yellow()
            );
        }
    }
}
