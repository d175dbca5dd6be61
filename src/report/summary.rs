//! Evaluation summary and hold-out report tables

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::model::{HoldoutEvaluation, SweepOutcome};

/// Cross-validation ranking of every model, plus the ones that failed
#[derive(Debug)]
pub struct EvaluationSummary<'a> {
    pub outcome: &'a SweepOutcome,
    pub folds: usize,
    pub seed: u64,
}

impl<'a> EvaluationSummary<'a> {
    pub fn new(outcome: &'a SweepOutcome, folds: usize, seed: u64) -> Self {
        Self {
            outcome,
            folds,
            seed,
        }
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Model").add_attribute(Attribute::Bold),
            Cell::new("Balanced Acc.").add_attribute(Attribute::Bold),
            Cell::new("ROC AUC").add_attribute(Attribute::Bold),
            Cell::new("F1").add_attribute(Attribute::Bold),
        ]);

        for (rank, scores) in self.outcome.ranked.iter().enumerate() {
            let name = if rank == 0 {
                Cell::new(&scores.model)
                    .fg(Color::Green)
                    .add_attribute(Attribute::Bold)
            } else {
                Cell::new(&scores.model)
            };
            table.add_row(vec![
                Cell::new(rank + 1),
                name,
                score_cell(scores.balanced_accuracy),
                score_cell(scores.roc_auc),
                score_cell(scores.f1),
            ]);
        }
        table
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("MODEL RANKING").white().bold()
        );
        println!(
            "    {}",
            style(format!(
                "{}-fold stratified cross-validation, seed {}",
                self.folds, self.seed
            ))
            .dim()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        for line in self.to_table().to_string().lines() {
            println!("    {}", line);
        }

        if !self.outcome.failures.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Failed Models").red(),
                style(format!("({})", self.outcome.failures.len())).dim()
            );
            for failure in &self.outcome.failures {
                println!(
                    "        {} {} {}",
                    style("•").dim(),
                    failure.model,
                    style(&failure.reason).dim()
                );
            }
        }
    }
}

fn score_cell(value: f64) -> Cell {
    let color = if value >= 0.8 {
        Color::Green
    } else if value >= 0.7 {
        Color::Yellow
    } else {
        Color::Red
    };
    Cell::new(format!("{:.4}", value))
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

/// Confusion matrix and per-class report of the hold-out evaluation
#[derive(Debug)]
pub struct HoldoutReport<'a> {
    pub evaluation: &'a HoldoutEvaluation,
}

impl<'a> HoldoutReport<'a> {
    pub fn new(evaluation: &'a HoldoutEvaluation) -> Self {
        Self { evaluation }
    }

    pub fn confusion_table(&self) -> Table {
        let m = &self.evaluation.confusion;
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Actual \\ Predicted").add_attribute(Attribute::Bold),
            Cell::new("Died").add_attribute(Attribute::Bold),
            Cell::new("Survived").add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("Died"),
            Cell::new(m.true_negative).fg(Color::Green),
            Cell::new(m.false_positive).fg(Color::Red),
        ]);
        table.add_row(vec![
            Cell::new("Survived"),
            Cell::new(m.false_negative).fg(Color::Red),
            Cell::new(m.true_positive).fg(Color::Green),
        ]);
        table
    }

    pub fn class_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Class").add_attribute(Attribute::Bold),
            Cell::new("Precision").add_attribute(Attribute::Bold),
            Cell::new("Recall").add_attribute(Attribute::Bold),
            Cell::new("F1").add_attribute(Attribute::Bold),
            Cell::new("Support").add_attribute(Attribute::Bold),
        ]);
        for class in &self.evaluation.report {
            table.add_row(vec![
                Cell::new(class.label),
                Cell::new(format!("{:.2}", class.precision)),
                Cell::new(format!("{:.2}", class.recall)),
                Cell::new(format!("{:.2}", class.f1)),
                Cell::new(class.support),
            ]);
        }
        table
    }

    pub fn display(&self) {
        let eval = self.evaluation;
        println!();
        println!(
            "    {} {}",
            style("🎯").cyan(),
            style(format!("HOLD-OUT EVALUATION: {}", eval.model))
                .white()
                .bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!(
            "      Balanced accuracy: {}",
            style(format!("{:.4}", eval.balanced_accuracy)).yellow().bold()
        );
        match eval.roc_auc {
            Some(auc) => println!("      ROC AUC:           {}", style(format!("{:.4}", auc)).yellow()),
            None => println!("      ROC AUC:           {}", style("undefined (one class)").dim()),
        }
        println!();

        for line in self.confusion_table().to_string().lines() {
            println!("    {}", line);
        }
        println!();
        for line in self.class_table().to_string().lines() {
            println!("    {}", line);
        }
    }
}
