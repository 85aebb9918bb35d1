//! Reckon CLI - formula evaluation harness
//!
//! Each shell argument is one formula token, so the shell does the
//! tokenizing: `reckon eval 3 + 4 '*' 2`. Use `--` ahead of tokens that
//! begin with a dash (`reckon eval -- -5 + 3`). Cells are seeded with
//! repeated `--cell` options before the formula runs.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use reckon_core::{CellError, CellLabel, Sheet};
use reckon_formula::{classify_formula, Evaluator};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "reckon")]
#[command(author, version, about = "Spreadsheet formula evaluation tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a tokenized formula and print the outcome
    Eval {
        /// Formula tokens, one per argument (quote `*` to keep the shell out)
        tokens: Vec<String>,

        /// Seed a cell first (repeatable): A1=5, B2=#DIV/0!, C3=
        #[arg(short, long = "cell", value_name = "LABEL=VALUE")]
        cells: Vec<String>,

        /// Emit the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the postfix form of a tokenized formula
    Postfix {
        /// Formula tokens, one per argument
        tokens: Vec<String>,

        /// Seed a cell first (repeatable): A1=5, B2=#DIV/0!, C3=
        #[arg(short, long = "cell", value_name = "LABEL=VALUE")]
        cells: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Eval {
            tokens,
            cells,
            json,
        } => evaluate_tokens(&tokens, &cells, json),
        Commands::Postfix { tokens, cells } => show_postfix(&tokens, &cells),
    }
}

/// Outcome shape for `--json` output
#[derive(Serialize)]
struct OutcomeReport {
    value: Option<f64>,
    error: Option<String>,
}

fn evaluate_tokens(tokens: &[String], seeds: &[String], json: bool) -> Result<()> {
    let sheet = build_sheet(seeds)?;
    let formula = classify_formula(tokens).context("Failed to classify formula tokens")?;
    let outcome = Evaluator::new(&sheet).evaluate(&formula);

    if json {
        let report = OutcomeReport {
            value: outcome.value(),
            error: outcome.error().map(|e| e.to_string()),
        };
        let encoded = serde_json::to_string(&report).context("Failed to encode outcome")?;
        println!("{}", encoded);
        return Ok(());
    }

    if let Some(error) = outcome.error() {
        match outcome.value() {
            Some(value) => println!("{} ({})", error, format_number(value)),
            None => println!("{}", error),
        }
    } else if let Some(value) = outcome.value() {
        println!("{}", format_number(value));
    }

    Ok(())
}

fn show_postfix(tokens: &[String], seeds: &[String]) -> Result<()> {
    let sheet = build_sheet(seeds)?;
    let formula = classify_formula(tokens).context("Failed to classify formula tokens")?;

    match Evaluator::new(&sheet).to_postfix(&formula) {
        Ok(postfix) => {
            let rendered: Vec<String> = postfix.iter().map(|t| t.to_string()).collect();
            println!("{}", rendered.join(" "));
        }
        Err(error) => println!("{}", error),
    }

    Ok(())
}

/// Build a sheet from LABEL=VALUE seed arguments
///
/// The value side is a number (`A1=5`), an error display string
/// (`B2=#DIV/0!`), or empty for a cell holding no formula (`C3=`).
fn build_sheet(seeds: &[String]) -> Result<Sheet> {
    let mut sheet = Sheet::new();

    for seed in seeds {
        let (label, value) = seed
            .split_once('=')
            .with_context(|| format!("Invalid cell seed '{}': expected LABEL=VALUE", seed))?;
        let label = CellLabel::parse(label)
            .with_context(|| format!("Invalid cell label in seed '{}'", seed))?;

        if value.is_empty() {
            sheet.set_formula(label, Vec::new());
        } else if let Ok(number) = value.parse::<f64>() {
            sheet.set_value(label, number);
        } else if let Some(error) = CellError::from_str(value) {
            sheet.set_error(label, error);
        } else {
            bail!(
                "Invalid cell seed '{}': '{}' is neither a number nor an error string",
                seed,
                value
            );
        }
    }

    Ok(sheet)
}

/// Format a value the way cells display it: integers without a decimal point
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
