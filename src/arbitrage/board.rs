//! Outcome x sportsbook price grid and best-line arbitrage search.
//!
//! CSV layout: header `outcome,<book>,<book>,...`, one row per outcome.
//! Empty cells mean the book does not quote that outcome. American prices
//! may carry a leading `+`.

use anyhow::{bail, Context};
use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::analysis::{analyze_arbitrage, ArbitrageAnalysis};
use crate::error::{ensure_outcome_count, OddsError, Result};
use crate::odds::american_to_decimal;
use crate::types::Outcome;

/// Stake used when a best-line search reports its opportunity.
pub const DEFAULT_ANALYSIS_STAKE: f64 = 1_000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OddsBoard {
    pub outcomes: Vec<String>,
    pub sportsbooks: Vec<String>,
    /// `matrix[outcome][sportsbook]`, `None` where the book has no price
    pub matrix: Vec<Vec<Option<i32>>>,
}

impl OddsBoard {
    pub fn new(
        outcomes: Vec<String>,
        sportsbooks: Vec<String>,
        matrix: Vec<Vec<Option<i32>>>,
    ) -> Result<Self> {
        if matrix.len() != outcomes.len() {
            return Err(OddsError::DimensionMismatch {
                what: "odds matrix rows",
                expected: outcomes.len(),
                actual: matrix.len(),
            });
        }
        for row in &matrix {
            if row.len() != sportsbooks.len() {
                return Err(OddsError::DimensionMismatch {
                    what: "odds matrix columns",
                    expected: sportsbooks.len(),
                    actual: row.len(),
                });
            }
        }
        Ok(Self {
            outcomes,
            sportsbooks,
            matrix,
        })
    }

    /// Board where every book quotes every outcome.
    pub fn from_complete(
        matrix: &[Vec<i32>],
        outcome_names: &[String],
        sportsbook_names: &[String],
    ) -> Result<Self> {
        Self::new(
            outcome_names.to_vec(),
            sportsbook_names.to_vec(),
            matrix
                .iter()
                .map(|row| row.iter().copied().map(Some).collect())
                .collect(),
        )
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open odds board {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("Invalid odds board {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> anyhow::Result<Self> {
        let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = reader.headers().context("Missing CSV header")?.clone();
        if headers.len() < 2 {
            bail!("Header needs an outcome column and at least one sportsbook");
        }
        let sportsbooks: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

        let mut outcomes = Vec::new();
        let mut matrix = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.with_context(|| format!("Unreadable row {}", line + 1))?;
            let (outcome, prices) = parse_row(&record)
                .with_context(|| format!("Bad row {}", line + 1))?;
            outcomes.push(outcome);
            matrix.push(prices);
        }

        Ok(Self::new(outcomes, sportsbooks, matrix)?)
    }

    /// Best-priced quote per outcome, highest decimal odds wins.
    pub fn best_lines(&self) -> Result<Vec<Outcome>> {
        self.outcomes
            .iter()
            .zip(&self.matrix)
            .map(|(name, row)| -> Result<Outcome> {
                let mut best: Option<(f64, usize, i32)> = None;
                for (col, cell) in row.iter().enumerate() {
                    let Some(american) = *cell else { continue };
                    let decimal = american_to_decimal(american)?;
                    if best.map_or(true, |(d, _, _)| decimal > d) {
                        best = Some((decimal, col, american));
                    }
                }
                let (decimal, col, american) = best.ok_or(OddsError::DimensionMismatch {
                    what: "quotes for an outcome",
                    expected: 1,
                    actual: 0,
                })?;
                Ok(Outcome::new(name.clone(), self.sportsbooks[col].clone(), american)
                    .with_decimal(decimal))
            })
            .collect()
    }

    /// Analyse the best-line combination at `total_stake`; `None` when the
    /// best prices still do not form an arbitrage.
    pub fn best_arbitrage(&self, total_stake: f64) -> Result<Option<ArbitrageAnalysis>> {
        ensure_outcome_count(self.outcomes.len())?;
        let lines = self.best_lines()?;
        let analysis = analyze_arbitrage(&lines, total_stake)?;
        Ok(analysis.is_arbitrage().then_some(analysis))
    }
}

fn parse_row(record: &StringRecord) -> anyhow::Result<(String, Vec<Option<i32>>)> {
    let mut cells = record.iter();
    let outcome = match cells.next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => bail!("Missing outcome name"),
    };
    let prices = cells
        .map(|cell| {
            if cell.is_empty() {
                return Ok(None);
            }
            cell.trim_start_matches('+')
                .parse::<i32>()
                .map(Some)
                .with_context(|| format!("Not an American price: {cell:?}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok((outcome, prices))
}

/// Picks the best sportsbook per outcome and analyses the resulting
/// cross-book set at `DEFAULT_ANALYSIS_STAKE`.
pub fn find_best_arbitrage(
    odds_matrix: &[Vec<i32>],
    outcome_names: &[String],
    sportsbook_names: &[String],
) -> Result<Option<ArbitrageAnalysis>> {
    OddsBoard::from_complete(odds_matrix, outcome_names, sportsbook_names)?
        .best_arbitrage(DEFAULT_ANALYSIS_STAKE)
}
