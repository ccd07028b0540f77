//! CSV Persistence Module
//!
//! Appends detector alerts to a CSV file for later review

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::info;

use crate::detector::Alert;

/// Alert record for CSV storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    pub id: String,
    pub kind: String,
    pub event: String,
    pub detail: String,
    pub value_percent: f64,
}

impl From<&Alert> for AlertRecord {
    fn from(alert: &Alert) -> Self {
        Self {
            timestamp: alert.created_at.timestamp_millis(),
            id: alert.id.to_string(),
            kind: alert.kind.to_string(),
            event: alert.event.clone(),
            detail: alert.detail.clone(),
            value_percent: alert.value_percent,
        }
    }
}

/// Append-only alert log
pub struct AlertLog {
    path: PathBuf,
    writer: RwLock<csv::Writer<fs::File>>,
}

impl AlertLog {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create alert log directory")?;
        }

        let file_has_data = fs::metadata(&path).map(|m| m.len() > 0).unwrap_or(false);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .context("Failed to open CSV file")?;

        let writer = WriterBuilder::new()
            .has_headers(!file_has_data)
            .from_writer(file);

        info!("Alert log at {}", path.display());
        Ok(Self {
            path,
            writer: RwLock::new(writer),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, alert: &Alert) -> Result<()> {
        let mut writer = self
            .writer
            .write()
            .map_err(|_| anyhow::anyhow!("Alert log writer poisoned"))?;
        writer
            .serialize(AlertRecord::from(alert))
            .context("Failed to write alert record")?;
        writer.flush().context("Failed to flush alert writer")?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Vec<AlertRecord>> {
        let file = fs::File::open(path.as_ref()).context("Failed to open alert log")?;
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);
        reader
            .deserialize()
            .collect::<std::result::Result<Vec<AlertRecord>, _>>()
            .context("Failed to parse alert log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::AlertKind;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    fn alert(event: &str) -> Alert {
        Alert {
            id: Uuid::new_v4(),
            kind: AlertKind::Arbitrage,
            event: event.to_string(),
            detail: "excellent arbitrage, 10.00% locked in".to_string(),
            value_percent: 10.0,
            created_at: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn header_written_once_across_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alerts").join("alerts.csv");

        AlertLog::open(&path).unwrap().append(&alert("g1")).unwrap();
        AlertLog::open(&path).unwrap().append(&alert("g2")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("timestamp,id,kind,event,detail,value_percent")
        );
        assert_eq!(lines.count(), 2);

        let rows = AlertLog::load(&path).unwrap();
        assert_eq!(rows[0].event, "g1");
        assert_eq!(rows[1].kind, "arbitrage");
        assert_eq!(rows[1].timestamp, 1_700_000_000_000);
    }

    #[test]
    fn empty_existing_file_gets_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alerts.csv");
        fs::write(&path, "").unwrap();

        AlertLog::open(&path).unwrap().append(&alert("g")).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("timestamp,"));
    }
}
