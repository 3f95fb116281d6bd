//! Append-only price log.
//!
//! Every observed price is written to `history.csv` as `timestamp,item,price`. The log
//! is only ever appended to and re-read to compute recent averages.
use crate::{DateTime, Result};
use csv::{ReaderBuilder, WriterBuilder};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub timestamp: DateTime,
    pub item: String,
    pub price: f64,
}

#[derive(Debug, Clone)]
pub struct History {
    path: PathBuf,
}

impl History {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one observation, writing the header first if the file is new or empty.
    pub fn append(&self, record: &Record) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let is_empty = file.metadata()?.len() == 0;

        let mut writer = WriterBuilder::new()
            .has_headers(is_empty)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;

        Ok(())
    }

    /// Reads every well-formed record. A missing file reads as empty.
    pub fn records(&self) -> Result<Vec<Record>> {
        let mut reader = match ReaderBuilder::new().flexible(true).from_path(&self.path) {
            Ok(reader) => reader,
            Err(e) if is_not_found(&e) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(reader
            .deserialize::<Record>()
            .filter_map(|row| match row {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!("Skipping malformed history row: {e}");
                    None
                }
            })
            .collect())
    }

    /// Mean price of `item` over records at or after `since`
    pub fn average_since(&self, item: &str, since: DateTime) -> Result<Option<f64>> {
        let prices: Vec<f64> = self
            .records()?
            .into_iter()
            .filter(|record| record.item == item && record.timestamp >= since)
            .map(|record| record.price)
            .collect();

        if prices.is_empty() {
            return Ok(None);
        }
        Ok(Some(prices.iter().sum::<f64>() / prices.len() as f64))
    }
}

fn is_not_found(e: &csv::Error) -> bool {
    matches!(e.kind(), csv::ErrorKind::Io(io) if io.kind() == ErrorKind::NotFound)
}
