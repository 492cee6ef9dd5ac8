//! Artwork data sources. The navigator reads the collection once at startup.

use crate::artwork::ArtworkRecord;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/800x1200.png?text=No+Image";

pub trait ArtworkSource {
    fn load(&mut self) -> Result<Vec<ArtworkRecord>>;
}

/// One entry of the paintings payload: `{title, artist, imageUrl, year}`.
#[derive(Debug, Deserialize)]
struct PaintingEntry {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    artist: Option<String>,
    #[serde(default, rename = "imageUrl")]
    image_url: Option<String>,
    #[serde(default)]
    year: Option<YearValue>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum YearValue {
    Number(i64),
    Float(f64),
    Text(String),
}

impl PaintingEntry {
    fn into_record(self, id: usize) -> ArtworkRecord {
        let year_range = match self.year {
            Some(YearValue::Number(year)) => Some(year.to_string()),
            Some(YearValue::Float(year)) if year.is_finite() && year.fract() == 0.0 => Some(format!("{year:.0}")),
            Some(YearValue::Float(year)) if year.is_finite() => Some(year.to_string()),
            Some(YearValue::Text(text)) if !text.trim().is_empty() => Some(text),
            _ => None,
        };
        ArtworkRecord::new(
            id,
            non_empty(self.title).unwrap_or_else(|| "Untitled".to_string()),
            non_empty(self.artist).unwrap_or_else(|| "Unknown".to_string()),
            year_range,
            non_empty(self.image_url).unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        )
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parses a paintings payload. Records receive ids in payload order.
pub fn parse_paintings(bytes: &[u8]) -> Result<Vec<ArtworkRecord>> {
    let entries: Vec<PaintingEntry> = serde_json::from_slice(bytes).context("Malformed paintings payload")?;
    Ok(entries.into_iter().enumerate().map(|(id, entry)| entry.into_record(id)).collect())
}

#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArtworkSource for JsonFileSource {
    fn load(&mut self) -> Result<Vec<ArtworkRecord>> {
        let bytes = fs::read(&self.path)
            .with_context(|| format!("Failed to read collection file {}", self.path.display()))?;
        parse_paintings(&bytes).with_context(|| format!("Failed to parse collection file {}", self.path.display()))
    }
}

/// In-memory source; also stands in for an unreachable backend when built with `failing`.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<ArtworkRecord>,
    failure: Option<String>,
}

impl StaticSource {
    pub fn new(records: Vec<ArtworkRecord>) -> Self {
        Self { records, failure: None }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self { records: Vec::new(), failure: Some(reason.into()) }
    }
}

impl ArtworkSource for StaticSource {
    fn load(&mut self) -> Result<Vec<ArtworkRecord>> {
        match &self.failure {
            Some(reason) => Err(anyhow::anyhow!("{reason}")),
            None => Ok(self.records.clone()),
        }
    }
}
