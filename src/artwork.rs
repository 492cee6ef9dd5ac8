use serde::{Deserialize, Serialize};
use std::fmt;

/// Positional identity of a record inside the loaded collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtworkId(pub usize);

impl fmt::Display for ArtworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkRecord {
    pub id: ArtworkId,
    pub title: String,
    pub artist: String,
    pub year_range: Option<String>,
    pub image_reference: String,
}

impl ArtworkRecord {
    pub fn new(
        id: usize,
        title: impl Into<String>,
        artist: impl Into<String>,
        year_range: Option<String>,
        image_reference: impl Into<String>,
    ) -> Self {
        Self {
            id: ArtworkId(id),
            title: title.into(),
            artist: artist.into(),
            year_range,
            image_reference: image_reference.into(),
        }
    }

    /// Numeric year used for ordering. An 8-digit birth+death value orders by its birth year.
    pub fn sort_year(&self) -> Option<i32> {
        let raw = self.year_range.as_deref()?.trim();
        if let Some((birth, _)) = split_lifespan(raw) {
            return birth.parse().ok();
        }
        raw.parse::<i32>().ok()
    }

    /// `"1853–1890"` for lifespans, the raw text otherwise.
    pub fn formatted_years(&self) -> Option<String> {
        let raw = self.year_range.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        match split_lifespan(raw) {
            Some((birth, death)) => Some(format!("{birth}\u{2013}{death}")),
            None => Some(raw.to_string()),
        }
    }

    pub fn artist_line(&self) -> String {
        match self.formatted_years() {
            Some(years) => format!("by {} ({years})", self.artist),
            None => format!("by {}", self.artist),
        }
    }

    pub(crate) fn matches_term(&self, lowered_term: &str) -> bool {
        self.title.to_lowercase().contains(lowered_term) || self.artist.to_lowercase().contains(lowered_term)
    }
}

fn split_lifespan(raw: &str) -> Option<(&str, &str)> {
    if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
        Some(raw.split_at(4))
    } else {
        None
    }
}

/// Text handed to the renderer when an item gains focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub id: ArtworkId,
    pub title: String,
    pub artist_line: String,
    pub years: Option<String>,
    pub image_reference: String,
}

impl From<&ArtworkRecord> for ItemView {
    fn from(record: &ArtworkRecord) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            artist_line: record.artist_line(),
            years: record.formatted_years(),
            image_reference: record.image_reference.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: Option<&str>) -> ArtworkRecord {
        ArtworkRecord::new(0, "Starry Night", "Van Gogh", year.map(str::to_string), "img.jpg")
    }

    #[test]
    fn lifespan_formats_with_en_dash() {
        let rec = record(Some("18531890"));
        assert_eq!(rec.formatted_years().as_deref(), Some("1853\u{2013}1890"));
        assert_eq!(rec.artist_line(), "by Van Gogh (1853\u{2013}1890)");
        assert_eq!(rec.sort_year(), Some(1853));
    }

    #[test]
    fn free_text_years_are_shown_but_not_sortable() {
        let rec = record(Some("c. 1889"));
        assert_eq!(rec.formatted_years().as_deref(), Some("c. 1889"));
        assert_eq!(rec.sort_year(), None);
    }

    #[test]
    fn plain_and_negative_years_parse() {
        assert_eq!(record(Some(" 1889 ")).sort_year(), Some(1889));
        assert_eq!(record(Some("-350")).sort_year(), Some(-350));
    }

    #[test]
    fn missing_years_leave_bare_artist_line() {
        let rec = record(None);
        assert_eq!(rec.artist_line(), "by Van Gogh");
        assert!(record(Some("  ")).formatted_years().is_none());
    }
}
