//! Filter/sort pipeline producing the displayed subset of the collection.

use crate::artwork::ArtworkRecord;
use crate::error::NavigatorError;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    None,
    TitleAsc,
    TitleDesc,
    ArtistAsc,
    ArtistDesc,
    YearAsc,
    YearDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::None,
        SortKey::TitleAsc,
        SortKey::TitleDesc,
        SortKey::ArtistAsc,
        SortKey::ArtistDesc,
        SortKey::YearAsc,
        SortKey::YearDesc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::None => "none",
            SortKey::TitleAsc => "title-asc",
            SortKey::TitleDesc => "title-desc",
            SortKey::ArtistAsc => "artist-asc",
            SortKey::ArtistDesc => "artist-desc",
            SortKey::YearAsc => "year-asc",
            SortKey::YearDesc => "year-desc",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = NavigatorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Ok(SortKey::None);
        }
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| NavigatorError::InvalidSortKey(value.to_string()))
    }
}

/// Runs the search filter followed by the sort. Never fails; an empty result is the caller's to report.
pub fn apply(full: &[ArtworkRecord], search_term: &str, sort_key: SortKey) -> Vec<ArtworkRecord> {
    let term = search_term.trim().to_lowercase();
    let mut displayed: Vec<ArtworkRecord> = if term.is_empty() {
        full.to_vec()
    } else {
        full.iter().filter(|record| record.matches_term(&term)).cloned().collect()
    };
    sort_records(&mut displayed, sort_key);
    displayed
}

/// Stable in-place sort. Records without a usable year trail in both year orders.
pub fn sort_records(records: &mut [ArtworkRecord], sort_key: SortKey) {
    match sort_key {
        SortKey::None => {}
        SortKey::TitleAsc => records.sort_by(|a, b| collate(&a.title, &b.title)),
        SortKey::TitleDesc => records.sort_by(|a, b| collate(&b.title, &a.title)),
        SortKey::ArtistAsc => records.sort_by(|a, b| collate(&a.artist, &b.artist)),
        SortKey::ArtistDesc => records.sort_by(|a, b| collate(&b.artist, &a.artist)),
        SortKey::YearAsc => records.sort_by(|a, b| compare_years(a.sort_year(), b.sort_year(), false)),
        SortKey::YearDesc => records.sort_by(|a, b| compare_years(a.sort_year(), b.sort_year(), true)),
    }
}

fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

fn compare_years(a: Option<i32>, b: Option<i32>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: usize, title: &str, artist: &str, year: Option<&str>) -> ArtworkRecord {
        ArtworkRecord::new(id, title, artist, year.map(str::to_string), format!("img-{id}.jpg"))
    }

    fn ids(records: &[ArtworkRecord]) -> Vec<usize> {
        records.iter().map(|r| r.id.0).collect()
    }

    fn sample() -> Vec<ArtworkRecord> {
        vec![
            rec(0, "Starry Night", "Van Gogh", Some("1889")),
            rec(1, "The Scream", "Munch", Some("1893")),
            rec(2, "untitled study", "anonymous", None),
            rec(3, "American Gothic", "Grant Wood", Some("18911942")),
            rec(4, "Sunflowers", "Van Gogh", Some("circa 1888")),
        ]
    }

    #[test]
    fn blank_term_is_identity() {
        let full = sample();
        assert_eq!(apply(&full, "", SortKey::None), full);
        assert_eq!(apply(&full, "   ", SortKey::None), full);
    }

    #[test]
    fn term_matches_title_or_artist_case_insensitively() {
        let full = sample();
        assert_eq!(ids(&apply(&full, "van", SortKey::None)), vec![0, 4]);
        assert_eq!(ids(&apply(&full, "SCREAM", SortKey::None)), vec![1]);
        assert_eq!(ids(&apply(&full, "  gothic ", SortKey::None)), vec![3]);
        assert!(apply(&full, "rembrandt", SortKey::None).is_empty());
    }

    #[test]
    fn title_sorts_fold_case() {
        let full = sample();
        assert_eq!(ids(&apply(&full, "", SortKey::TitleAsc)), vec![3, 0, 4, 1, 2]);
        assert_eq!(ids(&apply(&full, "", SortKey::TitleDesc)), vec![2, 1, 4, 0, 3]);
    }

    #[test]
    fn artist_sort_is_stable_for_equal_names() {
        let full = sample();
        assert_eq!(ids(&apply(&full, "", SortKey::ArtistAsc)), vec![2, 3, 1, 0, 4]);
        assert_eq!(ids(&apply(&full, "", SortKey::ArtistDesc)), vec![0, 4, 1, 3, 2]);
    }

    #[test]
    fn unusable_years_trail_in_both_directions() {
        let full = sample();
        assert_eq!(ids(&apply(&full, "", SortKey::YearAsc)), vec![0, 3, 1, 2, 4]);
        assert_eq!(ids(&apply(&full, "", SortKey::YearDesc)), vec![1, 3, 0, 2, 4]);
    }

    #[test]
    fn sort_keys_parse_from_form_values() {
        assert_eq!("year-desc".parse::<SortKey>().unwrap(), SortKey::YearDesc);
        assert_eq!("".parse::<SortKey>().unwrap(), SortKey::None);
        assert!(matches!("newest".parse::<SortKey>(), Err(NavigatorError::InvalidSortKey(_))));
        for key in SortKey::ALL {
            assert_eq!(key.to_string().parse::<SortKey>().unwrap(), key);
        }
    }
}
