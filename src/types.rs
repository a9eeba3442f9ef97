use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Raw meeting data as returned from an agency API
pub type RawRecord = serde_json::Value;

/// Coarse category of the governing body holding a meeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "Advisory Committee")]
    AdvisoryCommittee,
    #[serde(rename = "Board")]
    Board,
    #[serde(rename = "City Council")]
    CityCouncil,
    #[serde(rename = "Commission")]
    Commission,
    #[serde(rename = "Committee")]
    Committee,
    #[serde(rename = "Forum")]
    Forum,
    #[serde(rename = "Police Beat")]
    PoliceBeat,
    #[serde(rename = "Not classified")]
    NotClassified,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::AdvisoryCommittee => "Advisory Committee",
            Classification::Board => "Board",
            Classification::CityCouncil => "City Council",
            Classification::Commission => "Commission",
            Classification::Committee => "Committee",
            Classification::Forum => "Forum",
            Classification::PoliceBeat => "Police Beat",
            Classification::NotClassified => "Not classified",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Cancelled,
    Tentative,
    Confirmed,
    Passed,
}

impl std::fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            MeetingStatus::Cancelled => "cancelled",
            MeetingStatus::Tentative => "tentative",
            MeetingStatus::Confirmed => "confirmed",
            MeetingStatus::Passed => "passed",
        };
        write!(f, "{value}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub title: String,
}

/// Canonical meeting record handed to downstream indexing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: String,
    pub title: String,
    pub description: String,
    pub classification: Classification,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub all_day: bool,
    pub time_notes: String,
    pub location: Location,
    pub links: Vec<Link>,
    pub source: String,
    pub status: MeetingStatus,
}

/// Result of a heuristic extraction, remembering whether the heuristic
/// matched or the default branch was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted<T> {
    Matched(T),
    Fallback(T),
}

impl<T> Extracted<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Extracted::Fallback(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Extracted::Matched(v) | Extracted::Fallback(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Extracted::Matched(v) | Extracted::Fallback(v) => v,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Extracted<U> {
        match self {
            Extracted::Matched(v) => Extracted::Matched(f(v)),
            Extracted::Fallback(v) => Extracted::Fallback(f(v)),
        }
    }
}

/// What an adapter does with a record whose start date cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartPolicy {
    /// Drop the record from the batch
    Skip,
    /// Emit the record with no start time
    Null,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_serializes_to_display_name() {
        let json = serde_json::to_string(&Classification::NotClassified).unwrap();
        assert_eq!(json, "\"Not classified\"");
        assert_eq!(Classification::Commission.to_string(), "Commission");
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&MeetingStatus::Passed).unwrap();
        assert_eq!(json, "\"passed\"");
    }

    #[test]
    fn test_extracted_tracks_branch() {
        let matched = Extracted::Matched("a".to_string());
        let fallback = Extracted::Fallback("b".to_string()).map(|s| s.len());
        assert!(!matched.is_fallback());
        assert!(fallback.is_fallback());
        assert_eq!(fallback.into_inner(), 1);
        assert_eq!(matched.value(), "a");
    }
}
