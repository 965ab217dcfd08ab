//! Survey row layout and the ephemeral input row type.

use serde::{Deserialize, Serialize};

/// Named columns of the survey export.
///
/// Every column the reconciliation logic reads is listed here with its fixed
/// position, so no code indexes rows by raw integer or header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyField {
    Name,
    TaskName,
    HoursConfirmed,
    HoursVolunteered,
    ExternalProfile,
    SurveySubmitted,
    Campus,
    IdeaPosted,
    VideoShared,
    LunchAttendees,
    IdeaVoted,
}

impl SurveyField {
    pub const ALL: [Self; 11] = [
        Self::Name,
        Self::TaskName,
        Self::HoursConfirmed,
        Self::HoursVolunteered,
        Self::ExternalProfile,
        Self::SurveySubmitted,
        Self::Campus,
        Self::IdeaPosted,
        Self::VideoShared,
        Self::LunchAttendees,
        Self::IdeaVoted,
    ];

    /// Zero-based column position in the export.
    pub const fn column(self) -> usize {
        match self {
            Self::Name => 0,
            Self::TaskName => 1,
            Self::HoursConfirmed => 2,
            Self::HoursVolunteered => 3,
            Self::ExternalProfile => 4,
            Self::SurveySubmitted => 6,
            Self::Campus => 7,
            Self::IdeaPosted => 10,
            Self::VideoShared => 11,
            Self::LunchAttendees => 13,
            Self::IdeaVoted => 14,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::TaskName => "task_name",
            Self::HoursConfirmed => "hours_confirmed",
            Self::HoursVolunteered => "hours_volunteered",
            Self::ExternalProfile => "external_profile",
            Self::SurveySubmitted => "survey_submitted",
            Self::Campus => "campus",
            Self::IdeaPosted => "idea_posted",
            Self::VideoShared => "video_shared",
            Self::LunchAttendees => "lunch_attendees",
            Self::IdeaVoted => "idea_voted",
        }
    }
}

impl std::fmt::Display for SurveyField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Versioned positional layout of a survey export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SurveySchema {
    pub version: u32,
    /// Number of columns a well-formed row carries.
    pub width: usize,
}

impl SurveySchema {
    pub const STANDARD: Self = Self {
        version: 1,
        width: 15,
    };

    /// Whether every named field fits inside this layout.
    pub fn covers(&self, field: SurveyField) -> bool {
        field.column() < self.width
    }
}

impl Default for SurveySchema {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// One data line of the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRow {
    /// Physical line in the source, 1-based.
    pub line: u64,
    pub fields: Vec<String>,
}

impl InputRow {
    pub fn new(line: u64, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Raw value of a named column, `None` when the row is too short.
    pub fn get(&self, field: SurveyField) -> Option<&str> {
        self.fields.get(field.column()).map(String::as_str)
    }

    /// Trimmed identifier, empty when absent.
    pub fn identifier(&self) -> &str {
        self.get(SurveyField::Name).map_or("", str::trim)
    }

    pub fn task_name(&self) -> &str {
        self.get(SurveyField::TaskName).map_or("", str::trim)
    }

    pub fn location(&self) -> &str {
        self.get(SurveyField::Campus).map_or("", str::trim)
    }
}
