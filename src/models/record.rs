use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Area;
use crate::utils::constants::VHI_SENTINEL;

/// The `year` column as it arrives from a source: an integer when it parsed
/// cleanly, the verbatim text otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearField {
    Parsed(i32),
    Raw(String),
}

impl YearField {
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        match trimmed.parse::<i32>() {
            Ok(year) => YearField::Parsed(year),
            Err(_) => YearField::Raw(trimmed.to_string()),
        }
    }

    pub fn as_parsed(&self) -> Option<i32> {
        match self {
            YearField::Parsed(year) => Some(*year),
            YearField::Raw(_) => None,
        }
    }
}

impl fmt::Display for YearField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearField::Parsed(year) => write!(f, "{}", year),
            YearField::Raw(text) => f.write_str(text),
        }
    }
}

impl From<i32> for YearField {
    fn from(year: i32) -> Self {
        YearField::Parsed(year)
    }
}

/// One weekly observation for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VhiRecord {
    pub year: YearField,
    pub week: u32,
    pub smn: f64,
    pub smt: f64,
    pub vci: f64,
    pub tci: f64,
    pub vhi: f64,
    pub area: Area,
}

impl VhiRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        year: impl Into<YearField>,
        week: u32,
        smn: f64,
        smt: f64,
        vci: f64,
        tci: f64,
        vhi: f64,
        area: impl Into<Area>,
    ) -> Self {
        Self {
            year: year.into(),
            week,
            smn,
            smt,
            vci,
            tci,
            vhi,
            area: area.into(),
        }
    }

    /// `vhi == -1` marks a week without an observation.
    pub fn is_sentinel(&self) -> bool {
        self.vhi == VHI_SENTINEL
    }

    pub fn is_drought(&self, vhi_threshold: f64) -> bool {
        self.vhi <= vhi_threshold
    }

    pub fn year_value(&self) -> Option<i32> {
        self.year.as_parsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_field_from_text() {
        assert_eq!(YearField::from_text(" 1999 "), YearField::Parsed(1999));
        assert_eq!(
            YearField::from_text("2001.0"),
            YearField::Raw("2001.0".to_string())
        );
        assert_eq!(YearField::Raw("N/A".to_string()).as_parsed(), None);
        assert_eq!(YearField::Parsed(2020).to_string(), "2020");
    }

    #[test]
    fn test_sentinel_and_drought() {
        let missing = VhiRecord::new(2000, 1, 0.1, 260.0, 40.0, 40.0, -1.0, 3u32);
        assert!(missing.is_sentinel());

        let dry = VhiRecord::new(2000, 2, 0.1, 260.0, 10.0, 12.0, 15.0, 3u32);
        assert!(!dry.is_sentinel());
        assert!(dry.is_drought(15.0));
        assert!(!dry.is_drought(14.99));
    }

    #[test]
    fn test_record_serializes_untagged() {
        let record = VhiRecord::new(2020, 5, 0.2, 270.5, 55.0, 30.0, 42.5, "Київ");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["year"], 2020);
        assert_eq!(json["area"], "Київ");
    }
}
