use crate::error::Result;
use crate::models::{Area, VhiRecord, YearField};
use crate::utils::constants::{RAW_DATA_FIELDS, RAW_HEADER_LINES, RAW_MAX_FIELDS};
use crate::utils::filename::extract_region_id;
use std::path::Path;
use tracing::{debug, warn};

/// Per-source tallies of what the parser kept and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub kept: usize,
    pub sentinel: usize,
    pub malformed: usize,
}

enum LineOutcome {
    Record(VhiRecord),
    Sentinel,
    Malformed,
}

/// Parser for the provider's per-region weekly export.
pub struct VhiReader {
    skip_headers: bool,
}

impl VhiReader {
    pub fn new() -> Self {
        Self { skip_headers: true }
    }

    pub fn with_skip_headers(skip_headers: bool) -> Self {
        Self { skip_headers }
    }

    /// Read a region file (extracts the region ID from the filename)
    pub fn read_region(&self, path: &Path) -> Result<Vec<VhiRecord>> {
        let region_id = extract_region_id(path)?;
        self.read_region_with_id(path, region_id)
    }

    /// Read a region file with an explicit region ID
    pub fn read_region_with_id(&self, path: &Path, region_id: u32) -> Result<Vec<VhiRecord>> {
        let bytes = std::fs::read(path)?;

        let (content, _, had_errors) = encoding_rs::UTF_8.decode(&bytes);
        if had_errors {
            warn!(
                path = %path.display(),
                "source contains invalid UTF-8, affected bytes were replaced"
            );
        }

        let (records, stats) = self.parse_region(&content, region_id);
        debug!(
            region_id,
            kept = stats.kept,
            sentinel = stats.sentinel,
            malformed = stats.malformed,
            path = %path.display(),
            "parsed region source"
        );
        Ok(records)
    }

    /// Parse the full text of one region's export
    pub fn parse_region(&self, content: &str, region_id: u32) -> (Vec<VhiRecord>, ParseStats) {
        let mut records = Vec::new();
        let mut stats = ParseStats::default();

        let skip = if self.skip_headers { RAW_HEADER_LINES } else { 0 };

        for line in content.lines().skip(skip) {
            if line.trim().is_empty() {
                continue;
            }

            match self.parse_line(line, region_id) {
                LineOutcome::Record(record) => {
                    stats.kept += 1;
                    records.push(record);
                }
                LineOutcome::Sentinel => stats.sentinel += 1,
                LineOutcome::Malformed => stats.malformed += 1,
            }
        }

        (records, stats)
    }

    /// Parse a single data line. A row is either fully parsed or rejected.
    fn parse_line(&self, line: &str, region_id: u32) -> LineOutcome {
        // Expected format: year, week, SMN, SMT, VCI, TCI, VHI[, trailing]
        let parts: Vec<&str> = line.split(',').map(|s| s.trim()).collect();

        if !(RAW_DATA_FIELDS..=RAW_MAX_FIELDS).contains(&parts.len()) {
            return LineOutcome::Malformed;
        }

        // The year is repaired later by the normalizer, so noisy text is kept as-is
        let year = YearField::from_text(parts[0]);

        let week = match parse_week(parts[1]) {
            Some(week) => week,
            None => return LineOutcome::Malformed,
        };

        let mut values = [0.0f64; 5];
        for (slot, text) in values.iter_mut().zip(&parts[2..RAW_DATA_FIELDS]) {
            match text.parse::<f64>() {
                Ok(value) if value.is_finite() => *slot = value,
                _ => return LineOutcome::Malformed,
            }
        }
        let [smn, smt, vci, tci, vhi] = values;

        let record = VhiRecord {
            year,
            week,
            smn,
            smt,
            vci,
            tci,
            vhi,
            area: Area::Id(region_id),
        };

        if record.is_sentinel() {
            LineOutcome::Sentinel
        } else {
            LineOutcome::Record(record)
        }
    }
}

impl Default for VhiReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a week number. Whole-valued floats such as `1.0` are accepted.
pub(crate) fn parse_week(text: &str) -> Option<u32> {
    let value = text.trim().parse::<f64>().ok()?;
    let whole = value.is_finite() && value >= 0.0 && value.fract() == 0.0;
    (whole && value <= f64::from(u32::MAX)).then(|| value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    const SAMPLE: &str = "<tt><pre>1982-2024 Province= 5: Dnipropetrovska, type=Mean\n\
        year,week, SMN,SMT,VCI,TCI,VHI<br>\n\
        1982,  1,  0.053,260.31, 51.11, 48.78, 49.95,\n\
        1982,  2,  0.054,262.29, 46.76, 44.66, 45.71,\n\
        1982,  3, -1.000, -1.00, -1.00, -1.00, -1.00,\n\
        1982,  4,  0.057,264.09, 50.13, 36.43, 43.28\n\
        </pre></tt>\n";

    #[test]
    fn test_parse_line_with_trailing_field() {
        let reader = VhiReader::new();
        let record = match reader.parse_line("1982,  1,  0.053,260.31, 51.11, 48.78, 49.95,", 5) {
            LineOutcome::Record(record) => record,
            _ => panic!("expected a record"),
        };

        assert_eq!(record.year, YearField::Parsed(1982));
        assert_eq!(record.week, 1);
        assert_eq!(record.smn, 0.053);
        assert_eq!(record.smt, 260.31);
        assert_eq!(record.vci, 51.11);
        assert_eq!(record.tci, 48.78);
        assert_eq!(record.vhi, 49.95);
        assert_eq!(record.area, Area::Id(5));
    }

    #[test]
    fn test_parse_region_filters_sentinel_and_markup() {
        let reader = VhiReader::new();
        let (records, stats) = reader.parse_region(SAMPLE, 5);

        assert_eq!(records.len(), 3);
        assert_eq!(
            stats,
            ParseStats {
                kept: 3,
                sentinel: 1,
                malformed: 2
            }
        );
        assert!(records.iter().all(|r| !r.is_sentinel()));
        assert!(records.iter().all(|r| r.area == Area::Id(5)));
        assert_eq!(
            records.iter().map(|r| r.week).collect::<Vec<_>>(),
            vec![1, 2, 4]
        );
    }

    #[test]
    fn test_malformed_numeric_field_drops_only_that_row() {
        let reader = VhiReader::new();
        let content = "title\n\
            2000, 10, 0.1, 270.0, 40.0, 30.0, 35.0,\n\
            2000, 11, 0.1, 270.0, abc, 30.0, 35.0,\n\
            2000, 12, 0.1, 270.0, 40.0, 30.0\n\
            2000, 13, 0.1, 270.0, 40.0, 30.0, 36.0, x, y\n\
            2000, 14, 0.1, 270.0, 40.0, 30.0, 37.0,\n";
        let (records, stats) = reader.parse_region(content, 1);

        assert_eq!(
            records.iter().map(|r| r.week).collect::<Vec<_>>(),
            vec![10, 14]
        );
        assert_eq!(stats.malformed, 3);
    }

    #[test]
    fn test_float_week_is_accepted() {
        let reader = VhiReader::new();
        let content = "title\n\
            1982, 1.0, 0.05, 260.0, 40.0, 35.0, 30.0,\n\
            1982, 2.5, 0.05, 260.0, 40.0, 35.0, 31.0,\n\
            1982, -3, 0.05, 260.0, 40.0, 35.0, 32.0,\n\
            1982, NaN, 0.05, 260.0, 40.0, 35.0, 33.0,\n";
        let (records, stats) = reader.parse_region(content, 1);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].week, 1);
        assert_eq!(stats.malformed, 3);
    }

    #[test]
    fn test_parse_week() {
        assert_eq!(parse_week("7"), Some(7));
        assert_eq!(parse_week(" 52.0 "), Some(52));
        assert_eq!(parse_week("0"), Some(0));
        assert_eq!(parse_week("1.5"), None);
        assert_eq!(parse_week("inf"), None);
        assert_eq!(parse_week("week"), None);
    }

    #[test]
    fn test_noisy_year_is_kept_for_normalizer() {
        let reader = VhiReader::new();
        let (records, _) = reader.parse_region("title\n<tt><pre>1982, 1, 0.1, 260.0, 50.0, 40.0, 45.0,\n", 2);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].year, YearField::Raw("<tt><pre>1982".to_string()));
    }

    #[test]
    fn test_header_skip_can_be_disabled() {
        let reader = VhiReader::with_skip_headers(false);
        let (records, _) = reader.parse_region("1990, 1, 0.1, 260.0, 50.0, 40.0, 45.0\n", 4);
        assert_eq!(records.len(), 1);

        let reader = VhiReader::new();
        let (records, _) = reader.parse_region("1990, 1, 0.1, 260.0, 50.0, 40.0, 45.0\n", 4);
        assert!(records.is_empty());
    }

    #[test]
    fn test_read_region_file() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("vhi_5_2024-03-01_09-05-07.csv");
        let mut file = File::create(&path)?;
        file.write_all(SAMPLE.as_bytes())?;

        let reader = VhiReader::new();
        let records = reader.read_region(&path)?;

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].area, Area::Id(5));
        assert_eq!(records[2].vhi, 43.28);
        Ok(())
    }
}
