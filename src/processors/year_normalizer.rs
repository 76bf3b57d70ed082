use crate::models::{VhiRecord, YearField};
use once_cell::sync::Lazy;
use regex::Regex;

static FOUR_DIGIT_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").expect("valid regex"));

/// Pull the first run of four digits out of a year field.
pub fn extract_year(field: &YearField) -> Option<i32> {
    let text = field.to_string();
    FOUR_DIGIT_YEAR
        .find(&text)
        .and_then(|m| m.as_str().parse::<i32>().ok())
}

/// Return a copy of the table with every year repaired to an integer.
///
/// Rows without a recognizable four-digit year are dropped. The input is left
/// untouched and normalizing an already normalized table yields the same table.
pub fn normalize_years(records: &[VhiRecord]) -> Vec<VhiRecord> {
    records
        .iter()
        .filter_map(|record| {
            extract_year(&record.year).map(|year| VhiRecord {
                year: YearField::Parsed(year),
                ..record.clone()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(year: YearField, week: u32) -> VhiRecord {
        VhiRecord {
            year,
            week,
            smn: 0.05,
            smt: 260.0,
            vci: 40.0,
            tci: 35.0,
            vhi: 37.5,
            area: 1u32.into(),
        }
    }

    fn raw(text: &str) -> YearField {
        YearField::Raw(text.to_string())
    }

    #[test]
    fn test_extract_year_variants() {
        assert_eq!(extract_year(&raw("2001.0")), Some(2001));
        assert_eq!(extract_year(&raw("Year:2001")), Some(2001));
        assert_eq!(extract_year(&raw("<tt><pre>1982")), Some(1982));
        assert_eq!(extract_year(&raw("N/A")), None);
        assert_eq!(extract_year(&raw("198")), None);
        assert_eq!(extract_year(&YearField::Parsed(1995)), Some(1995));
        assert_eq!(extract_year(&YearField::Parsed(95)), None);
    }

    #[test]
    fn test_normalize_repairs_and_drops() {
        let table = vec![
            record(raw("2001.0"), 1),
            record(raw("N/A"), 2),
            record(raw("Year:2001"), 3),
            record(YearField::Parsed(2002), 4),
        ];

        let normalized = normalize_years(&table);

        assert_eq!(
            normalized
                .iter()
                .map(|r| (r.year.clone(), r.week))
                .collect::<Vec<_>>(),
            vec![
                (YearField::Parsed(2001), 1),
                (YearField::Parsed(2001), 3),
                (YearField::Parsed(2002), 4),
            ]
        );
        // input untouched
        assert_eq!(table[0].year, raw("2001.0"));
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let table = vec![
            record(raw(" 1999 "), 1),
            record(raw("bad"), 2),
            record(raw("20011"), 3),
            record(YearField::Parsed(2024), 4),
        ];

        let once = normalize_years(&table);
        let twice = normalize_years(&once);

        assert_eq!(once, twice);
        assert!(once.iter().all(|r| r.year_value().is_some()));
    }
}
