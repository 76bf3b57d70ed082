use crate::error::{ProcessingError, Result};
use crate::models::{Area, VhiRecord};
use crate::utils::constants::{
    EXPLORE_FIRST_YEAR, EXPLORE_LAST_YEAR, MAX_WEEK, MIN_WEEK, WEEKS_PER_YEAR,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use tracing::warn;
use validator::Validate;

/// The index column an exploration view reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IndexKind {
    Vci,
    Tci,
    Vhi,
}

impl IndexKind {
    pub fn value(&self, record: &VhiRecord) -> f64 {
        match self {
            IndexKind::Vci => record.vci,
            IndexKind::Tci => record.tci,
            IndexKind::Vhi => record.vhi,
        }
    }
}

impl FromStr for IndexKind {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "VCI" => Ok(IndexKind::Vci),
            "TCI" => Ok(IndexKind::Tci),
            "VHI" => Ok(IndexKind::Vhi),
            _ => Err(ProcessingError::UnknownIndex(s.to_string())),
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndexKind::Vci => "VCI",
            IndexKind::Tci => "TCI",
            IndexKind::Vhi => "VHI",
        };
        f.pad(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Resolve the two sort toggles. Requesting both cancels sorting.
    pub fn resolve(ascending: bool, descending: bool) -> Option<SortOrder> {
        match (ascending, descending) {
            (true, true) => {
                warn!("both ascending and descending sort requested, leaving rows unsorted");
                None
            }
            (true, false) => Some(SortOrder::Ascending),
            (false, true) => Some(SortOrder::Descending),
            (false, false) => None,
        }
    }
}

/// Filter selection of an exploration view. Every call carries its full selection.
#[derive(Debug, Clone, Validate)]
pub struct ExploreQuery {
    pub index: IndexKind,

    pub area: Area,

    #[validate(range(min = 1, max = 52))]
    pub week_from: u32,

    #[validate(range(min = 1, max = 52))]
    pub week_to: u32,

    #[validate(range(min = 1982, max = 2024))]
    pub year_from: i32,

    #[validate(range(min = 1982, max = 2024))]
    pub year_to: i32,

    pub sort_ascending: bool,

    pub sort_descending: bool,
}

impl ExploreQuery {
    /// Default selection: VHI, all weeks and years, no sorting.
    pub fn new(area: Area) -> Self {
        Self {
            index: IndexKind::Vhi,
            area,
            week_from: MIN_WEEK,
            week_to: MAX_WEEK,
            year_from: EXPLORE_FIRST_YEAR,
            year_to: EXPLORE_LAST_YEAR,
            sort_ascending: false,
            sort_descending: false,
        }
    }

    pub fn check(&self) -> Result<()> {
        self.validate()?;
        if self.week_from > self.week_to {
            return Err(ProcessingError::InvalidRange {
                what: "weeks".to_string(),
                from: self.week_from.into(),
                to: self.week_to.into(),
            });
        }
        if self.year_from > self.year_to {
            return Err(ProcessingError::InvalidRange {
                what: "years".to_string(),
                from: self.year_from.into(),
                to: self.year_to.into(),
            });
        }
        Ok(())
    }

    fn in_window(&self, record: &VhiRecord) -> bool {
        let year_ok = record
            .year_value()
            .map_or(false, |y| (self.year_from..=self.year_to).contains(&y));
        year_ok && (self.week_from..=self.week_to).contains(&record.week)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexRow {
    pub year: i32,
    pub week: u32,
    pub value: f64,
    pub area: Area,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    /// Fractional year, `year + week / 52`.
    pub time: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionYearMean {
    pub area: Area,
    pub year: i32,
    pub mean: f64,
}

/// Read-only views over a normalized table, as a dashboard would request them.
pub struct Explorer<'a> {
    records: &'a [VhiRecord],
}

impl<'a> Explorer<'a> {
    pub fn new(records: &'a [VhiRecord]) -> Self {
        Self { records }
    }

    /// Distinct areas, sorted; the first one is the default selection.
    pub fn areas(&self) -> Vec<Area> {
        self.records
            .iter()
            .map(|r| r.area.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rows of the selected area inside the week and year windows.
    pub fn filter_rows(&self, query: &ExploreQuery) -> Result<Vec<IndexRow>> {
        query.check()?;

        let mut rows: Vec<IndexRow> = self
            .records
            .iter()
            .filter(|r| r.area == query.area && query.in_window(r))
            .filter_map(|r| {
                Some(IndexRow {
                    year: r.year_value()?,
                    week: r.week,
                    value: query.index.value(r),
                    area: r.area.clone(),
                })
            })
            .collect();

        match SortOrder::resolve(query.sort_ascending, query.sort_descending) {
            Some(SortOrder::Ascending) => rows.sort_by(|a, b| a.value.total_cmp(&b.value)),
            Some(SortOrder::Descending) => rows.sort_by(|a, b| b.value.total_cmp(&a.value)),
            None => {}
        }

        Ok(rows)
    }

    /// Time series of the selected index for the selected area.
    pub fn series(&self, query: &ExploreQuery) -> Result<Vec<SeriesPoint>> {
        query.check()?;

        Ok(self
            .records
            .iter()
            .filter(|r| r.area == query.area && query.in_window(r))
            .filter_map(|r| {
                let year = r.year_value()?;
                Some(SeriesPoint {
                    time: f64::from(year) + f64::from(r.week) / WEEKS_PER_YEAR,
                    value: query.index.value(r),
                })
            })
            .collect())
    }

    /// Yearly mean of the selected index for every area, ordered by area then year.
    pub fn compare_regions(&self, query: &ExploreQuery) -> Result<Vec<RegionYearMean>> {
        query.check()?;

        let mut sums: BTreeMap<(Area, i32), (f64, usize)> = BTreeMap::new();
        for record in self.records.iter().filter(|r| query.in_window(r)) {
            if let Some(year) = record.year_value() {
                let entry = sums.entry((record.area.clone(), year)).or_insert((0.0, 0));
                entry.0 += query.index.value(record);
                entry.1 += 1;
            }
        }

        Ok(sums
            .into_iter()
            .map(|((area, year), (sum, count))| RegionYearMean {
                area,
                year,
                mean: sum / count as f64,
            })
            .collect())
    }
}
