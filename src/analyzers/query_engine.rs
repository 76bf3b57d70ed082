use crate::models::{Area, VhiRecord};
use crate::processors::normalize_years;
use crate::utils::constants::{DROUGHT_PERCENTAGE_THRESHOLD, DROUGHT_VHI_THRESHOLD, TOTAL_REGIONS};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekVhi {
    pub week: u32,
    pub vhi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearWeekVhi {
    pub year: i32,
    pub week: u32,
    pub vhi: f64,
}

/// Summary of VHI values; every field is `None` when nothing matched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VhiStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

impl VhiStats {
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    pub fn summary(&self) -> String {
        match (self.min, self.max, self.mean, self.median) {
            (Some(min), Some(max), Some(mean), Some(median)) => format!(
                "VHI min: {:.2}\nVHI max: {:.2}\nVHI mean: {:.2}\nVHI median: {:.2}",
                min, max, mean, median
            ),
            _ => "No matching observations".to_string(),
        }
    }
}

/// Thresholds for extreme drought detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DroughtConfig {
    /// A row is a drought observation when `vhi <= vhi_threshold`.
    pub vhi_threshold: f64,
    /// Share of `total_regions` (in percent) that must be in drought.
    pub percentage_threshold: f64,
    /// Region count the percentage is taken of. Not derived from the table,
    /// so a table holding a subset of regions is measured against the full set.
    pub total_regions: usize,
}

impl DroughtConfig {
    pub fn with_percentage(mut self, percentage_threshold: f64) -> Self {
        self.percentage_threshold = percentage_threshold;
        self
    }

    /// Distinct drought regions a year needs; compared unrounded.
    pub fn min_regions(&self) -> f64 {
        (self.percentage_threshold / 100.0) * self.total_regions as f64
    }
}

impl Default for DroughtConfig {
    fn default() -> Self {
        Self {
            vhi_threshold: DROUGHT_VHI_THRESHOLD,
            percentage_threshold: DROUGHT_PERCENTAGE_THRESHOLD,
            total_regions: TOTAL_REGIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroughtObservation {
    pub year: i32,
    pub area: Area,
    pub vhi: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DroughtReport {
    /// Qualifying years, ascending.
    pub years: Vec<i32>,
    /// Drought observations of the qualifying years, in table order.
    pub details: Vec<DroughtObservation>,
}

impl DroughtReport {
    pub fn summary(&self) -> String {
        if self.years.is_empty() {
            return "No extreme drought years".to_string();
        }

        let mut summary = format!(
            "Extreme drought years: {}\n",
            self.years
                .iter()
                .map(|y| y.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut per_year: BTreeMap<i32, HashSet<&Area>> = BTreeMap::new();
        for observation in &self.details {
            per_year
                .entry(observation.year)
                .or_default()
                .insert(&observation.area);
        }
        for (year, areas) in per_year {
            summary.push_str(&format!("  {}: {} regions in drought\n", year, areas.len()));
        }

        summary
    }
}

/// Analytical queries over the unified table.
///
/// Every query normalizes its own copy of the input first, so tables that
/// skipped normalization are accepted and the caller's table is never mutated.
pub struct QueryEngine;

impl QueryEngine {
    pub fn new() -> Self {
        Self
    }

    /// Weekly VHI of one region in one year, in table order.
    pub fn vhi_for_region_year(&self, records: &[VhiRecord], area: &Area, year: i32) -> Vec<WeekVhi> {
        normalize_years(records)
            .into_iter()
            .filter(|r| &r.area == area && r.year_value() == Some(year))
            .map(|r| WeekVhi {
                week: r.week,
                vhi: r.vhi,
            })
            .collect()
    }

    /// Weekly VHI of one region for `start_year..=end_year`, in table order.
    pub fn vhi_for_region_years(
        &self,
        records: &[VhiRecord],
        area: &Area,
        start_year: i32,
        end_year: i32,
    ) -> Vec<YearWeekVhi> {
        normalize_years(records)
            .into_iter()
            .filter(|r| &r.area == area)
            .filter_map(|r| {
                let year = r.year_value()?;
                (start_year..=end_year).contains(&year).then_some(YearWeekVhi {
                    year,
                    week: r.week,
                    vhi: r.vhi,
                })
            })
            .collect()
    }

    /// Min, max, mean and median VHI, optionally restricted to a region and/or a year.
    pub fn vhi_stats(&self, records: &[VhiRecord], area: Option<&Area>, year: Option<i32>) -> VhiStats {
        let mut values: Vec<f64> = normalize_years(records)
            .into_iter()
            .filter(|r| !r.is_sentinel())
            .filter(|r| area.map_or(true, |a| &r.area == a))
            .filter(|r| year.map_or(true, |y| r.year_value() == Some(y)))
            .map(|r| r.vhi)
            .collect();

        if values.is_empty() {
            return VhiStats::default();
        }

        values.sort_by(|a, b| a.total_cmp(b));
        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let median = if count % 2 == 0 {
            (values[count / 2 - 1] + values[count / 2]) / 2.0
        } else {
            values[count / 2]
        };

        VhiStats {
            min: values.first().copied(),
            max: values.last().copied(),
            mean: Some(mean),
            median: Some(median),
        }
    }

    /// Years in which enough distinct regions had at least one drought week.
    pub fn extreme_drought_years(&self, records: &[VhiRecord], config: &DroughtConfig) -> DroughtReport {
        let normalized = normalize_years(records);
        let droughts: Vec<&VhiRecord> = normalized
            .iter()
            .filter(|r| r.is_drought(config.vhi_threshold))
            .collect();

        let mut regions_per_year: BTreeMap<i32, HashSet<&Area>> = BTreeMap::new();
        for record in &droughts {
            if let Some(year) = record.year_value() {
                regions_per_year.entry(year).or_default().insert(&record.area);
            }
        }

        let min_regions = config.min_regions();
        let years: Vec<i32> = regions_per_year
            .into_iter()
            .filter(|(_, areas)| areas.len() as f64 >= min_regions)
            .map(|(year, _)| year)
            .collect();

        let details = droughts
            .into_iter()
            .filter_map(|r| {
                let year = r.year_value()?;
                years.contains(&year).then(|| DroughtObservation {
                    year,
                    area: r.area.clone(),
                    vhi: r.vhi,
                })
            })
            .collect();

        DroughtReport { years, details }
    }
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::YearField;
    use pretty_assertions::assert_eq;

    fn row(area: impl Into<Area>, year: i32, week: u32, vhi: f64) -> VhiRecord {
        VhiRecord::new(year, week, 0.05, 260.0, 40.0, 35.0, vhi, area)
    }

    #[test]
    fn test_point_lookup_exact_match() {
        let table = vec![row("X", 2020, 5, 40.0), row("Y", 2020, 5, 10.0)];
        let engine = QueryEngine::new();

        assert_eq!(
            engine.vhi_for_region_year(&table, &Area::from("X"), 2020),
            vec![WeekVhi { week: 5, vhi: 40.0 }]
        );
        assert!(engine
            .vhi_for_region_year(&table, &Area::from("X"), 2021)
            .is_empty());
    }

    #[test]
    fn test_point_lookup_keeps_table_order_and_repairs_years() {
        let mut table = vec![
            row(4u32, 2010, 9, 30.0),
            row(4u32, 2010, 2, 31.0),
            row(4u32, 2010, 5, 32.0),
        ];
        table[1].year = YearField::Raw("2010.0".to_string());

        let weeks: Vec<u32> = QueryEngine::new()
            .vhi_for_region_year(&table, &Area::Id(4), 2010)
            .into_iter()
            .map(|w| w.week)
            .collect();

        assert_eq!(weeks, vec![9, 2, 5]);
        assert_eq!(table[1].year, YearField::Raw("2010.0".to_string()));
    }

    #[test]
    fn test_range_lookup_is_inclusive() {
        let table = vec![
            row("A", 1999, 1, 10.0),
            row("A", 2000, 1, 20.0),
            row("B", 2001, 1, 25.0),
            row("A", 2002, 1, 30.0),
            row("A", 2003, 1, 40.0),
        ];

        let result = QueryEngine::new().vhi_for_region_years(&table, &Area::from("A"), 2000, 2002);

        assert_eq!(
            result,
            vec![
                YearWeekVhi {
                    year: 2000,
                    week: 1,
                    vhi: 20.0
                },
                YearWeekVhi {
                    year: 2002,
                    week: 1,
                    vhi: 30.0
                },
            ]
        );
        assert!(QueryEngine::new()
            .vhi_for_region_years(&table, &Area::from("C"), 1990, 2010)
            .is_empty());
    }

    #[test]
    fn test_range_lookup_repairs_raw_years() {
        let mut table = vec![
            row("A", 2000, 1, 20.0),
            row("A", 2001, 2, 21.0),
            row("A", 2001, 3, 22.0),
        ];
        table[0].year = YearField::Raw("2000.0".to_string());
        table[1].year = YearField::Raw("N/A".to_string());
        let snapshot = table.clone();

        let result = QueryEngine::new().vhi_for_region_years(&table, &Area::from("A"), 2000, 2001);

        assert_eq!(
            result.iter().map(|r| (r.year, r.week)).collect::<Vec<_>>(),
            vec![(2000, 1), (2001, 3)]
        );
        assert_eq!(table, snapshot);
    }

    #[test]
    fn test_stats() {
        let table = vec![
            row("A", 2000, 1, 10.0),
            row("A", 2000, 2, 40.0),
            row("A", 2001, 1, 20.0),
            row("A", 2001, 2, 30.0),
            row("B", 2000, 1, 70.0),
        ];
        let engine = QueryEngine::new();

        let all = engine.vhi_stats(&table, None, None);
        assert_eq!(all.min, Some(10.0));
        assert_eq!(all.max, Some(70.0));
        assert_eq!(all.mean, Some(34.0));
        assert_eq!(all.median, Some(30.0));

        let region_a = engine.vhi_stats(&table, Some(&Area::from("A")), None);
        assert_eq!(region_a.median, Some(25.0));
        assert_eq!(region_a.mean, Some(25.0));

        let a_2000 = engine.vhi_stats(&table, Some(&Area::from("A")), Some(2000));
        assert_eq!(a_2000.min, Some(10.0));
        assert_eq!(a_2000.max, Some(40.0));
    }

    #[test]
    fn test_stats_on_empty_filter() {
        let table = vec![row("A", 2000, 1, 10.0)];
        let stats = QueryEngine::new().vhi_stats(&table, Some(&Area::from("unknown-region")), None);

        assert_eq!(stats, VhiStats::default());
        assert!(stats.is_empty());
        assert_eq!(stats.summary(), "No matching observations");
    }

    #[test]
    fn test_stats_region_zero_is_a_real_filter() {
        let table = vec![row(0u32, 2000, 1, 10.0), row(1u32, 2000, 1, 90.0)];
        let stats = QueryEngine::new().vhi_stats(&table, Some(&Area::Id(0)), None);
        assert_eq!(stats.max, Some(10.0));
    }

    #[test]
    fn test_stats_ignores_leaked_sentinels() {
        let table = vec![row("A", 2000, 1, -1.0), row("A", 2000, 2, 12.0)];
        let stats = QueryEngine::new().vhi_stats(&table, None, None);
        assert_eq!(stats.min, Some(12.0));
    }

    fn drought_table(year: i32, drought_regions: u32) -> Vec<VhiRecord> {
        (1..=drought_regions)
            .flat_map(|id| vec![row(id, year, 1, 12.0), row(id, year, 2, 14.0)])
            .chain(std::iter::once(row(27u32, year, 1, 60.0)))
            .collect()
    }

    #[test]
    fn test_drought_threshold_boundary() {
        let engine = QueryEngine::new();
        let config = DroughtConfig::default();
        assert!((config.min_regions() - 5.4).abs() < 1e-9);

        let five = engine.extreme_drought_years(&drought_table(2000, 5), &config);
        assert!(five.years.is_empty());
        assert!(five.details.is_empty());

        let six = engine.extreme_drought_years(&drought_table(2001, 6), &config);
        assert_eq!(six.years, vec![2001]);
        assert_eq!(six.details.len(), 12);
        assert!(six.details.iter().all(|d| d.vhi <= 15.0));
    }

    #[test]
    fn test_drought_details_limited_to_qualifying_years() {
        let mut table = drought_table(2001, 6);
        table.extend(drought_table(2002, 2));
        table.push(row(3u32, 2001, 3, 15.0));

        let report = QueryEngine::new().extreme_drought_years(&table, &DroughtConfig::default());

        assert_eq!(report.years, vec![2001]);
        assert_eq!(report.details.len(), 13);
        assert_eq!(report.details.last().map(|d| d.vhi), Some(15.0));
        assert!(report.details.iter().all(|d| d.year == 2001));
        assert!(report.summary().contains("2001: 6 regions in drought"));
    }

    #[test]
    fn test_drought_detection_repairs_raw_years() {
        let engine = QueryEngine::new();

        let mut table = drought_table(2007, 6);
        table[0].year = YearField::Raw("2007.0".to_string());
        table[1].year = YearField::Raw("N/A".to_string());
        let report = engine.extreme_drought_years(&table, &DroughtConfig::default());
        assert_eq!(report.years, vec![2007]);
        assert_eq!(report.details.len(), 11);
        assert_eq!(report.details[0].area, Area::Id(1));

        // a sixth region whose only drought row has no usable year does not count
        let mut table = drought_table(2008, 5);
        let mut unusable = row(6u32, 2008, 1, 10.0);
        unusable.year = YearField::Raw("N/A".to_string());
        table.push(unusable);
        let report = engine.extreme_drought_years(&table, &DroughtConfig::default());
        assert!(report.years.is_empty());
    }

    #[test]
    fn test_drought_total_regions_is_configurable() {
        let table = drought_table(2005, 2);
        let config = DroughtConfig {
            total_regions: 5,
            ..DroughtConfig::default()
        }
        .with_percentage(30.0);

        let report = QueryEngine::new().extreme_drought_years(&table, &config);
        assert_eq!(report.years, vec![2005]);
    }
}
