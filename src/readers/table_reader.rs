use crate::error::{ProcessingError, Result};
use crate::models::{Area, VhiRecord, YearField};
use crate::readers::vhi_reader::parse_week;
use crate::utils::constants::TABLE_HEADERS;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Reader for the flat table snapshots (`Year,Week,SMN,SMT,VCI,TCI,VHI,area`).
pub struct TableReader;

impl TableReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_table(&self, path: &Path) -> Result<Vec<VhiRecord>> {
        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_path(path)?;
        let records = self.read_from(reader)?;
        debug!(rows = records.len(), path = %path.display(), "loaded table snapshot");
        Ok(records)
    }

    pub fn read_table_from<R: Read>(&self, source: R) -> Result<Vec<VhiRecord>> {
        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);
        self.read_from(reader)
    }

    fn read_from<R: Read>(&self, mut reader: csv::Reader<R>) -> Result<Vec<VhiRecord>> {
        let headers = reader.headers()?.clone();
        let columns = ColumnIndex::resolve(&headers)?;

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for row in reader.records() {
            match columns.parse_row(&row?) {
                Some(record) => records.push(record),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(skipped, kept = records.len(), "skipped malformed table rows");
        }
        Ok(records)
    }
}

impl Default for TableReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Positions of the expected columns within a snapshot header.
struct ColumnIndex([usize; 8]);

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let mut positions = [0usize; 8];
        for (slot, name) in positions.iter_mut().zip(TABLE_HEADERS) {
            *slot = headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| ProcessingError::MissingData(format!("column '{}'", name)))?;
        }
        Ok(Self(positions))
    }

    fn parse_row(&self, row: &StringRecord) -> Option<VhiRecord> {
        let [year, week, smn, smt, vci, tci, vhi, area] = self.0;
        let number = |index: usize| row.get(index)?.parse::<f64>().ok().filter(|v| v.is_finite());

        Some(VhiRecord {
            year: YearField::from_text(row.get(year)?),
            week: parse_week(row.get(week)?)?,
            smn: number(smn)?,
            smt: number(smt)?,
            vci: number(vci)?,
            tci: number(tci)?,
            vhi: number(vhi)?,
            area: Area::parse(row.get(area)?),
        })
    }
}
