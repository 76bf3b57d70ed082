use crate::error::Result;
use crate::models::VhiRecord;
use crate::utils::constants::TABLE_HEADERS;
use csv::Writer;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes a table as a flat CSV snapshot with a header row.
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_records(&self, records: &[VhiRecord], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let writer = Writer::from_path(path)?;
        self.write_to(records, writer)?;
        info!(rows = records.len(), path = %path.display(), "wrote table snapshot");
        Ok(())
    }

    pub fn write_records_to<W: Write>(&self, records: &[VhiRecord], sink: W) -> Result<()> {
        self.write_to(records, Writer::from_writer(sink))
    }

    fn write_to<W: Write>(&self, records: &[VhiRecord], mut writer: Writer<W>) -> Result<()> {
        writer.write_record(TABLE_HEADERS)?;
        for record in records {
            writer.write_record([
                record.year.to_string(),
                record.week.to_string(),
                record.smn.to_string(),
                record.smt.to_string(),
                record.vci.to_string(),
                record.tci.to_string(),
                record.vhi.to_string(),
                record.area.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
