use crate::error::Result;
use crate::models::VhiRecord;
use crate::readers::VhiReader;
use crate::utils::filename::{extract_region_id, is_source_file};
use crate::utils::progress::ProgressReporter;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A downloaded region export and the region it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RegionSource {
    pub region_id: u32,
    pub path: PathBuf,
}

/// Concatenates per-region exports into one table.
///
/// Rows of a region stay contiguous and in source order, and regions are
/// appended in the order given. Loading the same region twice appends its
/// rows twice; the builder only warns about it.
pub struct DatasetBuilder {
    reader: VhiReader,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self {
            reader: VhiReader::new(),
        }
    }

    /// Find region exports in a directory, ordered by region ID then file name.
    pub fn discover_sources(&self, dir: &Path) -> Result<Vec<RegionSource>> {
        let mut sources = Vec::new();

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() || !is_source_file(&path) {
                continue;
            }

            match extract_region_id(&path) {
                Ok(region_id) => sources.push(RegionSource { region_id, path }),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping source file"),
            }
        }

        sources.sort();
        Ok(sources)
    }

    /// Load every region export found in `dir` into one table.
    pub fn load_directory(
        &self,
        dir: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<VhiRecord>> {
        let sources = self.discover_sources(dir)?;
        info!(dir = %dir.display(), sources = sources.len(), "discovered region sources");
        self.build_from_sources(&sources, progress)
    }

    /// Parse and concatenate the given sources in order.
    pub fn build_from_sources(
        &self,
        sources: &[RegionSource],
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<VhiRecord>> {
        warn_on_duplicates(sources.iter().map(|s| s.region_id));

        let mut table = Vec::new();
        for source in sources {
            if let Some(p) = progress {
                p.set_message(&format!("Reading region {}...", source.region_id));
            }

            let records = self
                .reader
                .read_region_with_id(&source.path, source.region_id)?;
            table.extend(records);

            if let Some(p) = progress {
                p.increment(1);
            }
        }

        info!(rows = table.len(), regions = sources.len(), "built unified table");
        Ok(table)
    }

    /// Parse and concatenate in-memory exports given as (region ID, text) pairs.
    pub fn build_from_texts(&self, sources: &[(u32, &str)]) -> Vec<VhiRecord> {
        warn_on_duplicates(sources.iter().map(|(id, _)| *id));

        sources
            .iter()
            .flat_map(|(region_id, content)| self.reader.parse_region(content, *region_id).0)
            .collect()
    }
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace every known region id with its name. Unknown ids are kept as they are.
pub fn relabel_regions(records: Vec<VhiRecord>) -> Vec<VhiRecord> {
    records
        .into_iter()
        .map(|mut record| {
            record.area = record.area.relabeled();
            record
        })
        .collect()
}

fn warn_on_duplicates(ids: impl Iterator<Item = u32>) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            warn!(region_id = id, "region loaded more than once, rows will accumulate");
        }
    }
}
