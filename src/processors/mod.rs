pub mod dataset_builder;
pub mod year_normalizer;

pub use dataset_builder::{relabel_regions, DatasetBuilder, RegionSource};
pub use year_normalizer::{extract_year, normalize_years};
