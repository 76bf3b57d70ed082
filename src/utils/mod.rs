pub mod constants;
pub mod filename;
pub mod progress;
pub mod settings;

pub use constants::*;
pub use filename::{
    extract_region_id, generate_default_parquet_filename, is_source_file, snapshot_file_name,
    source_url,
};
pub use progress::ProgressReporter;
pub use settings::Settings;
