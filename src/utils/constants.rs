/// Region table
pub const TOTAL_REGIONS: usize = 27;

/// Raw source layout: year, week, SMN, SMT, VCI, TCI, VHI and an optional trailing field
pub const RAW_DATA_FIELDS: usize = 7;
pub const RAW_MAX_FIELDS: usize = 8;
pub const RAW_HEADER_LINES: usize = 1;

/// Sentinel and drought thresholds
pub const VHI_SENTINEL: f64 = -1.0;
pub const DROUGHT_VHI_THRESHOLD: f64 = 15.0;
pub const DROUGHT_PERCENTAGE_THRESHOLD: f64 = 20.0;

/// Flat table columns
pub const TABLE_HEADERS: [&str; 8] = ["Year", "Week", "SMN", "SMT", "VCI", "TCI", "VHI", "area"];

/// Snapshot file names
pub const BUILT_TABLE_FILE: &str = "vhi_data.csv";
pub const RELABELED_TABLE_FILE: &str = "vhi_data_regions.csv";
pub const CLEAN_TABLE_FILE: &str = "vhi_data_clean.csv";

/// Source files
pub const SOURCE_FILE_PREFIX: &str = "vhi_";
pub const SOURCE_FILE_EXTENSION: &str = ".csv";
pub const DEFAULT_DATA_DIR: &str = "vhi_data";
pub const SETTINGS_FILE: &str = "vhi.toml";
pub const SETTINGS_ENV_PREFIX: &str = "VHI";

/// Remote endpoint
pub const SOURCE_URL_BASE: &str = "https://www.star.nesdis.noaa.gov/smcd/emb/vci/VH/get_TS_admin.php";
pub const SOURCE_COUNTRY: &str = "UKR";
pub const SOURCE_FIRST_YEAR: i32 = 1981;
pub const SOURCE_LAST_YEAR: i32 = 2024;
pub const SOURCE_SERIES_TYPE: &str = "Mean";

/// Exploration bounds
pub const MIN_WEEK: u32 = 1;
pub const MAX_WEEK: u32 = 52;
pub const EXPLORE_FIRST_YEAR: i32 = 1982;
pub const EXPLORE_LAST_YEAR: i32 = 2024;
pub const WEEKS_PER_YEAR: f64 = 52.0;

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
