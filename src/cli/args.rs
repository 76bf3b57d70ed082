use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::utils::constants::{
    CLEAN_TABLE_FILE, DEFAULT_ROW_GROUP_SIZE, EXPLORE_FIRST_YEAR, EXPLORE_LAST_YEAR, MAX_WEEK, MIN_WEEK,
};

#[derive(Parser)]
#[command(name = "vhi-analyzer")]
#[command(about = "Vegetation health index cleaning and analysis for Ukrainian regions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Settings file [default: vhi.toml if present]")]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExploreView {
    /// Filtered rows of one region
    Table,
    /// Time series of one region
    Series,
    /// Yearly means of every region
    Compare,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge downloaded region files and write the built, relabeled and clean tables
    Build {
        #[arg(short, long, help = "Directory with vhi_<id>_<timestamp>.csv files [default: settings data_dir]")]
        input_dir: Option<PathBuf>,

        #[arg(short, long, help = "Directory for the table snapshots [default: settings output_dir]")]
        output_dir: Option<PathBuf>,

        #[arg(short, long, help = "Hide the progress bar")]
        quiet: bool,
    },

    /// Weekly VHI of a region in one year
    Lookup {
        #[arg(short, long, default_value = CLEAN_TABLE_FILE)]
        file: PathBuf,

        #[arg(short, long, help = "Region id or name")]
        area: String,

        #[arg(short, long)]
        year: i32,

        #[arg(long)]
        json: bool,
    },

    /// Weekly VHI of a region over an inclusive year range
    Range {
        #[arg(short, long, default_value = CLEAN_TABLE_FILE)]
        file: PathBuf,

        #[arg(short, long, help = "Region id or name")]
        area: String,

        #[arg(long)]
        start_year: i32,

        #[arg(long)]
        end_year: i32,

        #[arg(long)]
        json: bool,
    },

    /// VHI min, max, mean and median with optional region and year filters
    Stats {
        #[arg(short, long, default_value = CLEAN_TABLE_FILE)]
        file: PathBuf,

        #[arg(short, long, help = "Region id or name")]
        area: Option<String>,

        #[arg(short, long)]
        year: Option<i32>,

        #[arg(long)]
        json: bool,
    },

    /// Years in which a share of regions saw extreme drought
    Droughts {
        #[arg(short, long, default_value = CLEAN_TABLE_FILE)]
        file: PathBuf,

        #[arg(short, long, help = "Percentage of regions required [default: settings]")]
        percentage: Option<f64>,

        #[arg(long, help = "Total region count the percentage is taken of [default: settings]")]
        total_regions: Option<usize>,

        #[arg(long, help = "Print every drought observation of the qualifying years")]
        details: bool,

        #[arg(long)]
        json: bool,
    },

    /// Filter, sort and compare an index the way the dashboard does
    Explore {
        #[arg(short, long, default_value = CLEAN_TABLE_FILE)]
        file: PathBuf,

        #[arg(short, long, default_value = "VHI", help = "VCI, TCI or VHI")]
        index: String,

        #[arg(short, long, help = "Region id or name [default: first region]")]
        area: Option<String>,

        #[arg(long, default_value_t = MIN_WEEK)]
        week_from: u32,

        #[arg(long, default_value_t = MAX_WEEK)]
        week_to: u32,

        #[arg(long, default_value_t = EXPLORE_FIRST_YEAR)]
        year_from: i32,

        #[arg(long, default_value_t = EXPLORE_LAST_YEAR)]
        year_to: i32,

        #[arg(long, help = "Sort by index value, ascending")]
        asc: bool,

        #[arg(long, help = "Sort by index value, descending")]
        desc: bool,

        #[arg(long, value_enum, default_value_t = ExploreView::Table)]
        view: ExploreView,

        #[arg(long)]
        json: bool,
    },

    /// Export a table to Parquet
    Export {
        #[arg(short, long, default_value = CLEAN_TABLE_FILE)]
        file: PathBuf,

        #[arg(
            short,
            long,
            help = "Output Parquet file path [default: output/vhi-clean-{YYMMDD}.parquet]"
        )]
        output_file: Option<PathBuf>,

        #[arg(short, long, default_value = "snappy")]
        compression: String,

        #[arg(long, default_value_t = DEFAULT_ROW_GROUP_SIZE, help = "Rows per Parquet row group")]
        row_group_size: usize,

        #[arg(short, long, help = "Hide the progress spinner")]
        quiet: bool,
    },

    /// List region ids, names, source URLs and download file names
    Sources,
}
