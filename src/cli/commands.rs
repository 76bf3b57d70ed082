use crate::analyzers::{ExploreQuery, Explorer, IndexKind, QueryEngine};
use crate::cli::args::{Cli, Commands, ExploreView};
use crate::error::{ProcessingError, Result};
use crate::models::{region_name, Area, VhiRecord};
use crate::processors::{normalize_years, relabel_regions, DatasetBuilder};
use crate::readers::TableReader;
use crate::utils::constants::{
    BUILT_TABLE_FILE, CLEAN_TABLE_FILE, RELABELED_TABLE_FILE, TOTAL_REGIONS,
};
use crate::utils::filename::{generate_default_parquet_filename, snapshot_file_name, source_url};
use crate::utils::progress::ProgressReporter;
use crate::utils::settings::Settings;
use crate::writers::{CsvWriter, ParquetWriter};
use chrono::Local;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Build {
            input_dir,
            output_dir,
            quiet,
        } => {
            let input_dir = input_dir.unwrap_or_else(|| settings.data_dir.clone());
            let output_dir = output_dir.unwrap_or_else(|| settings.output_dir.clone());

            println!("Building VHI tables...");
            println!("Input directory: {}", input_dir.display());
            println!("Output directory: {}", output_dir.display());

            let builder = DatasetBuilder::new();
            let sources = builder.discover_sources(&input_dir)?;
            if sources.is_empty() {
                return Err(ProcessingError::MissingData(format!(
                    "no region files found in {}",
                    input_dir.display()
                )));
            }

            let progress =
                ProgressReporter::new(sources.len() as u64, "Loading region files...", quiet);
            let table = builder.build_from_sources(&sources, Some(&progress))?;
            progress.finish_with_message(&format!(
                "Loaded {} rows from {} region files",
                table.len(),
                sources.len()
            ));

            let writer = CsvWriter::new();
            writer.write_records(&table, &output_dir.join(BUILT_TABLE_FILE))?;

            let relabeled = relabel_regions(table);
            writer.write_records(&relabeled, &output_dir.join(RELABELED_TABLE_FILE))?;

            let clean = normalize_years(&relabeled);
            writer.write_records(&clean, &output_dir.join(CLEAN_TABLE_FILE))?;

            println!(
                "Clean table: {} rows ({} dropped by year repair)",
                clean.len(),
                relabeled.len() - clean.len()
            );
            println!("Processing complete!");
        }

        Commands::Lookup {
            file,
            area,
            year,
            json,
        } => {
            let records = load_table(&file)?;
            let area = Area::parse(&area);
            let weeks = QueryEngine::new().vhi_for_region_year(&records, &area, year);

            if json {
                print_json(&weeks)?;
            } else if weeks.is_empty() {
                println!("No observations for {} in {}", area, year);
            } else {
                println!("VHI for {} in {}:", area, year);
                for w in &weeks {
                    println!("  week {:>2}: {:.2}", w.week, w.vhi);
                }
            }
        }

        Commands::Range {
            file,
            area,
            start_year,
            end_year,
            json,
        } => {
            let records = load_table(&file)?;
            let area = Area::parse(&area);
            let rows = QueryEngine::new().vhi_for_region_years(&records, &area, start_year, end_year);

            if json {
                print_json(&rows)?;
            } else {
                println!(
                    "VHI for {} from {} to {}: {} observations",
                    area,
                    start_year,
                    end_year,
                    rows.len()
                );
                for r in &rows {
                    println!("  {} week {:>2}: {:.2}", r.year, r.week, r.vhi);
                }
            }
        }

        Commands::Stats {
            file,
            area,
            year,
            json,
        } => {
            let records = load_table(&file)?;
            let area = area.as_deref().map(Area::parse);
            let stats = QueryEngine::new().vhi_stats(&records, area.as_ref(), year);

            if json {
                print_json(&stats)?;
            } else {
                println!("{}", stats.summary());
            }
        }

        Commands::Droughts {
            file,
            percentage,
            total_regions,
            details,
            json,
        } => {
            let config = settings
                .with_drought_overrides(percentage, total_regions)?
                .drought_config();
            let records = load_table(&file)?;

            info!(
                min_regions = config.min_regions(),
                total_regions = config.total_regions,
                "detecting extreme drought years"
            );
            let report = QueryEngine::new().extreme_drought_years(&records, &config);

            if json {
                print_json(&report)?;
            } else {
                println!("{}", report.summary());
                if details {
                    for d in &report.details {
                        println!("  {} {}: {:.2}", d.year, d.area, d.vhi);
                    }
                }
            }
        }

        Commands::Explore {
            file,
            index,
            area,
            week_from,
            week_to,
            year_from,
            year_to,
            asc,
            desc,
            view,
            json,
        } => {
            let records = normalize_years(&load_table(&file)?);
            let explorer = Explorer::new(&records);

            let area = match area {
                Some(a) => Area::parse(&a),
                None => explorer.areas().into_iter().next().ok_or_else(|| {
                    ProcessingError::MissingData(format!("no rows in {}", file.display()))
                })?,
            };

            let query = ExploreQuery {
                index: index.parse::<IndexKind>()?,
                area,
                week_from,
                week_to,
                year_from,
                year_to,
                sort_ascending: asc,
                sort_descending: desc,
            };

            match view {
                ExploreView::Table => {
                    let rows = explorer.filter_rows(&query)?;
                    if json {
                        print_json(&rows)?;
                    } else {
                        println!("{:>6} {:>4} {:>8}  area", "Year", "Week", query.index);
                        for r in &rows {
                            println!("{:>6} {:>4} {:>8.2}  {}", r.year, r.week, r.value, r.area);
                        }
                    }
                }
                ExploreView::Series => {
                    let points = explorer.series(&query)?;
                    if json {
                        print_json(&points)?;
                    } else {
                        for p in &points {
                            println!("{:.3}\t{:.2}", p.time, p.value);
                        }
                    }
                }
                ExploreView::Compare => {
                    let means = explorer.compare_regions(&query)?;
                    if json {
                        print_json(&means)?;
                    } else {
                        for m in &means {
                            let marker = if m.area == query.area { "*" } else { " " };
                            println!("{} {} {}: {:.2}", marker, m.area, m.year, m.mean);
                        }
                    }
                }
            }
        }

        Commands::Export {
            file,
            output_file,
            compression,
            row_group_size,
            quiet,
        } => {
            let output_file = output_file.unwrap_or_else(generate_default_parquet_filename);
            let records = normalize_years(&load_table(&file)?);

            let spinner = ProgressReporter::new_spinner(
                &format!(
                    "Writing {} records to {}...",
                    records.len(),
                    output_file.display()
                ),
                quiet,
            );
            let writer = ParquetWriter::new()
                .with_compression(&compression)?
                .with_row_group_size(row_group_size);
            writer.write_records(&records, &output_file)?;
            spinner.finish_with_message("Parquet export complete");

            let file_info = writer.get_file_info(&output_file)?;
            println!("\n{}", file_info.summary());
        }

        Commands::Sources => {
            let now = Local::now();
            for id in 1..=TOTAL_REGIONS as u32 {
                println!(
                    "{:>2}  {}\n    {}\n    -> {}",
                    id,
                    region_name(id).unwrap_or("?"),
                    source_url(id),
                    snapshot_file_name(id, &now)
                );
            }
        }
    }

    Ok(())
}

fn load_table(path: &Path) -> Result<Vec<VhiRecord>> {
    let records = TableReader::new().read_table(path)?;
    info!(rows = records.len(), path = %path.display(), "loaded table");
    Ok(records)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match log_file {
        Some(path) => subscriber
            .with_ansi(false)
            .with_writer(Mutex::new(File::create(path)?))
            .try_init(),
        None => subscriber.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| ProcessingError::Config(format!("logging setup failed: {}", e)))
}
