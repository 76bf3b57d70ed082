pub mod explorer;
pub mod query_engine;

pub use explorer::{
    ExploreQuery, Explorer, IndexKind, IndexRow, RegionYearMean, SeriesPoint, SortOrder,
};
pub use query_engine::{
    DroughtConfig, DroughtObservation, DroughtReport, QueryEngine, VhiStats, WeekVhi, YearWeekVhi,
};
