pub mod record;
pub mod region;

pub use record::{VhiRecord, YearField};
pub use region::{region_name, Area, REGION_NAMES};
