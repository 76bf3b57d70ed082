pub mod table_reader;
pub mod vhi_reader;

pub use table_reader::TableReader;
pub use vhi_reader::{ParseStats, VhiReader};
