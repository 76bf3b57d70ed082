pub mod args;
pub mod commands;

pub use args::{Cli, Commands, ExploreView};
pub use commands::run;
