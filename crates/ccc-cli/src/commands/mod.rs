pub mod data;
pub mod dirs;
pub mod log_temps;
pub mod prompt;
pub mod ratio;
pub mod runs;
