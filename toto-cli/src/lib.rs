pub mod analysis;
pub mod config;
pub mod display;
pub mod export;
pub mod import;
pub mod logging;
