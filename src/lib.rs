pub mod build_info;
pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod harness;
pub mod invoke;
pub mod layout;
pub mod params;
pub mod record;
pub mod report;
pub mod summary;
pub mod sweep;
pub mod table;
