pub mod config;
pub mod report;
pub mod route;
pub mod weights;
