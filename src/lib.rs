pub mod capture;
pub mod centroid;
pub mod cli;
pub mod config;
pub mod detector;
pub mod extractor;
pub mod logging;
pub mod pipeline;
pub mod publish;
pub mod tracker;
pub mod types;
pub mod zone;
