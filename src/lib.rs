pub mod analyzers;
pub mod config;
pub mod error;
pub mod features;
pub mod output;
pub mod render;
pub mod trips;
