pub mod age;
pub mod aggregate;
pub mod chart;
pub mod config;
pub mod ingest;
pub mod pipeline;
