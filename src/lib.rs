pub mod config;
pub mod decode;
pub mod humanize;
pub mod manifest;
pub mod observability;
pub mod processor;
pub mod report;
pub mod targets;
pub mod transport;
pub mod worker;
