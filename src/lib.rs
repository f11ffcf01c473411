pub mod config;
pub mod engine;
pub mod feed;
pub mod pipeline;
pub mod report;
pub mod teams;
