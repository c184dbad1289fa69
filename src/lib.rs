pub mod api;
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod humanize;
pub mod inspector;
pub mod observability;
pub mod staging;
