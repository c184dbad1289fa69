pub mod error;
pub mod models;
mod pages;
mod server;
pub mod services;
pub mod state;
pub(crate) mod utils;

pub use server::{router, run};
