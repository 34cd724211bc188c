pub mod benchmark;
pub mod bots;
pub mod config;
pub mod render;
pub mod runner;
pub mod store;
pub mod util;
