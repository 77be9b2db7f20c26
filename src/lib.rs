//! Terminal dashboard for worldwide and per-country COVID-19 statistics.

pub mod api;
pub mod app;
pub mod braille;
pub mod config;
pub mod controller;
pub mod logging;
pub mod map;
pub mod stats;
pub mod ui;

#[cfg(test)]
mod testing;
