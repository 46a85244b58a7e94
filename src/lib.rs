//! Audiobookshelf metadata and cover exporter
//!
//! Reads the Audiobookshelf CSV export, checks each item's folder name
//! against its catalog metadata and copies `metadata.json` / `cover.jpg`
//! from the ID-keyed media root into a path-organized export tree.

pub mod api;
pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod services;

pub use app::{AppState, build_app};
