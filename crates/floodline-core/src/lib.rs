//! Floodline core - errors, configuration, layer models, file formats, and
//! the Overpass client shared by every pipeline stage.

pub mod config;
pub mod error;
pub mod formats;
pub mod models;
pub mod overpass;
