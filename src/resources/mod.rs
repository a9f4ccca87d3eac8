//! ECS resources shared by the sprite systems.
//!
//! Overview
//! - `meshpool` – reuse pool of duplicated meshes keyed by source mesh
//! - `meshstore` – host mesh library: source meshes, instances, scene validity
//! - `previewconfig` – INI-backed settings for the preview binary
//! - `worldtime` – simulation time and delta
pub mod meshpool;
pub mod meshstore;
pub mod previewconfig;
pub mod worldtime;
