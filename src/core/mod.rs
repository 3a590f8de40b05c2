//! Core processing building blocks: raster types, enhancement and compositing
//! stages, and the parameter types that drive them. These are pure, in-memory
//! primitives consumed by the high-level `api` module.
pub mod params;
pub mod processing;
pub mod raster;
