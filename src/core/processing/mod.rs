//! Image transform stages: bilateral/Gaussian filters, tone enhancement,
//! logo resize and compositing, and the per-image pipeline that chains them.
pub mod composite;
pub mod enhance;
pub mod filters;
pub mod pipeline;
pub mod resize;
