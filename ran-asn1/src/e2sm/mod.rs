//! E2 service model information elements
//!
//! - [`common`]: UE and node identifiers shared by all service models
//! - [`rc`]: E2SM-RC (RAN Control), RAN parameters and the RIC Control
//!   header, message and outcome

pub mod common;
pub mod rc;
