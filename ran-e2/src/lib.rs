//! E2SM-RC RIC Control service for E2 nodes
//!
//! This crate implements the E2 node side of the RIC Control procedure for
//! the E2SM-RC RAN function: requests are decoded with the aligned-PER codec
//! of `ran-asn1`, routed to a control action executor by (style, action),
//! and answered with an acknowledgement or a failure cause.
//!
//! # Components
//!
//! - [`E2smRcControlService`]: executor registry and request pipeline
//! - [`ControlActionExecutor`]: one control action of one RIC style
//! - [`parameter::RanParameterTable`]: `ran_param_id` interpreters
//! - [`du::DuConfigurator`]: seam towards the DU MAC scheduler
//! - [`slicing::SliceLevelPrbQuotaExecutor`]: radio resource allocation
//!   control, slice-level PRB quota (style 2, action 6)
//!
//! # Usage Example
//! ```rust
//! use ran_e2::{ControlServiceConfig, E2smRcControlService};
//!
//! let service = E2smRcControlService::with_config(
//!     ControlServiceConfig::default().with_max_message_size(16 * 1024),
//! );
//! assert_eq!(service.config().ran_function_id, 3);
//! ```

pub mod config;
pub mod du;
pub mod error;
pub mod executor;
pub mod parameter;
pub mod request;
pub mod service;
pub mod slicing;

pub use config::ControlServiceConfig;
pub use error::{CauseGroup, ControlError, ControlResult, RicControlCause};
pub use executor::ControlActionExecutor;
pub use request::{RicControlOutcome, RicControlRequest, RicRequestId};
pub use service::E2smRcControlService;
