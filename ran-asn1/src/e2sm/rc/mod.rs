//! E2SM-RC information elements (O-RAN.WG3.E2SM-RC-v01.03)
//!
//! A RAN parameter is identified by a [`RanParameterId`] scoped to the RIC
//! style and action it appears under. Its value is one of four shapes:
//!
//! ```text
//! RANParameter-ValueType
//! ├── ElementTrue   value (key flag set)
//! ├── ElementFalse  value OPTIONAL
//! ├── Structure     SEQUENCE OF (id, value type)
//! └── List          SEQUENCE OF structure
//! ```
//!
//! Structures and lists nest, so a single control message item can carry a
//! whole parameter tree.

pub mod ran_parameter;
pub mod control;

pub use ran_parameter::*;
pub use control::*;

/// E2SM-RC RAN function id registered by E2 nodes
pub const E2SM_RC_RAN_FUNCTION_ID: i64 = 3;

/// maxnoofAssociatedRANParameters
pub const MAX_ASSOCIATED_RAN_PARAMETERS: usize = 65535;
/// maxnoofParametersinStructure
pub const MAX_PARAMETERS_IN_STRUCTURE: usize = 65535;
/// maxnoofItemsinList
pub const MAX_ITEMS_IN_LIST: usize = 65535;
/// maxnoofRICStyles
pub const MAX_RIC_STYLES: usize = 63;
/// maxnoofMulCtrlActions
pub const MAX_MULTIPLE_CONTROL_ACTIONS: usize = 63;
/// maxnoofRANOutcomeParameters
pub const MAX_RAN_OUTCOME_PARAMETERS: usize = 255;
