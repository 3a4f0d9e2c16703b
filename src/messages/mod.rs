//! Message types for inter-layer communication in the actor-based architecture.
//!
//! This module defines all messages that flow between the presentation,
//! session, and gateway layers.

pub mod gateway;
pub mod ops;
pub mod snapshot;

pub use gateway::{GatewayCommand, GatewayResponse};
pub use ops::SessionOp;
pub use snapshot::SessionSnapshot;
