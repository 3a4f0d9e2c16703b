pub mod actor;
pub mod client;

pub use actor::GatewayActor;
