pub mod constants;
pub mod heartbeat;
pub mod movement;
pub mod registry;
pub mod session;
pub mod types;
