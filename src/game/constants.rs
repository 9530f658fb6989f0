use super::types::Position;

pub const HEARTBEAT_INTERVAL_MS: u64 = 100;
pub const WORLD_WIDTH: i32 = 10;
pub const WORLD_HEIGHT: i32 = 10;
pub const SPAWN_POINT: Position = Position::new(0, 0);
pub const MAX_MESSAGE_BYTES: usize = 64 * 1024;
pub const OUTBOUND_QUEUE_CAPACITY: usize = 64;
