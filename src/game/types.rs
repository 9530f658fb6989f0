use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(Uuid);

impl PlayerId {
  pub fn new() -> Self {
    Self(Uuid::new_v4())
  }
}

impl fmt::Display for PlayerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// Identity data sent by the client at handshake. Stored and echoed back
/// exactly as received; the server never inspects its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(serde_json::Value);

impl UserProfile {
  pub fn new(value: serde_json::Value) -> Self {
    Self(value)
  }

  pub fn username(&self) -> Option<&str> {
    self.0.get("username").and_then(serde_json::Value::as_str)
  }

  pub fn as_value(&self) -> &serde_json::Value {
    &self.0
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
  pub x: i32,
  pub y: i32,
}

impl Position {
  pub const fn new(x: i32, y: i32) -> Self {
    Self { x, y }
  }
}

/// Grid directions. `Up` decreases `y` (row 0 is the top edge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  Up,
  Down,
  Left,
  Right,
}

impl Direction {
  pub fn delta(self) -> (i32, i32) {
    match self {
      Direction::Up => (0, -1),
      Direction::Down => (0, 1),
      Direction::Left => (-1, 0),
      Direction::Right => (1, 0),
    }
  }
}

/// Static world bounds. Valid positions are `[0, width] x [0, height]`, inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldMap {
  pub width: i32,
  pub height: i32,
  pub spawn: Position,
}

impl WorldMap {
  pub fn contains(&self, position: Position) -> bool {
    (0..=self.width).contains(&position.x) && (0..=self.height).contains(&position.y)
  }
}

#[derive(Debug, Clone)]
pub struct PlayerState {
  pub id: PlayerId,
  pub profile: UserProfile,
  pub position: Position,
  pub session_id: String,
}

impl PlayerState {
  pub fn view(&self) -> PlayerView {
    PlayerView {
      id: self.id,
      profile: self.profile.clone(),
      position: self.position,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
  pub id: PlayerId,
  pub profile: UserProfile,
  pub position: Position,
}
