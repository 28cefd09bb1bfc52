//! Player location tracking.

use mazebeam_protocol::{Message, Orientation};

/// Where the player probably is.
///
/// Beam sensors only report which beam broke, not which way the player
/// was walking, so the location is inferred one step at a time. `primary`
/// is the most likely cell. `secondary` keeps the cell the player just
/// left, since a player standing in a beam could still be in either one.
/// It is never broadcast.
///
/// Coordinates are signed: walking out through the entry or exit wall
/// puts the player one step outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerLocation {
    primary: (i32, i32),
    secondary: Option<(i32, i32)>,
}

impl PlayerLocation {
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            primary: (x, y),
            secondary: None,
        }
    }

    pub fn primary(&self) -> (i32, i32) {
        self.primary
    }

    pub fn secondary(&self) -> Option<(i32, i32)> {
        self.secondary
    }

    /// Applies a break on a passable beam and returns whether the player
    /// moved.
    ///
    /// A horizontal beam at row `y` lies between cell rows `y - 1` and `y`:
    /// breaking the one below the player (`y == py + 1`) moves them down,
    /// breaking the one above (`y == py`) moves them up. Vertical beams
    /// work the same way along x. Any other beam is too far away to be
    /// the player's and leaves the location unchanged.
    pub fn cross(&mut self, orientation: Orientation, x: i32, y: i32) -> bool {
        let (px, py) = self.primary;
        let next = match orientation {
            Orientation::Horizontal if y == py + 1 => (px, py + 1),
            Orientation::Horizontal if y == py => (px, py - 1),
            Orientation::Vertical if x == px + 1 => (px + 1, py),
            Orientation::Vertical if x == px => (px - 1, py),
            _ => return false,
        };
        self.secondary = Some(self.primary);
        self.primary = next;
        true
    }

    /// The `playerloc` broadcast for the primary cell.
    pub fn to_message(&self) -> Message {
        let (x, y) = self.primary;
        Message::PlayerLoc { x, y }
    }
}
