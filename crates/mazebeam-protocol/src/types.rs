//! Core protocol types for the mazebeam wire format.
//!
//! Every type here travels "on the wire": it is written as whitespace
//! separated ASCII tokens into a single UDP datagram and read back by every
//! other process on the bus. The first token names the message type, the
//! rest are type-specific fields.
//!
//! ```text
//! beam b h 2 3
//! event maze-driver "hwall 2.3 was unhit, is now hit"
//! maze 4 3 1 1 1 0 0 1 0 ...
//! playerloc 2 0
//! sound buzz
//! state attract mazegen
//! lightnodes 2 0.0.1 0.1.1
//! ```

use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Wall state
// ---------------------------------------------------------------------------

/// The state of one wall (one light beam) in the maze.
///
/// On the wire each state is a single digit, see [`WallState::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WallState {
    /// Carved passage. No beam needed, walking through is a legal move.
    #[default]
    Open,
    /// Intact wall with an active beam.
    Unhit,
    /// A wall the player already walked through. Stays broken for the
    /// rest of the round.
    Hit,
    /// The entry hole on the grid perimeter.
    Start,
    /// The exit hole on the grid perimeter.
    End,
}

impl WallState {
    /// All states in wire-code order.
    pub const ALL: [WallState; 5] = [
        WallState::Open,
        WallState::Unhit,
        WallState::Hit,
        WallState::Start,
        WallState::End,
    ];

    /// The digit used for this state in a `maze` message.
    pub fn code(self) -> u8 {
        match self {
            Self::Open => 0,
            Self::Unhit => 1,
            Self::Hit => 2,
            Self::Start => 3,
            Self::End => 4,
        }
    }

    /// Maps a wire digit back to a state. Returns `None` for codes > 4.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Whether a player may walk through this wall without penalty.
    pub fn is_passable(self) -> bool {
        matches!(self, Self::Open | Self::Start | Self::End)
    }
}

impl fmt::Display for WallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Open => "open",
            Self::Unhit => "unhit",
            Self::Hit => "hit",
            Self::Start => "start",
            Self::End => "end",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Beams
// ---------------------------------------------------------------------------

/// Which of the two wall arrays a beam belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// A horizontal beam: the wall between cell `(x, y)` and `(x, y - 1)`.
    Horizontal,
    /// A vertical beam: the wall between cell `(x, y)` and `(x - 1, y)`.
    Vertical,
}

impl Orientation {
    /// Single-letter wire token (`h` or `v`).
    pub fn token(self) -> &'static str {
        match self {
            Self::Horizontal => "h",
            Self::Vertical => "v",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Whether a beam was re-formed or interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BeamAction {
    /// The beam is whole again (`m`).
    Make,
    /// Something is standing in the beam (`b`).
    Break,
}

impl BeamAction {
    /// Single-letter wire token (`m` or `b`).
    pub fn token(self) -> &'static str {
        match self {
            Self::Make => "m",
            Self::Break => "b",
        }
    }
}

/// A single beam sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BeamEvent {
    pub action: BeamAction,
    pub orientation: Orientation,
    pub x: i32,
    pub y: i32,
}

impl BeamEvent {
    /// Shorthand for a break event, the only kind the engine acts on.
    pub fn broken(orientation: Orientation, x: i32, y: i32) -> Self {
        Self {
            action: BeamAction::Break,
            orientation,
            x,
            y,
        }
    }

    /// Shorthand for a make event.
    pub fn made(orientation: Orientation, x: i32, y: i32) -> Self {
        Self {
            action: BeamAction::Make,
            orientation,
            x,
            y,
        }
    }

    pub fn is_break(&self) -> bool {
        self.action == BeamAction::Break
    }
}

// ---------------------------------------------------------------------------
// Game state
// ---------------------------------------------------------------------------

/// The maze engine's game state, as announced in `state` messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Process just started, nothing announced yet.
    #[default]
    Init,
    /// Waiting for someone to walk into the grid. Lights play an idle show.
    Attract,
    /// A maze is being generated; sound cues are playing.
    MazeGen,
    /// A round is in progress.
    InGame,
}

impl GameState {
    /// Lowercase wire name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Attract => "attract",
            Self::MazeGen => "mazegen",
            Self::InGame => "ingame",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "init" => Ok(Self::Init),
            "attract" => Ok(Self::Attract),
            "mazegen" => Ok(Self::MazeGen),
            "ingame" => Ok(Self::InGame),
            other => Err(format!("unknown game state {other:?}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Maze snapshot
// ---------------------------------------------------------------------------

/// Largest grid a `maze` message may declare.
///
/// A 127×127 grid already needs 32 512 wall digits, which together with
/// their separators fill a maximum-size UDP datagram.
pub const MAX_GRID_SIZE: usize = 127;

/// A full maze as carried by the `maze` message: a square grid of
/// `size × size` cells and the state of every wall around them.
///
/// - `horizontal[y][x]` is the wall between cell `(x, y)` and `(x, y - 1)`;
///   there are `size + 1` rows of `size` walls.
/// - `vertical[y][x]` is the wall between cell `(x, y)` and `(x - 1, y)`;
///   there are `size` rows of `size + 1` walls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeSnapshot {
    pub size: usize,
    pub horizontal: Vec<Vec<WallState>>,
    pub vertical: Vec<Vec<WallState>>,
}

impl MazeSnapshot {
    /// A snapshot with every wall open.
    pub fn open(size: usize) -> Self {
        Self {
            size,
            horizontal: vec![vec![WallState::Open; size]; size + 1],
            vertical: vec![vec![WallState::Open; size + 1]; size],
        }
    }

    /// Number of wall digits a `maze` message for this size carries.
    pub fn wall_count(size: usize) -> usize {
        2 * size * (size + 1)
    }

    /// All walls in wire order: horizontal rows first, then vertical rows.
    pub fn walls(&self) -> impl Iterator<Item = WallState> + '_ {
        self.horizontal
            .iter()
            .chain(self.vertical.iter())
            .flat_map(|row| row.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// Lighting nodes
// ---------------------------------------------------------------------------

/// Address of one discovered lighting-controller output port.
///
/// Written on the wire as `universe.subuniverse.port`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LightNode {
    pub universe: u16,
    pub subuniverse: u16,
    pub port: u16,
}

impl fmt::Display for LightNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.universe, self.subuniverse, self.port)
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// Every message that can travel over the bus.
///
/// Decoding produces one of these variants, and consumers `match` on it;
/// there is no callback registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A beam was made or broken (`beam m|b h|v x y`).
    Beam(BeamEvent),
    /// Free-text telemetry (`event source "text"`).
    Event { source: String, text: String },
    /// Full maze snapshot (`maze N digits...`).
    Maze(MazeSnapshot),
    /// Most-likely player cell (`playerloc x y`).
    PlayerLoc { x: i32, y: i32 },
    /// Request to play a named audio cue (`sound cue`).
    Sound(String),
    /// State machine transition (`state old new`).
    State { from: GameState, to: GameState },
    /// Discovered lighting outputs (`lightnodes count u.s.p...`).
    LightNodes(Vec<LightNode>),
}

impl Message {
    /// Builds an `event` message.
    pub fn event(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Event {
            source: source.into(),
            text: text.into(),
        }
    }

    /// Builds a `sound` message.
    pub fn sound(cue: impl Into<String>) -> Self {
        Self::Sound(cue.into())
    }

    /// The leading wire token for this message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Beam(_) => "beam",
            Self::Event { .. } => "event",
            Self::Maze(_) => "maze",
            Self::PlayerLoc { .. } => "playerloc",
            Self::Sound(_) => "sound",
            Self::State { .. } => "state",
            Self::LightNodes(_) => "lightnodes",
        }
    }
}

/// `Display` writes the exact wire text of the message.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Beam(beam) => write!(
                f,
                "beam {} {} {} {}",
                beam.action.token(),
                beam.orientation,
                beam.x,
                beam.y
            ),
            Self::Event { source, text } => {
                // A stray quote would split the quoted token in two.
                write!(f, "event {source} \"{}\"", text.replace('"', "'"))
            }
            Self::Maze(snapshot) => {
                write!(f, "maze {}", snapshot.size)?;
                for wall in snapshot.walls() {
                    write!(f, " {}", wall.code())?;
                }
                Ok(())
            }
            Self::PlayerLoc { x, y } => write!(f, "playerloc {x} {y}"),
            Self::Sound(cue) => write!(f, "sound {cue}"),
            Self::State { from, to } => write!(f, "state {from} {to}"),
            Self::LightNodes(nodes) => {
                write!(f, "lightnodes {}", nodes.len())?;
                for node in nodes {
                    write!(f, " {node}")?;
                }
                Ok(())
            }
        }
    }
}
