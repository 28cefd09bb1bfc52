//! The maze game state machine.
//!
//! [`MazeEngine`] is pure: it consumes decoded messages and returns the
//! messages (and pacing holds) that should go back out on the bus. It
//! never touches a socket or a clock, so every transition can be tested
//! synchronously. [`EngineDriver`](crate::EngineDriver) does the I/O.

use std::time::Duration;

use mazebeam_maze::{Cell, Edge, Maze};
use mazebeam_protocol::{BeamEvent, GameState, Message, Orientation, WallState, MAX_GRID_SIZE};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, trace};

use crate::{EngineConfig, EngineError, PlayerLocation};

/// Names of the audio cues the engine requests.
pub mod cue {
    /// Played when a player breaks a beam in attract mode.
    pub const ROUND_START: &str = "mazegenstart";
    /// Played while the maze is being generated.
    pub const GENERATING: &str = "mazegen";
    /// Played just before the new maze is revealed.
    pub const GENERATED: &str = "mazegendone";
    /// Negative feedback for walking through a wall.
    pub const WALL_HIT: &str = "buzz";
    /// Played when the player leaves through the exit.
    pub const ROUND_COMPLETE: &str = "mazecomplete";
}

/// One step of the engine's response to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Put a message on the bus.
    Send(Message),
    /// Pause before the next step so audio and lighting can keep up.
    Hold(Duration),
}

/// Whether the state machine has a `from` → `to` edge.
///
/// ```text
/// init → attract → mazegen → ingame
///           ↑                   │
///           └───────────────────┘
/// ```
pub fn is_valid_transition(from: GameState, to: GameState) -> bool {
    matches!(
        (from, to),
        (GameState::Init, GameState::Attract)
            | (GameState::Attract, GameState::MazeGen)
            | (GameState::MazeGen, GameState::InGame)
            | (GameState::InGame, GameState::Attract)
    )
}

/// Maps a perimeter beam to the cell behind it and the side it's on.
///
/// Horizontal beam row `height` is the bottom boundary, so it maps to the
/// last row of cells; vertical beam column `width` likewise maps to the
/// last column. Interior and off-grid beams map to `None`.
pub fn perimeter_cell(
    orientation: Orientation,
    x: i32,
    y: i32,
    width: usize,
    height: usize,
) -> Option<(Cell, Edge)> {
    let x = usize::try_from(x).ok()?;
    let y = usize::try_from(y).ok()?;
    match orientation {
        Orientation::Horizontal if x < width => {
            if y == 0 {
                Some((Cell::new(x, 0), Edge::Top))
            } else if y == height {
                Some((Cell::new(x, height - 1), Edge::Bottom))
            } else {
                None
            }
        }
        Orientation::Vertical if y < height => {
            if x == 0 {
                Some((Cell::new(0, y), Edge::Left))
            } else if x == width {
                Some((Cell::new(width - 1, y), Edge::Right))
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Picks the start cell and entry edge for a beam broken in attract mode.
///
/// A beam on the outer boundary maps through [`perimeter_cell`]. Otherwise
/// the beam's coordinates are taken as a cell, which can start a maze if it
/// lies in the outer ring. At a corner the beam's orientation picks the
/// edge: horizontal beams prefer top or bottom, vertical beams left or right.
pub fn round_start(
    orientation: Orientation,
    x: i32,
    y: i32,
    width: usize,
    height: usize,
) -> Option<(Cell, Edge)> {
    if let Some(found) = perimeter_cell(orientation, x, y, width, height) {
        return Some(found);
    }
    let cell = Cell::new(usize::try_from(x).ok()?, usize::try_from(y).ok()?);
    if cell.x >= width || cell.y >= height {
        return None;
    }
    let preferred = match orientation {
        Orientation::Horizontal => [Edge::Top, Edge::Bottom],
        Orientation::Vertical => [Edge::Left, Edge::Right],
    };
    preferred
        .into_iter()
        .chain(Edge::PRIORITY)
        .find(|edge| edge.touches(cell, width, height))
        .map(|edge| (cell, edge))
}

// ---------------------------------------------------------------------------
// MazeEngine
// ---------------------------------------------------------------------------

/// The game: current state, the maze in play, and where the player is.
#[derive(Debug)]
pub struct MazeEngine {
    config: EngineConfig,
    state: GameState,
    maze: Option<Maze>,
    player: Option<PlayerLocation>,
    rng: StdRng,
}

impl MazeEngine {
    /// Creates an engine in the `init` state.
    ///
    /// # Errors
    /// [`EngineError::InvalidGridSize`] if the grid is empty or too large
    /// for the wire format.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        if config.grid_size == 0 || config.grid_size > MAX_GRID_SIZE {
            return Err(EngineError::InvalidGridSize {
                size: config.grid_size,
                max: MAX_GRID_SIZE,
            });
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            config,
            state: GameState::Init,
            maze: None,
            player: None,
            rng,
        })
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// The maze in play, if a round is running.
    pub fn maze(&self) -> Option<&Maze> {
        self.maze.as_ref()
    }

    pub fn player(&self) -> Option<&PlayerLocation> {
        self.player.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Leaves `init` for `attract`. Called once when the engine comes up.
    pub fn start(&mut self) -> Result<Vec<Outbound>, EngineError> {
        let mut out = Vec::new();
        self.transition(GameState::Attract, &mut out)?;
        Ok(out)
    }

    /// Reacts to one message from the bus.
    ///
    /// Only beam breaks drive the game. Beam makes are ignored, as is every
    /// other message type (including the engine's own broadcasts, which
    /// the bus reflects back to it).
    pub fn handle(&mut self, msg: &Message) -> Result<Vec<Outbound>, EngineError> {
        match msg {
            Message::Beam(beam) if beam.is_break() => self.beam_broken(beam),
            other => {
                trace!(kind = other.kind(), "ignoring message");
                Ok(Vec::new())
            }
        }
    }

    fn beam_broken(&mut self, beam: &BeamEvent) -> Result<Vec<Outbound>, EngineError> {
        match self.state {
            GameState::Attract => self.start_round(beam),
            GameState::InGame => self.play(beam),
            state => {
                debug!(%state, ?beam, "beam break outside a round, ignoring");
                Ok(Vec::new())
            }
        }
    }

    /// Attract mode: a break on the maze boundary starts a round with its
    /// cell as the entrance.
    fn start_round(&mut self, beam: &BeamEvent) -> Result<Vec<Outbound>, EngineError> {
        let size = self.config.grid_size;
        let Some((start, edge)) = round_start(beam.orientation, beam.x, beam.y, size, size)
        else {
            return Ok(vec![self.event(format!(
                "{} is not on the maze boundary, waiting for a boundary beam",
                wall_label(beam)
            ))]);
        };

        // Generate first so a failure leaves the state untouched.
        let maze = Maze::builder(size, size)
            .start(start.x, start.y)
            .entry(edge)
            .build_with(&mut self.rng)?;
        let snapshot = maze.to_snapshot()?;
        debug!(%start, end = %maze.end(), "new maze\n{}", maze.render_ascii());

        // Cells are bounded by MAX_GRID_SIZE, so they fit in an i32.
        let player = PlayerLocation::at(start.x as i32, start.y as i32);

        let mut out = vec![
            Outbound::Send(Message::sound(cue::ROUND_START)),
            Outbound::Hold(self.config.start_cue_hold()),
        ];
        self.transition(GameState::MazeGen, &mut out)?;
        out.extend([
            Outbound::Send(Message::sound(cue::GENERATING)),
            Outbound::Hold(self.config.generate_cue_hold()),
            Outbound::Send(Message::sound(cue::GENERATED)),
            Outbound::Send(Message::Maze(snapshot)),
            Outbound::Send(player.to_message()),
        ]);
        self.maze = Some(maze);
        self.player = Some(player);
        self.transition(GameState::InGame, &mut out)?;
        Ok(out)
    }

    /// In game: a break either hits a wall or moves the player.
    fn play(&mut self, beam: &BeamEvent) -> Result<Vec<Outbound>, EngineError> {
        let label = wall_label(beam);
        let source = self.config.event_source.clone();
        let (Some(maze), Some(player)) = (self.maze.as_mut(), self.player.as_mut()) else {
            return Ok(Vec::new());
        };

        let found = usize::try_from(beam.x)
            .ok()
            .zip(usize::try_from(beam.y).ok())
            .and_then(|(x, y)| Some((x, y, maze.wall(beam.orientation, x, y)?)));
        let Some((x, y, wall)) = found else {
            return Ok(vec![event(&source, format!("{label} is outside the maze, ignoring"))]);
        };

        let mut out = Vec::new();
        let mut completed = false;
        match wall {
            WallState::Hit => {
                out.push(event(&source, format!("{label} was already hit, no action required")));
            }
            WallState::Unhit => {
                maze.set_wall(beam.orientation, x, y, WallState::Hit);
                out.push(Outbound::Send(Message::sound(cue::WALL_HIT)));
                out.push(Outbound::Send(Message::Maze(maze.to_snapshot()?)));
                out.push(event(&source, format!("{label} was unhit, is now hit")));
            }
            WallState::Open | WallState::Start | WallState::End => {
                out.push(event(&source, format!("{label} is open, updating player location")));
                let before = player.primary();
                let moved = player.cross(beam.orientation, beam.x, beam.y);
                debug!(?before, after = ?player.primary(), moved, "player location");
                out.push(Outbound::Send(player.to_message()));

                let (px, py) = player.primary();
                if moved && wall == WallState::End && !maze.contains(px, py) {
                    info!(exit = %label, "player reached the exit");
                    out.push(event(
                        &source,
                        format!("player left through the exit at {label}, round complete"),
                    ));
                    out.push(Outbound::Send(Message::sound(cue::ROUND_COMPLETE)));
                    completed = true;
                }
            }
        }

        if completed {
            self.maze = None;
            self.player = None;
            self.transition(GameState::Attract, &mut out)?;
        }
        Ok(out)
    }

    /// Moves to `to`, announcing it with an event and a `state` message.
    fn transition(&mut self, to: GameState, out: &mut Vec<Outbound>) -> Result<(), EngineError> {
        let from = self.state;
        if !is_valid_transition(from, to) {
            return Err(EngineError::InvalidTransition { from, to });
        }
        info!(%from, %to, "state changed");
        out.push(self.event(format!("state changed from {from} to {to}")));
        out.push(Outbound::Send(Message::State { from, to }));
        self.state = to;
        Ok(())
    }

    fn event(&self, text: String) -> Outbound {
        event(&self.config.event_source, text)
    }
}

fn event(source: &str, text: String) -> Outbound {
    Outbound::Send(Message::event(source, text))
}

/// `hwall 2.3` style label used in event text.
fn wall_label(beam: &BeamEvent) -> String {
    format!("{}wall {}.{}", beam.orientation.token(), beam.x, beam.y)
}
