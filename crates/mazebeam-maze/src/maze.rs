//! The maze model and its generator.

use mazebeam_protocol::{MazeSnapshot, Orientation, WallState};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::{Cell, Edge, MazeError};

/// The four cardinal steps the backtracker tries from every cell.
const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

// ---------------------------------------------------------------------------
// Maze
// ---------------------------------------------------------------------------

/// A generated maze.
///
/// Topology is fixed once built: walls never appear or disappear, only
/// their state changes (an `Unhit` wall becomes `Hit`).
///
/// - `horizontal[y][x]` is the wall between cell `(x, y)` and `(x, y - 1)`,
///   `height + 1` rows of `width` walls (row 0 and row `height` are the
///   top and bottom boundary).
/// - `vertical[y][x]` is the wall between cell `(x, y)` and `(x - 1, y)`,
///   `height` rows of `width + 1` walls (column 0 and column `width` are
///   the left and right boundary).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    width: usize,
    height: usize,
    horizontal: Vec<Vec<WallState>>,
    vertical: Vec<Vec<WallState>>,
    start: Cell,
    end: Cell,
    entry: Edge,
}

impl Maze {
    /// Generates a maze with an unseeded random source.
    ///
    /// `start_x` defaults to a random column and `start_y` to the top row.
    ///
    /// # Errors
    /// See [`MazeBuilder::build`].
    pub fn generate(
        width: usize,
        height: usize,
        start_x: Option<usize>,
        start_y: Option<usize>,
    ) -> Result<Self, MazeError> {
        let mut builder = MazeBuilder::new(width, height);
        builder.start_x = start_x;
        builder.start_y = start_y;
        builder.build()
    }

    /// Starts configuring a new maze.
    pub fn builder(width: usize, height: usize) -> MazeBuilder {
        MazeBuilder::new(width, height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The entry cell.
    pub fn start(&self) -> Cell {
        self.start
    }

    /// The exit cell.
    pub fn end(&self) -> Cell {
        self.end
    }

    /// The perimeter side the entry wall is on.
    pub fn entry_edge(&self) -> Edge {
        self.entry
    }

    /// The perimeter side the exit wall is on.
    pub fn exit_edge(&self) -> Edge {
        self.entry.opposite()
    }

    pub fn horizontal_walls(&self) -> &[Vec<WallState>] {
        &self.horizontal
    }

    pub fn vertical_walls(&self) -> &[Vec<WallState>] {
        &self.vertical
    }

    /// The state of one wall, `None` if the coordinates name no wall.
    pub fn wall(&self, orientation: Orientation, x: usize, y: usize) -> Option<WallState> {
        self.walls(orientation).get(y)?.get(x).copied()
    }

    /// Changes the state of one wall and returns its previous state, or
    /// `None` (and changes nothing) if the coordinates name no wall.
    pub fn set_wall(
        &mut self,
        orientation: Orientation,
        x: usize,
        y: usize,
        state: WallState,
    ) -> Option<WallState> {
        let walls = match orientation {
            Orientation::Horizontal => &mut self.horizontal,
            Orientation::Vertical => &mut self.vertical,
        };
        let wall = walls.get_mut(y)?.get_mut(x)?;
        Some(std::mem::replace(wall, state))
    }

    /// Whether `(x, y)` is a cell of this grid. Takes signed coordinates so
    /// wire values can be checked directly.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        usize::try_from(x).is_ok_and(|x| x < self.width)
            && usize::try_from(y).is_ok_and(|y| y < self.height)
    }

    /// Whether the wall lies on the outer boundary of the grid.
    pub fn is_boundary_wall(&self, orientation: Orientation, x: usize, y: usize) -> bool {
        match orientation {
            Orientation::Horizontal => y == 0 || y == self.height,
            Orientation::Vertical => x == 0 || x == self.width,
        }
    }

    /// Number of interior walls in the `Open` state. A freshly generated
    /// maze has exactly `width * height - 1`.
    pub fn open_interior_walls(&self) -> usize {
        let horizontal = self.horizontal[1..self.height]
            .iter()
            .flatten()
            .filter(|w| **w == WallState::Open)
            .count();
        let vertical = self
            .vertical
            .iter()
            .flat_map(|row| &row[1..self.width])
            .filter(|w| **w == WallState::Open)
            .count();
        horizontal + vertical
    }

    /// Cells reachable from `cell` in one step through a passable wall.
    pub fn passages(&self, cell: Cell) -> Vec<Cell> {
        let Cell { x, y } = cell;
        let mut out = Vec::with_capacity(4);
        if y > 0 && self.horizontal[y][x].is_passable() {
            out.push(Cell::new(x, y - 1));
        }
        if y + 1 < self.height && self.horizontal[y + 1][x].is_passable() {
            out.push(Cell::new(x, y + 1));
        }
        if x > 0 && self.vertical[y][x].is_passable() {
            out.push(Cell::new(x - 1, y));
        }
        if x + 1 < self.width && self.vertical[y][x + 1].is_passable() {
            out.push(Cell::new(x + 1, y));
        }
        out
    }

    /// Converts to the wire snapshot carried by the `maze` message.
    ///
    /// # Errors
    /// [`MazeError::NotSquare`] if the maze is not square, since the wire format
    /// has a single size field.
    pub fn to_snapshot(&self) -> Result<MazeSnapshot, MazeError> {
        if self.width != self.height {
            return Err(MazeError::NotSquare {
                width: self.width,
                height: self.height,
            });
        }
        Ok(MazeSnapshot {
            size: self.width,
            horizontal: self.horizontal.clone(),
            vertical: self.vertical.clone(),
        })
    }

    /// Draws the maze as ASCII art for debug logs. `S` and `E` mark the
    /// start and end cells; every non-passable wall is drawn.
    pub fn render_ascii(&self) -> String {
        let mut out = String::new();
        let horizontal_line = |out: &mut String, row: &[WallState]| {
            out.push('+');
            for wall in row {
                out.push_str(if wall.is_passable() { "   +" } else { "---+" });
            }
            out.push('\n');
        };

        horizontal_line(&mut out, &self.horizontal[0]);
        for y in 0..self.height {
            out.push(if self.vertical[y][0].is_passable() { ' ' } else { '|' });
            for x in 0..self.width {
                let cell = Cell::new(x, y);
                out.push_str(if cell == self.start {
                    " S "
                } else if cell == self.end {
                    " E "
                } else {
                    "   "
                });
                out.push(if self.vertical[y][x + 1].is_passable() { ' ' } else { '|' });
            }
            out.push('\n');
            horizontal_line(&mut out, &self.horizontal[y + 1]);
        }
        out
    }

    fn walls(&self, orientation: Orientation) -> &[Vec<WallState>] {
        match orientation {
            Orientation::Horizontal => &self.horizontal,
            Orientation::Vertical => &self.vertical,
        }
    }

    /// The boundary wall in front of `cell` on `edge`.
    fn boundary_wall_mut(&mut self, edge: Edge, cell: Cell) -> &mut WallState {
        match edge {
            Edge::Top => &mut self.horizontal[0][cell.x],
            Edge::Bottom => &mut self.horizontal[self.height][cell.x],
            Edge::Left => &mut self.vertical[cell.y][0],
            Edge::Right => &mut self.vertical[cell.y][self.width],
        }
    }

    fn open_between(&mut self, a: Cell, b: Cell) {
        if a.x == b.x {
            self.horizontal[a.y.max(b.y)][a.x] = WallState::Open;
        } else {
            self.vertical[a.y][a.x.max(b.x)] = WallState::Open;
        }
    }

    fn step(&self, cell: Cell, (dx, dy): (isize, isize)) -> Option<Cell> {
        let x = cell.x.checked_add_signed(dx)?;
        let y = cell.y.checked_add_signed(dy)?;
        (x < self.width && y < self.height).then_some(Cell::new(x, y))
    }

    /// Randomized depth-first backtracker with an explicit stack, so deep
    /// grids can't overflow the call stack.
    fn carve<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let width = self.width;
        let mut visited = vec![false; width * self.height];
        visited[self.start.y * width + self.start.x] = true;

        let mut stack = vec![Frame::new(self.start, rng)];
        while let Some(frame) = stack.last_mut() {
            let Some(direction) = frame.remaining.pop() else {
                stack.pop();
                continue;
            };
            let current = frame.cell;

            let Some(next) = self.step(current, direction) else {
                continue;
            };
            let index = next.y * width + next.x;
            if visited[index] {
                continue;
            }

            self.open_between(current, next);
            visited[index] = true;
            stack.push(Frame::new(next, rng));
        }
    }
}

/// One cell on the backtracker's stack and the directions it has yet to try.
struct Frame {
    cell: Cell,
    remaining: Vec<(isize, isize)>,
}

impl Frame {
    fn new<R: Rng + ?Sized>(cell: Cell, rng: &mut R) -> Self {
        let mut remaining = DIRECTIONS.to_vec();
        remaining.shuffle(rng);
        Self { cell, remaining }
    }
}

// ---------------------------------------------------------------------------
// MazeBuilder
// ---------------------------------------------------------------------------

/// Options for generating a [`Maze`].
///
/// # Example
///
/// ```rust
/// use mazebeam_maze::{Cell, Maze};
///
/// let maze = Maze::builder(4, 4).start(2, 0).seed(7).build().unwrap();
/// assert_eq!(maze.start(), Cell::new(2, 0));
/// assert_eq!(maze.end(), Cell::new(1, 3));
/// assert_eq!(maze.open_interior_walls(), 15);
/// ```
#[derive(Debug, Clone)]
pub struct MazeBuilder {
    width: usize,
    height: usize,
    start_x: Option<usize>,
    start_y: Option<usize>,
    entry: Option<Edge>,
    seed: Option<u64>,
}

impl MazeBuilder {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            start_x: None,
            start_y: None,
            entry: None,
            seed: None,
        }
    }

    /// Sets the entry cell.
    pub fn start(mut self, x: usize, y: usize) -> Self {
        self.start_x = Some(x);
        self.start_y = Some(y);
        self
    }

    /// Sets which perimeter side the entry hole is cut in. Only needed
    /// for corner cells; otherwise the side is inferred.
    pub fn entry(mut self, edge: Edge) -> Self {
        self.entry = Some(edge);
        self
    }

    /// Makes generation deterministic.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Generates the maze using the configured seed, or the thread-local
    /// random source when no seed is set.
    ///
    /// # Errors
    /// - [`MazeError::EmptyGrid`] if either dimension is zero
    /// - [`MazeError::StartOffGrid`] if the start cell is outside the grid
    /// - [`MazeError::StartNotOnBoundary`] if the start cell touches no edge
    /// - [`MazeError::EdgeMismatch`] if the requested entry edge doesn't
    ///   border the start cell
    pub fn build(self) -> Result<Maze, MazeError> {
        match self.seed {
            Some(seed) => self.build_with(&mut StdRng::seed_from_u64(seed)),
            None => self.build_with(&mut rand::rng()),
        }
    }

    /// Generates the maze drawing randomness from `rng`. Any configured
    /// seed is ignored.
    pub fn build_with<R: Rng + ?Sized>(self, rng: &mut R) -> Result<Maze, MazeError> {
        let Self { width, height, .. } = self;
        if width == 0 || height == 0 {
            return Err(MazeError::EmptyGrid { width, height });
        }

        let x = self.start_x.unwrap_or_else(|| rng.random_range(0..width));
        let y = self.start_y.unwrap_or(0);
        if x >= width || y >= height {
            return Err(MazeError::StartOffGrid { x, y, width, height });
        }
        let start = Cell::new(x, y);

        let entry = match self.entry {
            Some(edge) if edge.touches(start, width, height) => edge,
            Some(edge) => return Err(MazeError::EdgeMismatch { x, y, edge }),
            None => Edge::infer(start, width, height)
                .ok_or(MazeError::StartNotOnBoundary { x, y })?,
        };

        // The exit mirrors the entry on the opposite side.
        let end = match entry {
            Edge::Top => Cell::new(width - 1 - x, height - 1),
            Edge::Bottom => Cell::new(width - 1 - x, 0),
            Edge::Left => Cell::new(width - 1, height - 1 - y),
            Edge::Right => Cell::new(0, height - 1 - y),
        };

        let mut maze = Maze {
            width,
            height,
            horizontal: vec![vec![WallState::Unhit; width]; height + 1],
            vertical: vec![vec![WallState::Unhit; width + 1]; height],
            start,
            end,
            entry,
        };

        maze.carve(rng);
        *maze.boundary_wall_mut(entry, start) = WallState::Start;
        *maze.boundary_wall_mut(entry.opposite(), end) = WallState::End;

        tracing::debug!(%start, %end, %entry, width, height, "maze generated");
        Ok(maze)
    }
}
