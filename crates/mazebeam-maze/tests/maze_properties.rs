//! Structural properties every generated maze must have, checked across
//! many seeds and grid shapes.

use std::collections::HashSet;

use mazebeam_maze::{Cell, Edge, Maze, MazeError};
use mazebeam_protocol::{Codec, Message, Orientation, TextCodec, WallState};

/// Flood fill from the start cell through passable walls.
fn reachable(maze: &Maze) -> HashSet<Cell> {
    let mut seen = HashSet::from([maze.start()]);
    let mut frontier = vec![maze.start()];
    while let Some(cell) = frontier.pop() {
        for next in maze.passages(cell) {
            if seen.insert(next) {
                frontier.push(next);
            }
        }
    }
    seen
}

// =========================================================================
// Perfect-maze topology
// =========================================================================

#[test]
fn test_generated_maze_is_a_spanning_tree() {
    for (width, height) in [(1, 1), (2, 2), (4, 4), (7, 3), (3, 9), (16, 16)] {
        for seed in 0..10 {
            let maze = Maze::builder(width, height).seed(seed).build().unwrap();

            assert_eq!(
                maze.open_interior_walls(),
                width * height - 1,
                "{width}x{height} seed {seed}: interior openings"
            );
            assert_eq!(
                reachable(&maze).len(),
                width * height,
                "{width}x{height} seed {seed}: every cell reachable"
            );
        }
    }
}

#[test]
fn test_walls_start_unhit_or_open() {
    let maze = Maze::builder(6, 6).start(0, 2).seed(21).build().unwrap();
    let states: HashSet<WallState> = maze
        .horizontal_walls()
        .iter()
        .chain(maze.vertical_walls())
        .flatten()
        .copied()
        .collect();
    assert!(!states.contains(&WallState::Hit));
    assert!(states.contains(&WallState::Unhit));
    assert!(states.contains(&WallState::Open));
}

#[test]
fn test_large_grid_does_not_overflow_stack() {
    let maze = Maze::builder(127, 127).seed(1).build().unwrap();
    assert_eq!(maze.open_interior_walls(), 127 * 127 - 1);
}

// =========================================================================
// Start / end placement
// =========================================================================

#[test]
fn test_four_by_four_top_entry_mirrors_to_bottom() {
    let maze = Maze::generate(4, 4, Some(2), Some(0)).unwrap();
    assert_eq!(maze.start(), Cell::new(2, 0));
    assert_eq!(maze.end(), Cell::new(1, 3));
    assert_eq!(maze.wall(Orientation::Horizontal, 2, 0), Some(WallState::Start));
    assert_eq!(maze.wall(Orientation::Horizontal, 1, 4), Some(WallState::End));
}

#[test]
fn test_end_is_opposite_start_for_every_edge() {
    let cases = [
        // (start, entry, expected end, exit wall orientation/x/y)
        ((1, 0), Edge::Top, (3, 4), (Orientation::Horizontal, 3, 5)),
        ((1, 4), Edge::Bottom, (3, 0), (Orientation::Horizontal, 3, 0)),
        ((0, 1), Edge::Left, (4, 3), (Orientation::Vertical, 5, 3)),
        ((4, 1), Edge::Right, (0, 3), (Orientation::Vertical, 0, 3)),
    ];
    for ((sx, sy), entry, (ex, ey), (o, wx, wy)) in cases {
        let maze = Maze::builder(5, 5)
            .start(sx, sy)
            .entry(entry)
            .seed(4)
            .build()
            .unwrap();
        assert_eq!(maze.entry_edge(), entry);
        assert_eq!(maze.end(), Cell::new(ex, ey), "entry {entry}");
        assert_eq!(maze.wall(o, wx, wy), Some(WallState::End), "entry {entry}");
    }
}

#[test]
fn test_start_row_defaults_to_top() {
    let maze = Maze::generate(5, 5, Some(3), None).unwrap();
    assert_eq!(maze.start(), Cell::new(3, 0));
}

#[test]
fn test_random_start_column_stays_on_grid() {
    for _ in 0..50 {
        let maze = Maze::generate(8, 8, None, None).unwrap();
        assert!(maze.start().x < 8);
        assert_eq!(maze.start().y, 0);
    }
}

// =========================================================================
// Invalid parameters
// =========================================================================

#[test]
fn test_interior_start_is_rejected() {
    let err = Maze::generate(5, 5, Some(2), Some(2)).unwrap_err();
    assert_eq!(err, MazeError::StartNotOnBoundary { x: 2, y: 2 });
}

#[test]
fn test_side_column_start_may_use_any_row() {
    assert!(Maze::generate(5, 5, Some(0), Some(2)).is_ok());
    assert!(Maze::generate(5, 5, Some(4), Some(3)).is_ok());
}

#[test]
fn test_off_grid_start_is_rejected() {
    let err = Maze::generate(4, 4, Some(4), Some(0)).unwrap_err();
    assert!(matches!(err, MazeError::StartOffGrid { x: 4, .. }));
}

#[test]
fn test_empty_grid_is_rejected() {
    assert_eq!(
        Maze::generate(0, 3, None, None).unwrap_err(),
        MazeError::EmptyGrid { width: 0, height: 3 }
    );
}

// =========================================================================
// Wire snapshot
// =========================================================================

#[test]
fn test_snapshot_survives_the_wire() {
    let maze = Maze::builder(4, 4).start(2, 0).seed(99).build().unwrap();
    let snapshot = maze.to_snapshot().unwrap();
    assert_eq!(snapshot.horizontal, maze.horizontal_walls());
    assert_eq!(snapshot.vertical, maze.vertical_walls());

    let codec = TextCodec;
    let bytes = codec.encode(&Message::Maze(snapshot.clone()));
    let text = String::from_utf8(bytes.clone()).unwrap();
    assert!(text.starts_with("maze 4 "));
    assert_eq!(text.split_whitespace().count(), 2 + 40);

    assert_eq!(codec.decode(&bytes).unwrap(), Message::Maze(snapshot));
}
