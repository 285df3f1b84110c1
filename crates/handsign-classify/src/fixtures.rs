//! Hand-shape fixtures shared by the unit tests.
//!
//! Shapes are written in a wrist-origin frame whose bounding box has unit
//! height (y grows downward, so raised fingers have negative y), then
//! placed into image coordinates so normalization has real work to do.

use handsign_core::{Landmark, HAND_LANDMARK_COUNT};

type Shape = [(f64, f64); HAND_LANDMARK_COUNT];

const CURLED_FINGERS: [(f64, f64); 16] = [
    (0.10, -0.80),
    (0.10, -1.00),
    (0.10, -0.60),
    (0.10, -0.20),
    (0.00, -0.80),
    (0.00, -1.00),
    (0.00, -0.60),
    (0.00, -0.20),
    (-0.10, -0.80),
    (-0.10, -1.00),
    (-0.10, -0.60),
    (-0.10, -0.20),
    (-0.20, -0.80),
    (-0.20, -1.00),
    (-0.20, -0.60),
    (-0.20, -0.20),
];

fn with_curled_fingers(thumb: [(f64, f64); 4]) -> Shape {
    let mut shape = [(0.0, 0.0); HAND_LANDMARK_COUNT];
    shape[1..5].copy_from_slice(&thumb);
    shape[5..].copy_from_slice(&CURLED_FINGERS);
    shape
}

fn place(shape: &Shape, origin: (f64, f64), scale: f64) -> Vec<Landmark> {
    shape
        .iter()
        .map(|(x, y)| Landmark::new(origin.0 + x * scale, origin.1 + y * scale, 0.0))
        .collect()
}

/// Closed fist, thumb out to the side, low openness: `A`
pub fn fist_thumb_side() -> Vec<Landmark> {
    let shape = with_curled_fingers([(0.10, -0.10), (0.15, -0.20), (0.15, -0.25), (0.25, -0.25)]);
    place(&shape, (0.5, 0.8), 0.3)
}

/// Closed fist with the thumb folded in: `E`
pub fn curled_fist() -> Vec<Landmark> {
    let shape = with_curled_fingers([(0.10, -0.10), (0.15, -0.20), (0.15, -0.35), (0.10, -0.45)]);
    place(&shape, (0.4, 0.7), 0.25)
}

/// Index finger pointing sideways, thumb tucked: `D` at the first stage
pub fn level_index_point() -> Vec<Landmark> {
    let mut shape =
        with_curled_fingers([(0.10, -0.10), (0.15, -0.20), (0.15, -0.35), (0.10, -0.35)]);
    shape[5] = (0.10, -0.80);
    shape[6] = (0.30, -0.90);
    shape[7] = (0.50, -0.95);
    shape[8] = (0.70, -1.00);
    place(&shape, (0.3, 0.9), 0.4)
}

/// Four fingers up, thumb across the palm: `B`
pub fn flat_hand() -> Vec<Landmark> {
    let mut shape = [(0.0, 0.0); HAND_LANDMARK_COUNT];
    shape[1] = (0.10, -0.10);
    shape[2] = (0.15, -0.20);
    shape[3] = (0.15, -0.35);
    shape[4] = (0.10, -0.45);
    for (mcp, x) in [(5usize, 0.15), (9, 0.05), (13, -0.05), (17, -0.15)] {
        shape[mcp] = (x, -0.40);
        shape[mcp + 1] = (x, -0.60);
        shape[mcp + 2] = (x, -0.80);
        shape[mcp + 3] = (x, -1.00);
    }
    place(&shape, (0.6, 0.95), 0.5)
}

/// Index and middle fingers raised, ring and pinky curled, thumb tucked
pub fn two_fingers_up() -> Vec<Landmark> {
    let mut shape = with_curled_fingers([(0.10, -0.10), (0.15, -0.20), (0.15, -0.35), (0.10, -0.45)]);
    for (mcp, x) in [(5usize, 0.15), (9, 0.05)] {
        shape[mcp] = (x, -0.40);
        shape[mcp + 1] = (x, -0.60);
        shape[mcp + 2] = (x, -0.80);
        shape[mcp + 3] = (x, -1.00);
    }
    place(&shape, (0.45, 0.85), 0.35)
}
