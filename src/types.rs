use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 2D pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// An axis-aligned detection box in frame pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub confidence: f32,
}

impl BBox {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Whether the box lies fully inside a frame of the given dimensions
    pub fn contained_in(&self, frame_width: i32, frame_height: i32) -> bool {
        self.left >= 0 && self.top >= 0 && self.right <= frame_width && self.bottom <= frame_height
    }
}

/// Inferred direction of movement for a tracked object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Still,
    Unknown,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
            Direction::Still => "STILL",
            Direction::Unknown => "UNKNOWN",
        };
        write!(f, "{}", label)
    }
}

/// The coordinate axis along which movement is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// The frame edge used as the entry/exit reference line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Top,
    Bottom,
    Left,
    Right,
}

impl Boundary {
    /// The axis objects travel along when crossing this boundary
    pub fn movement_axis(&self) -> Axis {
        match self {
            Boundary::Top | Boundary::Bottom => Axis::Vertical,
            Boundary::Left | Boundary::Right => Axis::Horizontal,
        }
    }

    /// Direction that counts as entering the zone
    pub fn inbound(&self) -> Direction {
        match self {
            Boundary::Top => Direction::Down,
            Boundary::Bottom => Direction::Up,
            Boundary::Left => Direction::Right,
            Boundary::Right => Direction::Left,
        }
    }

    /// Direction that counts as leaving the zone
    pub fn outbound(&self) -> Direction {
        match self {
            Boundary::Top => Direction::Up,
            Boundary::Bottom => Direction::Down,
            Boundary::Left => Direction::Left,
            Boundary::Right => Direction::Right,
        }
    }

    /// Max deviation in pixels, perpendicular to the movement axis, for a
    /// point to remain an association candidate. Objects crossing a top or
    /// bottom boundary should barely drift in X, and vice versa.
    pub fn gate_tolerance(&self) -> i32 {
        match self.movement_axis() {
            Axis::Vertical => 50,
            Axis::Horizontal => 70,
        }
    }
}

impl FromStr for Boundary {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "top" | "t" => Ok(Boundary::Top),
            "bottom" | "b" => Ok(Boundary::Bottom),
            "left" | "l" => Ok(Boundary::Left),
            "right" | "r" => Ok(Boundary::Right),
            other => Err(anyhow::anyhow!(
                "invalid boundary {:?}: expected top, bottom, left or right",
                other
            )),
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Boundary::Top => "top",
            Boundary::Bottom => "bottom",
            Boundary::Left => "left",
            Boundary::Right => "right",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_direction_table() {
        assert_eq!(Boundary::Top.inbound(), Direction::Down);
        assert_eq!(Boundary::Top.outbound(), Direction::Up);
        assert_eq!(Boundary::Bottom.inbound(), Direction::Up);
        assert_eq!(Boundary::Bottom.outbound(), Direction::Down);
        assert_eq!(Boundary::Left.inbound(), Direction::Right);
        assert_eq!(Boundary::Left.outbound(), Direction::Left);
        assert_eq!(Boundary::Right.inbound(), Direction::Left);
        assert_eq!(Boundary::Right.outbound(), Direction::Right);
    }

    #[test]
    fn test_boundary_parsing() {
        assert_eq!("bottom".parse::<Boundary>().unwrap(), Boundary::Bottom);
        assert_eq!("T".parse::<Boundary>().unwrap(), Boundary::Top);
        assert!("middle".parse::<Boundary>().is_err());
    }

    #[test]
    fn test_point_distance() {
        let a = Point::new(0, 0);
        let b = Point::new(3, 4);
        assert!((a.distance(&b) - 5.0).abs() < f64::EPSILON);
    }
}
