//! Placement math: direction buckets, viewport clamping and linear moves.

use std::fmt;

use serde::{Deserialize, Serialize};

use sidekick_animation_core::Millis;

use crate::error::OrchestratorError;

/// A point in page pixels. For the assistant this is its top-left corner.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Visible area the assistant is kept inside.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Where a target lies as seen by the character. `Left` and `Right` are the
/// character's sides, not the screen's.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Up,
    Left,
    Down,
    /// Fallback for degrees outside every bucket.
    Top,
}

impl Direction {
    /// Animation name suffix.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Right => "Right",
            Direction::Up => "Up",
            Direction::Left => "Left",
            Direction::Down => "Down",
            Direction::Top => "Top",
        }
    }

    /// Bucket a whole-degree angle.
    pub fn from_degree(degree: f64) -> Self {
        if (-45.0..45.0).contains(&degree) {
            Direction::Right
        } else if (45.0..135.0).contains(&degree) {
            Direction::Up
        } else if (135.0..=180.0).contains(&degree) || (-180.0..-135.0).contains(&degree) {
            Direction::Left
        } else if (-135.0..-45.0).contains(&degree) {
            Direction::Down
        } else {
            Direction::Top
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction from the center of a `size` box at `position` towards `target`.
///
/// `deg = round(atan2(cy - y, cx - x))` in degrees, then bucketed with
/// [`Direction::from_degree`].
pub fn direction_to(
    position: Option<Point>,
    size: [f64; 2],
    target: Point,
) -> Result<Direction, OrchestratorError> {
    let [width, height] = size;
    let missing = || OrchestratorError::MissingGeometry {
        offset_top: position.map_or(f64::NAN, |p| p.y),
        offset_left: position.map_or(f64::NAN, |p| p.x),
        width,
        height,
    };
    let origin = position.ok_or_else(missing)?;
    if [origin.x, origin.y, width, height, target.x, target.y]
        .iter()
        .any(|v| v.is_nan())
    {
        return Err(missing());
    }

    let cx = origin.x + width / 2.0;
    let cy = origin.y + height / 2.0;
    let degree = (cy - target.y).atan2(cx - target.x).to_degrees().round();
    Ok(Direction::from_degree(degree))
}

/// Keep a `size` box at `position` inside `viewport`, `margin` pixels from
/// each edge. The top/left edge wins when the box does not fit.
pub fn clamp_into(position: Point, size: [f64; 2], viewport: Viewport, margin: f64) -> Point {
    let [width, height] = size;
    let mut top = position.y;
    let mut left = position.x;

    if top - margin < 0.0 {
        top = margin;
    } else if top + height + margin > viewport.height {
        top = viewport.height - height - margin;
    }

    if left - margin < 0.0 {
        left = margin;
    } else if left + width + margin > viewport.width {
        left = viewport.width - width - margin;
    }

    Point::new(left, top)
}

/// A timed straight-line move.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub from: Point,
    pub to: Point,
    pub start: Millis,
    pub duration: Millis,
}

impl Motion {
    pub fn end(&self) -> Millis {
        self.start.saturating_add(self.duration)
    }

    /// Linear interpolation at `now`, clamped to the endpoints.
    pub fn position_at(&self, now: Millis) -> Point {
        if self.duration == 0 || now >= self.end() {
            return self.to;
        }
        let t = now.saturating_sub(self.start) as f64 / self.duration as f64;
        Point::new(
            self.from.x + (self.to.x - self.from.x) * t,
            self.from.y + (self.to.y - self.from.y) * t,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_cover_the_circle() {
        assert_eq!(Direction::from_degree(0.0), Direction::Right);
        assert_eq!(Direction::from_degree(-45.0), Direction::Right);
        assert_eq!(Direction::from_degree(45.0), Direction::Up);
        assert_eq!(Direction::from_degree(135.0), Direction::Left);
        assert_eq!(Direction::from_degree(180.0), Direction::Left);
        assert_eq!(Direction::from_degree(-180.0), Direction::Left);
        assert_eq!(Direction::from_degree(-136.0), Direction::Left);
        assert_eq!(Direction::from_degree(-135.0), Direction::Down);
        assert_eq!(Direction::from_degree(-90.0), Direction::Down);
        assert_eq!(Direction::from_degree(f64::NAN), Direction::Top);
    }

    #[test]
    fn direction_from_zero_sized_box_at_origin() {
        let at_origin = Some(Point::default());
        assert_eq!(
            direction_to(at_origin, [0.0, 0.0], Point::new(50.0, 100.0)).unwrap(),
            Direction::Down
        );
        assert_eq!(
            direction_to(at_origin, [0.0, 0.0], Point::new(100.0, 50.0)).unwrap(),
            Direction::Left
        );
    }

    #[test]
    fn direction_uses_box_center() {
        // Center is (150, 150); a target straight left of it is on the
        // character's right.
        let pos = Some(Point::new(100.0, 100.0));
        assert_eq!(
            direction_to(pos, [100.0, 100.0], Point::new(0.0, 150.0)).unwrap(),
            Direction::Right
        );
        assert_eq!(
            direction_to(pos, [100.0, 100.0], Point::new(150.0, 0.0)).unwrap(),
            Direction::Up
        );
        assert_eq!(
            direction_to(pos, [100.0, 100.0], Point::new(150.0, 400.0)).unwrap(),
            Direction::Down
        );
    }

    #[test]
    fn missing_geometry_is_an_error() {
        assert!(matches!(
            direction_to(None, [10.0, 10.0], Point::new(1.0, 1.0)),
            Err(OrchestratorError::MissingGeometry { .. })
        ));
        assert!(matches!(
            direction_to(Some(Point::default()), [f64::NAN, 10.0], Point::new(1.0, 1.0)),
            Err(OrchestratorError::MissingGeometry { .. })
        ));
    }

    #[test]
    fn clamp_keeps_margin() {
        let vp = Viewport::new(800.0, 600.0);
        let size = [124.0, 93.0];
        assert_eq!(
            clamp_into(Point::new(-20.0, 2.0), size, vp, 5.0),
            Point::new(5.0, 5.0)
        );
        assert_eq!(
            clamp_into(Point::new(790.0, 590.0), size, vp, 5.0),
            Point::new(800.0 - 124.0 - 5.0, 600.0 - 93.0 - 5.0)
        );
        let inside = Point::new(300.0, 200.0);
        assert_eq!(clamp_into(inside, size, vp, 5.0), inside);
    }

    #[test]
    fn motion_interpolates_linearly() {
        let m = Motion {
            from: Point::new(0.0, 0.0),
            to: Point::new(100.0, 50.0),
            start: 1_000,
            duration: 200,
        };
        assert_eq!(m.position_at(1_000), Point::new(0.0, 0.0));
        assert_eq!(m.position_at(1_100), Point::new(50.0, 25.0));
        assert_eq!(m.position_at(5_000), Point::new(100.0, 50.0));
        assert_eq!(m.end(), 1_200);
    }
}
