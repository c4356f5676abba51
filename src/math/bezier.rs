use std::ops::{Add, Sub};

/// 2D point used by profile outlines
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn scale(&self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s)
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            self.scale(1.0 / len)
        } else {
            *self
        }
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product
    pub fn cross(&self, other: &Self) -> f32 {
        self.x * other.y - self.y * other.x
    }

    pub fn distance(&self, other: &Self) -> f32 {
        (*self - *other).length()
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// Evaluate a cubic Bezier segment at t in [0, 1]
pub fn cubic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    let b0 = u * u * u;
    let b1 = 3.0 * u * u * t;
    let b2 = 3.0 * u * t * t;
    let b3 = t * t * t;

    p0.scale(b0) + p1.scale(b1) + p2.scale(b2) + p3.scale(b3)
}

/// One cubic segment of a path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub start: Vec2,
    pub control1: Vec2,
    pub control2: Vec2,
    pub end: Vec2,
}

impl CubicSegment {
    pub fn evaluate(&self, t: f32) -> Vec2 {
        cubic_bezier(self.start, self.control1, self.control2, self.end, t)
    }
}

/// Closed 2D outline built from cubic Bezier segments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape2D {
    cursor: Vec2,
    segments: Vec<CubicSegment>,
}

impl Shape2D {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the outline at `(x, y)`
    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.cursor = Vec2::new(x, y);
        self
    }

    pub fn bezier_curve_to(
        mut self,
        cp1x: f32,
        cp1y: f32,
        cp2x: f32,
        cp2y: f32,
        x: f32,
        y: f32,
    ) -> Self {
        let end = Vec2::new(x, y);
        self.segments.push(CubicSegment {
            start: self.cursor,
            control1: Vec2::new(cp1x, cp1y),
            control2: Vec2::new(cp2x, cp2y),
            end,
        });
        self.cursor = end;
        self
    }

    pub fn segments(&self) -> &[CubicSegment] {
        &self.segments
    }

    /// Sample the outline with `divisions` steps per segment.
    ///
    /// Shared segment joints appear once and the closing point is dropped
    /// when it coincides with the first one.
    pub fn sample(&self, divisions: usize) -> Vec<Vec2> {
        let divisions = divisions.max(1);
        let mut points: Vec<Vec2> = Vec::with_capacity(self.segments.len() * divisions + 1);

        for segment in &self.segments {
            for i in 0..=divisions {
                let p = segment.evaluate(i as f32 / divisions as f32);
                if points.last().map_or(true, |last| last.distance(&p) > f32::EPSILON) {
                    points.push(p);
                }
            }
        }

        if points.len() > 1 && points[0].distance(&points[points.len() - 1]) <= f32::EPSILON {
            points.pop();
        }

        points
    }
}

/// Signed area of a polygon (positive when counter-clockwise)
pub fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].cross(&points[(i + 1) % n]))
        .sum::<f32>()
        * 0.5
}
