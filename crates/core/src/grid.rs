use thiserror::Error;

/// A uniform one-dimensional grid over `[0, length]`.
///
/// Positions are materialized once at construction. The first position is
/// exactly `0.0` and the last is exactly `length`; interior positions are
/// `i * spacing`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Grid {
    length: f64,
    spacing: f64,
    positions: Vec<f64>,
}

/// Errors that can occur when constructing a [`Grid`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GridError {
    #[error("length must be finite and positive, got {0}")]
    Length(f64),

    #[error("point_count must be at least 2, got {0}")]
    PointCount(usize),
}

impl GridError {
    /// Name of the offending parameter.
    #[must_use]
    pub fn parameter(&self) -> &'static str {
        match self {
            Self::Length(_) => "length",
            Self::PointCount(_) => "point_count",
        }
    }
}

impl Grid {
    /// Creates a grid of `point_count` equally spaced points on `[0, length]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `length` is not finite and positive, or if
    /// `point_count` is less than 2.
    pub fn new(length: f64, point_count: usize) -> Result<Self, GridError> {
        if !length.is_finite() || length <= 0.0 {
            return Err(GridError::Length(length));
        }
        if point_count < 2 {
            return Err(GridError::PointCount(point_count));
        }

        #[allow(clippy::cast_precision_loss)]
        let spacing = length / (point_count - 1) as f64;

        #[allow(clippy::cast_precision_loss)]
        let mut positions: Vec<f64> = (0..point_count).map(|i| i as f64 * spacing).collect();
        positions[point_count - 1] = length;

        Ok(Self {
            length,
            spacing,
            positions,
        })
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.positions.len()
    }

    /// Distance between neighboring points.
    #[must_use]
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    #[must_use]
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    /// Number of points strictly between the two endpoints.
    #[must_use]
    pub fn interior_count(&self) -> usize {
        self.point_count() - 2
    }
}
