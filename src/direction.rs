//! Cardinal travel directions on the ground plane.
//!
//! The ground plane is spanned by world `x` and `z`. `East` is `+x`, `West`
//! is `-x`, `South` is `+z` and `North` is `-z`. Directions are compared by
//! identity, never by floating-point equality.

use glam::Vec2;

use crate::constants::AXIS_ALIGNMENT_TOLERANCE;

/// One of the four axis-aligned unit directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cardinal {
    /// Towards `-z`.
    North,
    /// Towards `+z`.
    South,
    /// Towards `+x`.
    East,
    /// Towards `-x`.
    West,
}

impl Cardinal {
    /// All four directions in a fixed order.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Classifies a vector as a cardinal direction.
    ///
    /// Returns `None` for the zero vector, non-finite input, or any vector
    /// whose off-axis component exceeds the alignment tolerance relative to
    /// its length.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec2;
    /// use pathchase::Cardinal;
    /// assert_eq!(Cardinal::from_vector(Vec2::new(0.0, -3.0)), Some(Cardinal::North));
    /// assert_eq!(Cardinal::from_vector(Vec2::new(1.0, 1.0)), None);
    /// ```
    #[must_use]
    pub fn from_vector(vector: Vec2) -> Option<Self> {
        if !vector.is_finite() {
            return None;
        }
        let length = vector.length();
        if length <= f32::EPSILON {
            return None;
        }
        let tolerance = AXIS_ALIGNMENT_TOLERANCE * length;
        if vector.y.abs() <= tolerance {
            Some(if vector.x > 0.0 { Self::East } else { Self::West })
        } else if vector.x.abs() <= tolerance {
            Some(if vector.y > 0.0 { Self::South } else { Self::North })
        } else {
            None
        }
    }

    /// Builds a direction from integer axis signs, as reported by input
    /// devices. Exactly one component must be non-zero; only its sign counts.
    #[must_use]
    pub const fn from_signs(x: i32, z: i32) -> Option<Self> {
        match (x.signum(), z.signum()) {
            (1, 0) => Some(Self::East),
            (-1, 0) => Some(Self::West),
            (0, 1) => Some(Self::South),
            (0, -1) => Some(Self::North),
            _ => None,
        }
    }

    /// The `x` component of the unit vector: `-1`, `0` or `1`.
    #[must_use]
    pub const fn dir_x(self) -> i32 {
        match self {
            Self::East => 1,
            Self::West => -1,
            Self::North | Self::South => 0,
        }
    }

    /// The `z` component of the unit vector: `-1`, `0` or `1`.
    #[must_use]
    pub const fn dir_z(self) -> i32 {
        match self {
            Self::South => 1,
            Self::North => -1,
            Self::East | Self::West => 0,
        }
    }

    /// The unit vector on the ground plane (`x`, `z`).
    #[must_use]
    pub const fn to_vec2(self) -> Vec2 {
        match self {
            Self::North => Vec2::new(0.0, -1.0),
            Self::South => Vec2::new(0.0, 1.0),
            Self::East => Vec2::new(1.0, 0.0),
            Self::West => Vec2::new(-1.0, 0.0),
        }
    }

    /// The direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }
}

/// Travel sense along an edge: towards increasing or decreasing `edge_t`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EdgeDir {
    /// Towards the edge's second endpoint (`edge_t` increases).
    #[default]
    Forward,
    /// Towards the edge's first endpoint (`edge_t` decreases).
    Backward,
}

impl EdgeDir {
    /// `+1.0` for [`EdgeDir::Forward`], `-1.0` for [`EdgeDir::Backward`].
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }

    /// The reversed sense.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}
