//! Height projection seam.
//!
//! The core moves actors on the ground plane; a [`HeightProjector`] supplies
//! the vertical coordinate once the horizontal update is done.

/// Maps a ground-plane point to a world height.
pub trait HeightProjector {
    /// Height at (`x`, `z`).
    fn height_at(&self, x: f32, z: f32) -> f32;
}

impl<F> HeightProjector for F
where
    F: Fn(f32, f32) -> f32,
{
    fn height_at(&self, x: f32, z: f32) -> f32 {
        self(x, z)
    }
}

/// Level ground at a fixed height.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlatTerrain(pub f32);

impl HeightProjector for FlatTerrain {
    fn height_at(&self, _x: f32, _z: f32) -> f32 {
        self.0
    }
}
