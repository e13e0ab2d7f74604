use crate::item::{Container, PooledItem};

pub type Position = [f32; 3];
pub type Rotation = [f32; 4]; // quaternion, (x, y, z, w)

pub const ORIGIN: Position = [0.0, 0.0, 0.0];
pub const NO_ROTATION: Rotation = [0.0, 0.0, 0.0, 1.0];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Position,
    pub rotation: Rotation,
}

impl Pose {
    pub const IDENTITY: Pose = Pose { position: ORIGIN, rotation: NO_ROTATION };

    pub fn new(position: Position, rotation: Rotation) -> Self {
        return Self { position, rotation }
    }
}

impl Default for Pose {
    fn default() -> Self {
        return Self::IDENTITY
    }
}

/*
    Items that live in some kind of scene graph. The pool never moves items
    around itself; the registry's acquire_* helpers forward here after the
    item has been handed out.
*/
pub trait Placeable: PooledItem {
    fn set_parent(&mut self, parent: &Container);
    fn set_local_pose(&mut self, pose: Pose);
    fn set_position(&mut self, position: Position);
    fn set_rotation(&mut self, rotation: Rotation);
}
