//! Handle types for arena-backed storage

pub use slotmap::{SecondaryMap, SlotMap};

slotmap::new_key_type! {
    /// Stable handle to a group node inside a [`crate::scene::SceneGraph`]
    pub struct GroupId;

    /// Stable handle to a mesh stored in a [`crate::assets::MeshLibrary`]
    pub struct MeshId;
}
