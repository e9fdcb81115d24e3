//! Arena-backed scene graph
//!
//! Groups live in a slot map and refer to their children by [`GroupId`], so
//! the hierarchy is a forest by construction: a group is created under
//! exactly one parent (or as a root) and cannot be re-parented.

use super::material::Material;
use super::transform::Transform;
use crate::foundation::collections::{GroupId, MeshId, SlotMap};
use std::path::PathBuf;
use thiserror::Error;

/// Scene construction failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// A group handle does not belong to this graph
    #[error("unknown group {0:?}")]
    UnknownGroup(GroupId),

    /// A model references a mesh the library does not hold
    #[error("model `{source_name}` references unknown mesh {mesh:?}")]
    UnknownMesh {
        /// The dangling mesh handle
        mesh: MeshId,
        /// Source name of the model
        source_name: String,
    },
}

/// A mesh placed in a group, with its rendering attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Mesh in the world's mesh library
    pub mesh: MeshId,

    /// Mesh file the model was declared with
    pub source: String,

    /// Surface material
    pub material: Material,

    /// Texture image, decoded by the renderer
    pub texture: Option<PathBuf>,
}

impl Model {
    /// Model with the default material and no texture
    pub fn new(mesh: MeshId, source: impl Into<String>) -> Self {
        Self {
            mesh,
            source: source.into(),
            material: Material::default(),
            texture: None,
        }
    }

    /// Set the material
    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Set the texture
    #[must_use]
    pub fn with_texture(mut self, texture: impl Into<PathBuf>) -> Self {
        self.texture = Some(texture.into());
        self
    }
}

/// Owned nested group description, as produced by a scene file reader
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupDesc {
    /// Local transform
    pub transform: Transform,
    /// Models drawn with this group's transform
    pub models: Vec<Model>,
    /// Child groups, in draw order
    pub children: Vec<GroupDesc>,
}

impl GroupDesc {
    /// Group with a transform and nothing in it
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            ..Self::default()
        }
    }

    /// Add a model
    #[must_use]
    pub fn model(mut self, model: Model) -> Self {
        self.models.push(model);
        self
    }

    /// Add a child group
    #[must_use]
    pub fn child(mut self, child: GroupDesc) -> Self {
        self.children.push(child);
        self
    }
}

/// A node of the scene graph
#[derive(Debug, Clone)]
pub struct Group {
    /// Local transform
    pub transform: Transform,

    /// Models drawn with this group's transform
    pub models: Vec<Model>,

    parent: Option<GroupId>,
    children: Vec<GroupId>,
}

impl Group {
    fn new(transform: Transform, parent: Option<GroupId>) -> Self {
        for issue in transform.issues() {
            log::warn!("group transform: {issue}");
        }
        Self {
            transform,
            models: Vec::new(),
            parent,
            children: Vec::new(),
        }
    }

    /// Parent group, `None` for roots
    pub fn parent(&self) -> Option<GroupId> {
        self.parent
    }

    /// Child groups in draw order
    pub fn children(&self) -> &[GroupId] {
        &self.children
    }
}

/// Forest of groups
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    groups: SlotMap<GroupId, Group>,
    roots: Vec<GroupId>,
}

impl SceneGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten owned group descriptions into the arena, preserving order
    pub fn from_groups(roots: Vec<GroupDesc>) -> Self {
        let mut graph = Self::new();
        for desc in roots {
            graph.insert_desc(desc, None);
        }
        log::debug!("scene graph: {} groups, {} roots", graph.len(), graph.roots.len());
        graph
    }

    fn insert_desc(&mut self, desc: GroupDesc, parent: Option<GroupId>) -> GroupId {
        let GroupDesc {
            transform,
            models,
            children,
        } = desc;

        let id = self.attach(transform, parent);
        self.groups[id].models = models;
        for child in children {
            self.insert_desc(child, Some(id));
        }
        id
    }

    fn attach(&mut self, transform: Transform, parent: Option<GroupId>) -> GroupId {
        let id = self.groups.insert(Group::new(transform, parent));
        match parent.and_then(|p| self.groups.get_mut(p)) {
            Some(parent_group) => parent_group.children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Root groups in draw order
    pub fn roots(&self) -> &[GroupId] {
        &self.roots
    }

    /// Look up a group
    pub fn get(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id)
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the graph has no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Every model in the graph, with its group
    pub fn models(&self) -> impl Iterator<Item = (GroupId, &Model)> {
        self.groups
            .iter()
            .flat_map(|(id, group)| group.models.iter().map(move |model| (id, model)))
    }

    /// Depth-first pre-order walk yielding `(group, depth)`, siblings in stored order
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            graph: self,
            stack: self.roots.iter().rev().map(|&id| (id, 0)).collect(),
        }
    }
}

/// Pre-order iterator over a [`SceneGraph`]
pub struct Walk<'a> {
    graph: &'a SceneGraph,
    stack: Vec<(GroupId, usize)>,
}

impl Iterator for Walk<'_> {
    type Item = (GroupId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        if let Some(group) = self.graph.groups.get(id) {
            self.stack.extend(group.children.iter().rev().map(|&child| (child, depth + 1)));
        }
        Some((id, depth))
    }
}

/// Incremental scene construction
#[derive(Debug, Default)]
pub struct SceneBuilder {
    graph: SceneGraph,
}

impl SceneBuilder {
    /// Start an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level group
    pub fn add_root(&mut self, transform: Transform) -> GroupId {
        self.graph.attach(transform, None)
    }

    /// Add a group under `parent`
    pub fn add_child(&mut self, parent: GroupId, transform: Transform) -> Result<GroupId, SceneError> {
        if !self.graph.groups.contains_key(parent) {
            return Err(SceneError::UnknownGroup(parent));
        }
        Ok(self.graph.attach(transform, Some(parent)))
    }

    /// Add a model to `group`
    pub fn add_model(&mut self, group: GroupId, model: Model) -> Result<(), SceneError> {
        let target = self.graph.groups.get_mut(group).ok_or(SceneError::UnknownGroup(group))?;
        target.models.push(model);
        Ok(())
    }

    /// Finish building
    pub fn build(self) -> SceneGraph {
        self.graph
    }
}
