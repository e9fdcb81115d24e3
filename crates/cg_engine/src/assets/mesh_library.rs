//! Mesh store shared by every model in a scene
//!
//! Each mesh file is read once; later requests for the same path return the
//! existing [`MeshId`].

use super::mesh_io::{MeshFile, MeshIoError};
use super::ParseWarning;
use crate::foundation::collections::{MeshId, SlotMap};
use crate::geometry::Mesh;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A mesh together with where it came from
#[derive(Debug, Clone)]
pub struct LoadedMesh {
    /// File path, or the name given to an in-memory mesh
    pub source: PathBuf,

    /// The mesh data
    pub mesh: Mesh,

    /// Warnings raised while parsing the file
    pub warnings: Vec<ParseWarning>,
}

/// Path-deduplicating mesh store
#[derive(Debug, Default)]
pub struct MeshLibrary {
    meshes: SlotMap<MeshId, LoadedMesh>,
    by_source: HashMap<PathBuf, MeshId>,
}

impl MeshLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a mesh file, or return the id of the copy already loaded
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<MeshId, MeshIoError> {
        let path = path.as_ref();
        if let Some(&id) = self.by_source.get(path) {
            log::debug!("mesh {} already loaded", path.display());
            return Ok(id);
        }

        let parsed = MeshFile::load(path)?;
        let id = self.meshes.insert(LoadedMesh {
            source: path.to_path_buf(),
            mesh: parsed.value,
            warnings: parsed.warnings,
        });
        self.by_source.insert(path.to_path_buf(), id);
        log::info!("mesh library: loaded {}", path.display());
        Ok(id)
    }

    /// Register an in-memory mesh under `name`.
    ///
    /// A second insert under the same name keeps the first mesh.
    pub fn insert(&mut self, name: impl Into<PathBuf>, mesh: Mesh) -> MeshId {
        let name = name.into();
        if let Some(&id) = self.by_source.get(&name) {
            log::warn!("mesh {} already registered, keeping the existing one", name.display());
            return id;
        }
        let id = self.meshes.insert(LoadedMesh {
            source: name.clone(),
            mesh,
            warnings: Vec::new(),
        });
        self.by_source.insert(name, id);
        id
    }

    /// Look up a mesh by id
    pub fn get(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id).map(|loaded| &loaded.mesh)
    }

    /// Look up a mesh with its source and warnings
    pub fn entry(&self, id: MeshId) -> Option<&LoadedMesh> {
        self.meshes.get(id)
    }

    /// Id of an already-loaded source
    pub fn id_of<P: AsRef<Path>>(&self, source: P) -> Option<MeshId> {
        self.by_source.get(source.as_ref()).copied()
    }

    /// Whether `id` refers to a mesh in this library
    pub fn contains(&self, id: MeshId) -> bool {
        self.meshes.contains_key(id)
    }

    /// Number of distinct meshes
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Whether the library is empty
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Iterate over all meshes
    pub fn iter(&self) -> impl Iterator<Item = (MeshId, &LoadedMesh)> {
        self.meshes.iter()
    }
}
