use chora_common::{ObjectId, Transform};
use chora_geometry::MeshData;
use serde::{Deserialize, Serialize};

use crate::SceneError;

/// Index into the scene's mesh table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshHandle(pub u32);

/// Index into the scene's material table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialHandle(pub u32);

/// Index into the scene's matcap texture slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

/// A matcap texture slot. The image itself is owned by the renderer; the
/// scene only records which asset fills the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureSlot {
    pub path: String,
}

/// Matcap material: all shading comes from one lit-sphere texture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub matcap: TextureHandle,
}

/// What an object was built as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Text,
    Ring,
    Cube,
}

/// A drawable object in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub mesh: MeshHandle,
    pub material: MaterialHandle,
    pub transform: Transform,
}

/// Insertion-only scene container.
///
/// Owns the meshes, materials and texture slots its objects reference by
/// handle. `revision` increases on every mutation so renderers can tell
/// when GPU-side copies are stale.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    meshes: Vec<MeshData>,
    materials: Vec<Material>,
    textures: Vec<TextureSlot>,
    objects: Vec<SceneObject>,
    revision: u64,
    populated: bool,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects in the scene.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    pub(crate) fn mark_populated(&mut self) {
        self.populated = true;
        self.revision += 1;
    }

    /// Objects in insertion order.
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn meshes(&self) -> &[MeshData] {
        &self.meshes
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&MeshData> {
        self.meshes.get(handle.0 as usize)
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle.0 as usize)
    }

    pub fn textures(&self) -> &[TextureSlot] {
        &self.textures
    }

    pub fn texture(&self, handle: TextureHandle) -> Option<&TextureSlot> {
        self.textures.get(handle.0 as usize)
    }

    /// Reserve a matcap slot for the texture at `path`.
    pub fn add_texture(&mut self, path: impl Into<String>) -> TextureHandle {
        let handle = TextureHandle(self.textures.len() as u32);
        self.textures.push(TextureSlot { path: path.into() });
        self.revision += 1;
        handle
    }

    pub fn add_material(
        &mut self,
        name: impl Into<String>,
        matcap: TextureHandle,
    ) -> Result<MaterialHandle, SceneError> {
        if self.texture(matcap).is_none() {
            return Err(SceneError::UnknownTexture(matcap));
        }
        let handle = MaterialHandle(self.materials.len() as u32);
        self.materials.push(Material {
            name: name.into(),
            matcap,
        });
        self.revision += 1;
        Ok(handle)
    }

    /// Register a mesh. Meshes are shared: many objects may use one handle.
    pub fn add_mesh(&mut self, mesh: MeshData) -> MeshHandle {
        let handle = MeshHandle(self.meshes.len() as u32);
        self.meshes.push(mesh);
        self.revision += 1;
        handle
    }

    /// Append an object. Returns its id.
    pub fn insert(
        &mut self,
        kind: ObjectKind,
        mesh: MeshHandle,
        material: MaterialHandle,
        transform: Transform,
    ) -> Result<ObjectId, SceneError> {
        if self.mesh(mesh).is_none() {
            return Err(SceneError::UnknownMesh(mesh));
        }
        if self.material(material).is_none() {
            return Err(SceneError::UnknownMaterial(material));
        }
        let id = ObjectId::new();
        self.objects.push(SceneObject {
            id,
            kind,
            mesh,
            material,
            transform,
        });
        self.revision += 1;
        Ok(id)
    }

    /// Count objects of one kind.
    pub fn count(&self, kind: ObjectKind) -> usize {
        self.objects.iter().filter(|o| o.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chora_geometry::box_mesh;

    fn scene_with_material() -> (Scene, MeshHandle, MaterialHandle) {
        let mut scene = Scene::new();
        let tex = scene.add_texture("textures/matcaps/11.jpg");
        let material = scene.add_material("fill", tex).unwrap();
        let mesh = scene.add_mesh(box_mesh(1.0, 1.0, 1.0));
        (scene, mesh, material)
    }

    #[test]
    fn empty_scene() {
        let scene = Scene::new();
        assert!(scene.is_empty());
        assert_eq!(scene.revision(), 0);
        assert!(!scene.is_populated());
    }

    #[test]
    fn insert_preserves_order() {
        let (mut scene, mesh, material) = scene_with_material();
        let a = scene
            .insert(ObjectKind::Cube, mesh, material, Transform::default())
            .unwrap();
        let b = scene
            .insert(ObjectKind::Ring, mesh, material, Transform::default())
            .unwrap();
        let ids: Vec<_> = scene.objects().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(scene.count(ObjectKind::Cube), 1);
        assert_eq!(scene.count(ObjectKind::Ring), 1);
    }

    #[test]
    fn revision_tracks_mutations() {
        let (mut scene, mesh, material) = scene_with_material();
        let before = scene.revision();
        scene
            .insert(ObjectKind::Cube, mesh, material, Transform::default())
            .unwrap();
        assert_eq!(scene.revision(), before + 1);
    }

    #[test]
    fn rejects_unknown_handles() {
        let (mut scene, mesh, material) = scene_with_material();
        assert!(matches!(
            scene.insert(ObjectKind::Cube, MeshHandle(9), material, Transform::default()),
            Err(SceneError::UnknownMesh(MeshHandle(9)))
        ));
        assert!(matches!(
            scene.insert(ObjectKind::Cube, mesh, MaterialHandle(9), Transform::default()),
            Err(SceneError::UnknownMaterial(MaterialHandle(9)))
        ));
        assert!(matches!(
            scene.add_material("bad", TextureHandle(4)),
            Err(SceneError::UnknownTexture(TextureHandle(4)))
        ));
        assert!(scene.is_empty());
    }
}
