use crate::geometry::{cylinder, leaf_mesh, petal_mesh, place_leaves, place_petals, uv_sphere, Mesh, PETAL_LAYERS};
use crate::math::{Mat4, Transform, Vec3};
use super::material::{Material, MaterialHandle};

pub const STEM_HEIGHT: f32 = 3.0;
pub const CENTER_RADIUS: f32 = 0.2;

/// Which shared mesh an instance draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Stem,
    Leaf,
    Center,
    Petal { layer: usize, index: usize },
}

/// One placed copy of a part mesh inside the flower group
#[derive(Debug, Clone)]
pub struct MeshInstance {
    pub part: PartKind,
    pub transform: Transform,
    pub material: MaterialHandle,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl MeshInstance {
    fn new(part: PartKind, transform: Transform, material: &MaterialHandle) -> Self {
        Self {
            part,
            transform,
            material: material.clone(),
            cast_shadow: true,
            receive_shadow: true,
        }
    }
}

/// The four distinct meshes every instance refers to
#[derive(Debug, Clone, PartialEq)]
pub struct FlowerMeshes {
    pub stem: Mesh,
    pub leaf: Mesh,
    pub center: Mesh,
    pub petal: Mesh,
}

impl FlowerMeshes {
    pub fn build() -> Self {
        Self {
            stem: cylinder(0.05, 0.07, STEM_HEIGHT, 12),
            leaf: leaf_mesh(),
            center: uv_sphere(CENTER_RADIUS, 32, 32),
            petal: petal_mesh(),
        }
    }

    pub fn get(&self, part: PartKind) -> &Mesh {
        match part {
            PartKind::Stem => &self.stem,
            PartKind::Leaf => &self.leaf,
            PartKind::Center => &self.center,
            PartKind::Petal { .. } => &self.petal,
        }
    }
}

/// The flower group: stem, leaves, center and petal rings under one transform
#[derive(Debug, Clone)]
pub struct Flower {
    pub group: Transform,
    pub meshes: FlowerMeshes,
    pub instances: Vec<MeshInstance>,
    pub petal_material: MaterialHandle,
    pub center_material: MaterialHandle,
    pub stem_material: MaterialHandle,
}

impl Flower {
    pub fn build() -> Self {
        let petal_material = MaterialHandle::new(Material::petal());
        let center_material = MaterialHandle::new(Material::center());
        let stem_material = MaterialHandle::new(Material::stem());

        let mut instances = vec![MeshInstance::new(
            PartKind::Stem,
            Transform::from_position(Vec3::new(0.0, -STEM_HEIGHT / 2.0, 0.0)),
            &stem_material,
        )];
        instances.extend(
            place_leaves()
                .into_iter()
                .map(|t| MeshInstance::new(PartKind::Leaf, t, &stem_material)),
        );
        instances.push(MeshInstance::new(PartKind::Center, Transform::default(), &center_material));
        instances.extend(place_petals().into_iter().map(|(layer, index, t)| {
            MeshInstance::new(PartKind::Petal { layer, index }, t, &petal_material)
        }));

        Self {
            group: Transform::default(),
            meshes: FlowerMeshes::build(),
            instances,
            petal_material,
            center_material,
            stem_material,
        }
    }

    pub fn petal_count(&self) -> usize {
        self.instances
            .iter()
            .filter(|i| matches!(i.part, PartKind::Petal { .. }))
            .count()
    }

    pub fn petals_per_layer(&self) -> [usize; PETAL_LAYERS] {
        let mut counts = [0; PETAL_LAYERS];
        for instance in &self.instances {
            if let PartKind::Petal { layer, .. } = instance.part {
                counts[layer] += 1;
            }
        }
        counts
    }

    /// World matrix of an instance: group transform applied after the local one
    pub fn world_matrix(&self, instance: &MeshInstance) -> Mat4 {
        self.group.matrix().mul(&instance.transform.matrix())
    }

    /// Conservative bounding sphere of the whole flower, centred on the origin
    pub fn bounding_radius(&self) -> f32 {
        self.instances
            .iter()
            .map(|instance| {
                let mesh = self.meshes.get(instance.part);
                let t = &instance.transform;
                let max_scale = t.scale.x.max(t.scale.y).max(t.scale.z);
                t.position.length() + (mesh.bounds_center.length() + mesh.bounds_radius) * max_scale
            })
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flower_composition() {
        let flower = Flower::build();
        assert_eq!(flower.petal_count(), 42);
        assert_eq!(flower.petals_per_layer(), [6, 9, 12, 15]);

        let leaves = flower.instances.iter().filter(|i| i.part == PartKind::Leaf).count();
        assert_eq!(leaves, 5);
        assert_eq!(flower.instances.iter().filter(|i| i.part == PartKind::Stem).count(), 1);
        assert_eq!(flower.instances.iter().filter(|i| i.part == PartKind::Center).count(), 1);
        assert!(flower.instances.iter().all(|i| i.cast_shadow && i.receive_shadow));
    }

    #[test]
    fn test_petals_share_one_material() {
        let flower = Flower::build();
        for instance in &flower.instances {
            let expected = match instance.part {
                PartKind::Petal { .. } => &flower.petal_material,
                PartKind::Center => &flower.center_material,
                PartKind::Stem | PartKind::Leaf => &flower.stem_material,
            };
            assert!(instance.material.ptr_eq(expected));
        }

        flower.petal_material.set_emissive_intensity(0.2);
        let petal = flower
            .instances
            .iter()
            .find(|i| matches!(i.part, PartKind::Petal { .. }))
            .unwrap();
        assert_eq!(petal.material.emissive_intensity(), 0.2);
    }

    #[test]
    fn test_stem_hangs_below_center() {
        let flower = Flower::build();
        let stem = flower.instances.iter().find(|i| i.part == PartKind::Stem).unwrap();
        let top = flower.world_matrix(stem).transform_point(Vec3::new(0.0, STEM_HEIGHT / 2.0, 0.0));
        assert!(top.y.abs() < 0.0001);
    }

    #[test]
    fn test_group_rotation_moves_leaves() {
        let mut flower = Flower::build();
        let leaf = flower.instances.iter().find(|i| i.part == PartKind::Leaf).unwrap().clone();
        let before = flower.world_matrix(&leaf).transform_point(Vec3::ZERO);
        flower.group.rotation.y += std::f32::consts::FRAC_PI_2;
        let after = flower.world_matrix(&leaf).transform_point(Vec3::ZERO);
        assert!(before.distance(&after) > 0.1);
        assert!((before.y - after.y).abs() < 0.0001);
    }

    #[test]
    fn test_bounding_radius_covers_stem() {
        let flower = Flower::build();
        assert!(flower.bounding_radius() >= STEM_HEIGHT);
    }

    #[test]
    fn test_build_is_deterministic() {
        assert_eq!(Flower::build().meshes, Flower::build().meshes);
    }
}
