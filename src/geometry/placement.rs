use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use crate::math::{Transform, Vec3};

/// Petal count for each bloom layer, inner to outer
pub const PETALS_PER_LAYER: [usize; 4] = [6, 9, 12, 15];

pub const PETAL_LAYERS: usize = PETALS_PER_LAYER.len();

/// Radius of the innermost petal ring
pub const PETAL_BASE_RADIUS: f32 = 0.2;
pub const PETAL_RADIUS_STEP: f32 = 0.15;
pub const PETAL_LAYER_HEIGHT: f32 = 0.05;

/// Leaf levels along the stem; every level but the last also gets an opposite leaf
pub const LEAF_LEVELS: usize = 3;
pub const LEAF_SPACING: f32 = 0.8;
pub const LEAF_SCALE: f32 = 0.3;

pub fn total_petals() -> usize {
    PETALS_PER_LAYER.iter().sum()
}

/// Transform of petal `index` in bloom `layer`.
///
/// Petals sit on a ring that widens and rises with each layer, face away from
/// the center and tilt flatter the further out the layer is.
pub fn place_petal(layer: usize, index: usize) -> Transform {
    let count = PETALS_PER_LAYER[layer];
    let radius = PETAL_BASE_RADIUS + PETAL_RADIUS_STEP * layer as f32;
    let angle = index as f32 * (TAU / count as f32);
    let scale = 0.2 + 0.1 * layer as f32;

    Transform::from_position(Vec3::new(
        angle.cos() * radius,
        PETAL_LAYER_HEIGHT * layer as f32,
        angle.sin() * radius,
    ))
    .with_rotation(Vec3::new(FRAC_PI_2 - (0.3 + 0.1 * layer as f32), angle + PI, 0.0))
    .with_uniform_scale(scale)
}

/// All petal transforms, layer by layer
pub fn place_petals() -> Vec<(usize, usize, Transform)> {
    PETALS_PER_LAYER
        .iter()
        .enumerate()
        .flat_map(|(layer, &count)| (0..count).map(move |index| (layer, index, place_petal(layer, index))))
        .collect()
}

/// Leaf pair at level `stem_index`: a right-hand leaf, plus a mirrored
/// left-hand leaf 0.4 higher on every level except the top one.
pub fn place_leaf_pair(stem_index: usize) -> (Transform, Option<Transform>) {
    let level = stem_index as f32;

    let right = Transform::from_position(Vec3::new(0.2, -1.5 + level * LEAF_SPACING, 0.0))
        .with_rotation(Vec3::new(0.0, FRAC_PI_2 * level, -FRAC_PI_4))
        .with_uniform_scale(LEAF_SCALE);

    let left = (stem_index + 1 < LEAF_LEVELS).then(|| {
        Transform::from_position(Vec3::new(-0.2, -1.1 + level * LEAF_SPACING, 0.0))
            .with_rotation(Vec3::new(0.0, -FRAC_PI_2 * level, FRAC_PI_4))
            .with_uniform_scale(LEAF_SCALE)
    });

    (right, left)
}

pub fn place_leaves() -> Vec<Transform> {
    (0..LEAF_LEVELS)
        .flat_map(|level| {
            let (right, left) = place_leaf_pair(level);
            std::iter::once(right).chain(left)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_petal_layer_counts() {
        let petals = place_petals();
        for (layer, &expected) in PETALS_PER_LAYER.iter().enumerate() {
            assert_eq!(petals.iter().filter(|(l, _, _)| *l == layer).count(), expected);
        }
        assert_eq!(petals.len(), 42);
        assert_eq!(total_petals(), 42);
    }

    #[test]
    fn test_petal_ring_radius_and_height() {
        for layer in 0..PETAL_LAYERS {
            let expected_radius = 0.2 + 0.15 * layer as f32;
            for index in 0..PETALS_PER_LAYER[layer] {
                let t = place_petal(layer, index);
                let radius = (t.position.x.powi(2) + t.position.z.powi(2)).sqrt();
                assert!((radius - expected_radius).abs() < 0.0001);
                assert!((t.position.y - 0.05 * layer as f32).abs() < 0.0001);
            }
        }
    }

    #[test]
    fn test_petal_orientation() {
        let t = place_petal(2, 3);
        let angle = 3.0 * TAU / 12.0;
        assert!((t.rotation.y - (angle + PI)).abs() < 0.0001);
        assert!((t.rotation.x - (FRAC_PI_2 - 0.5)).abs() < 0.0001);
        assert_eq!(t.rotation.z, 0.0);
        assert!((t.scale.x - 0.4).abs() < 0.0001);
    }

    #[test]
    fn test_outer_layers_tilt_flatter() {
        let tilts: Vec<f32> = (0..PETAL_LAYERS).map(|layer| place_petal(layer, 0).rotation.x).collect();
        assert!(tilts.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_first_petal_on_positive_x() {
        let t = place_petal(0, 0);
        assert!((t.position.x - 0.2).abs() < 0.0001);
        assert!(t.position.z.abs() < 0.0001);
    }

    #[test]
    fn test_leaf_pairs_alternate_and_mirror() {
        let (right, left) = place_leaf_pair(1);
        let left = left.expect("middle level has an opposite leaf");

        assert!(right.position.x > 0.0 && left.position.x < 0.0);
        assert!((left.position.y - right.position.y - 0.4).abs() < 0.0001);
        assert_eq!(left.rotation.z, -right.rotation.z);
        assert_eq!(left.rotation.y, -right.rotation.y);
    }

    #[test]
    fn test_leaf_spacing() {
        let leaves = place_leaves();
        assert_eq!(leaves.len(), 5);

        let rights: Vec<f32> = leaves.iter().filter(|t| t.position.x > 0.0).map(|t| t.position.y).collect();
        assert_eq!(rights.len(), 3);
        for w in rights.windows(2) {
            assert!((w[1] - w[0] - 0.8).abs() < 0.0001);
        }
        assert!(place_leaf_pair(LEAF_LEVELS - 1).1.is_none());
    }

    #[test]
    fn test_placement_is_deterministic() {
        assert_eq!(place_petals(), place_petals());
        assert_eq!(place_leaves(), place_leaves());
    }
}
