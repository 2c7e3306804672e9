//! Velocity-field sampling for visualization.

use crate::error::SimError;
use crate::field::VelocityField;
use crate::grid::GridSpec;
use crate::vortex::VortexSystem;

/// Samples the full superposed velocity of `system` on `grid`.
///
/// Every cell closer than `mask_radius` to any vortex is masked, as is any
/// cell whose velocity comes out non-finite (an exact hit with a zero mask
/// radius). Masking is an OR over all vortices.
pub fn sample_field(system: &VortexSystem, grid: &GridSpec, mask_radius: f64) -> VelocityField {
    let mut field = VelocityField::for_grid(grid);
    let r2_mask = mask_radius * mask_radius;

    for (col, row, point) in grid.points() {
        field.set(col, row, system.induced_velocity(point, None));
        let near_core = system
            .vortices()
            .iter()
            .any(|v| v.position.distance_squared(point) < r2_mask);
        if near_core {
            field.mask_cell(col, row);
        }
    }

    field
}

/// Grid and masking radius used to produce each frame's field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSampler {
    grid: GridSpec,
    mask_radius: f64,
}

impl FieldSampler {
    /// Returns `SimError::InvalidParameter` if `mask_radius` is negative or
    /// not finite. A zero radius disables masking.
    pub fn new(grid: GridSpec, mask_radius: f64) -> Result<Self, SimError> {
        if !mask_radius.is_finite() || mask_radius < 0.0 {
            return Err(SimError::invalid_parameter(
                "mask_radius",
                format!("must be non-negative and finite, got {mask_radius}"),
            ));
        }
        Ok(Self { grid, mask_radius })
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn mask_radius(&self) -> f64 {
        self.mask_radius
    }

    pub fn sample(&self, system: &VortexSystem) -> VelocityField {
        sample_field(system, &self.grid, self.mask_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vortex::Vortex;
    use glam::DVec2;

    fn grid(half_width: f64, resolution: usize) -> GridSpec {
        GridSpec::new(half_width, resolution).unwrap()
    }

    #[test]
    fn field_shape_matches_grid() {
        let system = VortexSystem::from_triples(&[(0.5, 0.5, 1.0)]).unwrap();
        let field = sample_field(&system, &grid(10.0, 17), 1.0);
        assert_eq!(field.width(), 17);
        assert_eq!(field.height(), 17);
        assert_eq!(field.vel_x().len(), 17 * 17);
        assert_eq!(field.vel_y().len(), field.vel_x().len());
    }

    #[test]
    fn unmasked_cells_match_induced_velocity() {
        let system =
            VortexSystem::from_triples(&[(-3.3, 1.1, 2.0), (4.2, -0.7, -1.5)]).unwrap();
        let g = grid(10.0, 9);
        let field = sample_field(&system, &g, 0.5);
        for (col, row, p) in g.points() {
            if let Some(u) = field.get(col, row) {
                let expected = system.induced_velocity(p, None);
                assert!((u - expected).length() < 1e-12);
            }
        }
    }

    #[test]
    fn rows_follow_y_and_columns_follow_x() {
        // Unit vortex at origin: at (+x, 0) the flow points up, at (0, +y) it points left.
        let system = VortexSystem::from_triples(&[(0.0, 0.0, 1.0)]).unwrap();
        let field = sample_field(&system, &grid(2.0, 5), 0.5);
        let right = field.get(4, 2).unwrap();
        let top = field.get(2, 4).unwrap();
        assert!((right - DVec2::new(0.0, 0.5)).length() < 1e-12, "got {right}");
        assert!((top - DVec2::new(-0.5, 0.0)).length() < 1e-12, "got {top}");
    }

    #[test]
    fn cells_inside_mask_radius_are_masked() {
        let system = VortexSystem::from_triples(&[(0.0, 0.0, 1.0)]).unwrap();
        let g = grid(2.0, 5);
        let field = sample_field(&system, &g, 1.5);
        for (col, row, p) in g.points() {
            assert_eq!(field.is_masked(col, row), p.length() < 1.5, "cell at {p}");
        }
        // Origin, four axis neighbours at distance 1 and four diagonals at ~1.41.
        assert_eq!(field.masked_count(), 9);
    }

    #[test]
    fn mask_boundary_is_strict() {
        let system = VortexSystem::from_triples(&[(0.0, 0.0, 1.0)]).unwrap();
        let field = sample_field(&system, &grid(2.0, 5), 1.0);
        assert!(field.is_masked(2, 2));
        assert!(!field.is_masked(3, 2));
    }

    #[test]
    fn zero_radius_masks_only_exact_hits() {
        let system = VortexSystem::from_triples(&[(0.0, 0.0, 1.0)]).unwrap();
        let field = sample_field(&system, &grid(2.0, 5), 0.0);
        assert_eq!(field.masked_count(), 1);
        assert!(field.is_masked(2, 2));
    }

    #[test]
    fn masking_is_union_over_vortices_in_any_order() {
        let vortices = vec![
            Vortex::new(-1.0, 0.0, 1.0),
            Vortex::new(1.0, 0.0, -1.0),
            Vortex::new(0.0, 1.5, 0.5),
        ];
        let forward = VortexSystem::new(vortices.clone()).unwrap();
        let backward = VortexSystem::new(vortices.into_iter().rev().collect()).unwrap();
        let g = grid(3.0, 13);
        let a = sample_field(&forward, &g, 0.8);
        let b = sample_field(&backward, &g, 0.8);
        assert_eq!(a.mask(), b.mask());
        for (col, row, p) in g.points() {
            let near_any = forward
                .vortices()
                .iter()
                .any(|v| v.position.distance(p) < 0.8);
            assert_eq!(a.is_masked(col, row), near_any);
        }
    }

    #[test]
    fn sampler_rejects_negative_or_nan_radius() {
        assert!(FieldSampler::new(grid(1.0, 2), -0.1).is_err());
        assert!(FieldSampler::new(grid(1.0, 2), f64::NAN).is_err());
        assert!(FieldSampler::new(grid(1.0, 2), 0.0).is_ok());
    }

    #[test]
    fn sampler_is_pure() {
        let system = VortexSystem::from_triples(&[(0.3, 0.1, 1.0), (-2.0, 1.0, -1.0)]).unwrap();
        let sampler = FieldSampler::new(grid(5.0, 11), 1.0).unwrap();
        let a = sampler.sample(&system);
        let b = sampler.sample(&system);
        assert_eq!(a.mask(), b.mask());
        assert!(a
            .vel_x()
            .iter()
            .zip(b.vel_x())
            .all(|(x, y)| x.to_bits() == y.to_bits()));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn shape_invariant_for_any_resolution(
                resolution in 2_usize..40,
                half_width in 0.5_f64..50.0,
                x in -10.0_f64..10.0,
                y in -10.0_f64..10.0,
            ) {
                let system = VortexSystem::from_triples(&[(x, y, 1.0)]).unwrap();
                let field = sample_field(&system, &grid(half_width, resolution), 1.0);
                prop_assert_eq!(field.width(), resolution);
                prop_assert_eq!(field.height(), resolution);
                prop_assert_eq!(field.vel_x().len(), resolution * resolution);
                prop_assert_eq!(field.vel_y().len(), resolution * resolution);
            }

            #[test]
            fn every_cell_within_radius_is_masked(
                r_mask in 0.0_f64..5.0,
                xs in prop::collection::vec((-8.0_f64..8.0, -8.0_f64..8.0), 1..5),
            ) {
                let triples: Vec<_> = xs.iter().map(|&(x, y)| (x, y, 1.0)).collect();
                prop_assume!(VortexSystem::from_triples(&triples).is_ok());
                let system = VortexSystem::from_triples(&triples).unwrap();
                let g = grid(10.0, 21);
                let field = sample_field(&system, &g, r_mask);
                for (col, row, p) in g.points() {
                    let near = system
                        .vortices()
                        .iter()
                        .any(|v| v.position.distance_squared(p) < r_mask * r_mask);
                    if near {
                        prop_assert!(field.is_masked(col, row));
                        prop_assert_eq!(field.get(col, row), None);
                    }
                }
            }
        }
    }
}
