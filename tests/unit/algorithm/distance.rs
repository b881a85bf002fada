//! Tests for multi-source distance fields and incremental lowering

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use sketchscore::ScoreError;
    use sketchscore::algorithm::distance::DistanceField;
    use sketchscore::spatial::mask::{PointSet, Region};

    fn point_set(dims: (usize, usize), points: &[[usize; 2]]) -> PointSet {
        PointSet::from_coordinates(Region::Reference, dims, points.iter().copied())
            .expect("points should be in bounds")
    }

    fn random_points(rng: &mut StdRng, dims: (usize, usize), count: usize) -> Vec<[usize; 2]> {
        (0..count)
            .map(|_| [rng.random_range(0..dims.0), rng.random_range(0..dims.1)])
            .collect()
    }

    fn manhattan_to_nearest(position: [usize; 2], points: &[[usize; 2]]) -> Option<u32> {
        points
            .iter()
            .map(|p| (position[0].abs_diff(p[0]) + position[1].abs_diff(p[1])) as u32)
            .min()
    }

    // Tests that every source point is seeded at distance zero
    // Verified by starting the wave counter at 1
    #[test]
    fn test_sources_have_zero_distance() {
        let dims = (12, 9);
        let points = [[0, 0], [5, 4], [11, 8]];
        let field = DistanceField::build(&point_set(dims, &points)).expect("non-empty set");

        for point in points {
            assert_eq!(field.get(point), Some(0), "source {point:?} should be 0");
        }
    }

    // Tests that no cell remains unreached after a build
    // Verified by stopping the expansion after the first wave
    #[test]
    fn test_build_reaches_every_cell() {
        let field = DistanceField::build(&point_set((20, 30), &[[19, 0]])).expect("non-empty set");

        assert!(field.is_complete());
        assert_eq!(field.dims(), (20, 30));
        assert_eq!(field.max_distance(), Some(19 + 29));
    }

    // Tests that the wave expansion yields exact Manhattan distances to the nearest source
    // Verified by using 8-connected neighbours
    #[test]
    fn test_distances_match_manhattan_to_nearest_source() {
        let mut rng = StdRng::seed_from_u64(17);
        let dims = (24, 31);

        for count in [1, 3, 12] {
            let points = random_points(&mut rng, dims, count);
            let field = DistanceField::build(&point_set(dims, &points)).expect("non-empty set");

            for row in 0..dims.0 {
                for col in 0..dims.1 {
                    assert_eq!(
                        field.get([row, col]),
                        manhattan_to_nearest([row, col], &points),
                        "mismatch at ({row}, {col}) with {count} sources"
                    );
                }
            }
        }
    }

    // Tests that 4-connected neighbours never differ by more than one step
    // Verified by incrementing distances by 2 per wave
    #[test]
    fn test_neighbouring_cells_differ_by_at_most_one() {
        let mut rng = StdRng::seed_from_u64(3);
        let dims = (16, 16);
        let points = random_points(&mut rng, dims, 5);
        let field = DistanceField::build(&point_set(dims, &points)).expect("non-empty set");

        for row in 0..dims.0 {
            for col in 0..dims.1 {
                let here = field.get([row, col]).expect("complete field");
                for neighbour in [[row + 1, col], [row, col + 1]] {
                    if let Some(there) = field.get(neighbour) {
                        assert!(here.abs_diff(there) <= 1, "jump at ({row}, {col})");
                    }
                }
            }
        }
    }

    // Tests that adding sources never increases any distance
    // Verified by building the superset field from the new points only
    #[test]
    fn test_superset_field_is_pointwise_lower() {
        let mut rng = StdRng::seed_from_u64(99);
        let dims = (18, 22);
        let subset = random_points(&mut rng, dims, 4);
        let mut superset = subset.clone();
        superset.extend(random_points(&mut rng, dims, 6));

        let sparse = DistanceField::build(&point_set(dims, &subset)).expect("non-empty set");
        let dense = DistanceField::build(&point_set(dims, &superset)).expect("non-empty set");

        for (low, high) in dense.as_array().iter().zip(sparse.as_array()) {
            assert!(low <= high);
        }
    }

    // Tests that an empty point set is rejected rather than producing an unreached field
    // Verified by removing the emptiness check
    #[test]
    fn test_empty_point_set_is_rejected() {
        let empty = PointSet::empty(Region::Observation, (5, 5));
        let result = DistanceField::build(&empty);

        assert!(matches!(
            result,
            Err(ScoreError::EmptyPointSet {
                region: Region::Observation
            })
        ));
    }

    // Tests that lowering an existing field equals rebuilding from the union of sources
    // Verified by propagating only from the first new source
    #[test]
    fn test_lower_with_matches_full_rebuild() {
        let mut rng = StdRng::seed_from_u64(2024);
        let dims = (25, 20);
        let initial = random_points(&mut rng, dims, 3);
        let mut field = DistanceField::build(&point_set(dims, &initial)).expect("non-empty set");
        let mut all = initial;

        for _ in 0..4 {
            let batch = random_points(&mut rng, dims, 3);
            field.lower_with(&batch);
            all.extend_from_slice(&batch);

            let rebuilt = DistanceField::build(&point_set(dims, &all)).expect("non-empty set");
            assert_eq!(field, rebuilt);
        }
    }

    // Tests that lowering an unreached field from scratch equals a build
    // Verified by skipping sources already marked as zero
    #[test]
    fn test_lower_with_from_unreached_matches_build() {
        let dims = (10, 14);
        let points = [[2, 3], [9, 13], [0, 7]];

        let mut lowered = DistanceField::unreached(dims);
        assert!(!lowered.is_complete());
        assert_eq!(lowered.get([0, 0]), None);

        lowered.lower_with(&points);
        let built = DistanceField::build(&point_set(dims, &points)).expect("non-empty set");

        assert_eq!(lowered, built);
    }

    // Tests that out-of-grid sources are ignored when lowering
    // Verified by indexing sources without bounds checks
    #[test]
    fn test_lower_with_ignores_out_of_bounds_sources() {
        let dims = (4, 4);
        let mut field = DistanceField::build(&point_set(dims, &[[0, 0]])).expect("non-empty set");
        let before = field.clone();

        field.lower_with(&[[4, 0], [0, 9]]);

        assert_eq!(field, before);
    }

    // Tests lookup failure for positions outside the field
    // Verified by returning the clamped edge distance
    #[test]
    fn test_lookup_outside_field_fails() {
        let field = DistanceField::build(&point_set((3, 3), &[[1, 1]])).expect("non-empty set");

        assert_eq!(field.lookup([2, 2]).ok(), Some(2));
        assert!(matches!(
            field.lookup([3, 0]),
            Err(ScoreError::InvalidParameter { .. })
        ));
    }

    // Tests that identical inputs always produce identical fields
    // Verified by iterating sources in hash order
    #[test]
    fn test_build_is_deterministic() {
        let points = point_set((15, 15), &[[14, 0], [3, 3], [7, 12]]);

        let first = DistanceField::build(&points).expect("non-empty set");
        let second = DistanceField::build(&points).expect("non-empty set");

        assert_eq!(first, second);
    }
}
