//! Tests for cross-distance lookup and score aggregation

#[cfg(test)]
mod tests {
    use sketchscore::ScoreError;
    use sketchscore::algorithm::aggregation::{AggregationConfig, aggregate, cross_distances};
    use sketchscore::algorithm::distance::DistanceField;
    use sketchscore::spatial::mask::{PointSet, Region};

    const CANONICAL: (usize, usize) = (500, 500);

    fn points(region: Region, dims: (usize, usize), coords: &[[usize; 2]]) -> PointSet {
        PointSet::from_coordinates(region, dims, coords.iter().copied())
            .expect("points should be in bounds")
    }

    fn field(points: &PointSet) -> DistanceField {
        DistanceField::build(points).expect("non-empty set")
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // Tests the single-pixel offset case: one reference and one observation pixel three columns apart
    // Verified by normalizing against the cell size instead of the region size
    #[test]
    fn test_three_pixel_offset_scores() {
        let reference = points(Region::Reference, CANONICAL, &[[0, 0]]);
        let observation = points(Region::Observation, CANONICAL, &[[0, 3]]);

        let score = aggregate(
            &reference,
            &observation,
            &field(&reference),
            &field(&observation),
            &AggregationConfig::default(),
        )
        .expect("both sets are non-empty");

        assert!(approx(score.mean_error(), 3.0));
        assert!(approx(score.mean_error_pct(), 0.6));
        assert!(approx(score.top_point_error(), 0.6));
        // Cell (0, 0) holds 3, the other four of the top five are 0: 3 / 5 / 5
        assert!(approx(score.top5_cell_error(), 0.1));
        assert_eq!(score.pixel_count(), 1);
        assert_eq!(score.observation_pixel_count(), 1);
        assert_eq!(score.grid().get([0, 0]), Some(&3));
    }

    // Tests that identical point sets score zero on every metric
    // Verified by looking up each set in its own field offset by one row
    #[test]
    fn test_identical_sets_score_zero() {
        let coords = [[10, 10], [10, 11], [250, 400], [499, 0]];
        let reference = points(Region::Reference, CANONICAL, &coords);
        let observation = points(Region::Observation, CANONICAL, &coords);

        let score = aggregate(
            &reference,
            &observation,
            &field(&reference),
            &field(&observation),
            &AggregationConfig::default(),
        )
        .expect("both sets are non-empty");

        assert!(approx(score.top5_cell_error(), 0.0));
        assert!(approx(score.top_point_error(), 0.0));
        assert!(approx(score.mean_error(), 0.0));
        assert!(score.grid().iter().all(|&v| v == 0));
        assert_eq!(score.pixel_count(), coords.len());
    }

    // Tests that percentages near a decimal half round from their stored value
    // Verified by scaling the percentage by ten before rounding
    #[test]
    fn test_near_half_percentages_round_down() {
        let reference = points(Region::Reference, CANONICAL, &[[0, 0], [0, 1]]);
        let observation = points(Region::Observation, CANONICAL, &[[0, 1], [0, 3]]);

        let score = aggregate(
            &reference,
            &observation,
            &field(&reference),
            &field(&observation),
            &AggregationConfig::default(),
        )
        .expect("both sets are non-empty");

        // Combined distances 0, 2, 1, 0: mean 0.75 is 0.15 percent of 500
        assert!(approx(score.mean_error(), 0.75));
        assert!(approx(score.mean_error_pct(), 0.1));
        assert!(approx(score.top_point_error(), 0.1));
        // Cell maxima 2, 0, 0, 0, 0: 0.4 / 5 = 0.08
        assert!(approx(score.top5_cell_error(), 0.1));
    }

    // Tests that cell maxima land in the cell owning each source pixel
    // Verified by routing samples through the opposite set's coordinates
    #[test]
    fn test_opposite_corners_fill_corner_cells() {
        let reference = points(Region::Reference, CANONICAL, &[[0, 0]]);
        let observation = points(Region::Observation, CANONICAL, &[[499, 499]]);

        let score = aggregate(
            &reference,
            &observation,
            &field(&reference),
            &field(&observation),
            &AggregationConfig::default(),
        )
        .expect("both sets are non-empty");

        assert_eq!(score.grid().get([0, 0]), Some(&998));
        assert_eq!(score.grid().get([9, 9]), Some(&998));
        assert_eq!(score.grid().iter().filter(|&&v| v > 0).count(), 2);
        // (998 + 998 + 0 + 0 + 0) / 5 / 5
        assert!(approx(score.top5_cell_error(), 79.8));
        assert!(approx(score.top_point_error(), 199.6));
        assert!(approx(score.mean_error_pct(), 199.6));
    }

    // Tests that the combined list holds observation lookups before reference lookups
    // Verified by swapping the two lookup passes
    #[test]
    fn test_cross_distances_order_and_values() {
        let dims = (6, 6);
        let reference = points(Region::Reference, dims, &[[0, 0], [5, 5]]);
        let observation = points(Region::Observation, dims, &[[0, 2]]);

        let samples = cross_distances(
            &reference,
            &observation,
            &field(&reference),
            &field(&observation),
        )
        .expect("consistent inputs");

        let flattened: Vec<([usize; 2], u32)> =
            samples.iter().map(|s| (s.position, s.distance)).collect();
        assert_eq!(flattened, vec![([0, 2], 2), ([0, 0], 2), ([5, 5], 8)]);
    }

    // Tests that averages use every value when fewer than top_k exist
    // Verified by always dividing by top_k
    #[test]
    fn test_top_point_error_averages_short_lists() {
        let dims = (10, 10);
        let reference = points(Region::Reference, dims, &[[0, 0]]);
        let observation = points(Region::Observation, dims, &[[0, 4]]);
        let config = AggregationConfig {
            grid_cells: 1,
            top_k: 5,
            cell_scale_divisor: 1.0,
            normalization_base: 10.0,
        };

        let score = aggregate(
            &reference,
            &observation,
            &field(&reference),
            &field(&observation),
            &config,
        )
        .expect("both sets are non-empty");

        // Two samples of 4: mean 4 over base 10
        assert!(approx(score.top_point_error(), 40.0));
        // A single cell holding 4
        assert!(approx(score.top5_cell_error(), 4.0));
    }

    // Tests that an empty observation is reported rather than scored
    // Verified by skipping the emptiness check on the observation side
    #[test]
    fn test_empty_observation_is_rejected() {
        let reference = points(Region::Reference, CANONICAL, &[[1, 1]]);
        let observation = PointSet::empty(Region::Observation, CANONICAL);

        let result = aggregate(
            &reference,
            &observation,
            &field(&reference),
            &DistanceField::unreached(CANONICAL),
            &AggregationConfig::default(),
        );

        assert!(matches!(
            result,
            Err(ScoreError::EmptyPointSet {
                region: Region::Observation
            })
        ));
    }

    // Tests that sets from differently sized regions are rejected
    // Verified by comparing only the row dimension
    #[test]
    fn test_mismatched_dimensions_are_rejected() {
        let reference = points(Region::Reference, (10, 10), &[[1, 1]]);
        let observation = points(Region::Observation, (10, 20), &[[1, 1]]);

        let result = cross_distances(
            &reference,
            &observation,
            &field(&reference),
            &field(&observation),
        );

        assert!(matches!(
            result,
            Err(ScoreError::InvalidParameter {
                parameter: "observation",
                ..
            })
        ));
    }

    // Tests validation of each configuration parameter
    // Verified by accepting grids that leave a remainder
    #[test]
    fn test_config_validation() {
        let valid = AggregationConfig::default();
        assert!(valid.validate(CANONICAL).is_ok());

        let uneven = AggregationConfig {
            grid_cells: 7,
            ..valid
        };
        assert!(uneven.validate(CANONICAL).is_err());

        let no_top = AggregationConfig { top_k: 0, ..valid };
        assert!(matches!(
            no_top.validate(CANONICAL),
            Err(ScoreError::InvalidParameter {
                parameter: "top_k",
                ..
            })
        ));

        let zero_divisor = AggregationConfig {
            cell_scale_divisor: 0.0,
            ..valid
        };
        assert!(zero_divisor.validate(CANONICAL).is_err());

        let nan_base = AggregationConfig {
            normalization_base: f64::NAN,
            ..valid
        };
        assert!(nan_base.validate(CANONICAL).is_err());
    }
}
