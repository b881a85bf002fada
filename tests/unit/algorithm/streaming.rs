//! Tests for incremental scoring and state export

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use sketchscore::ScoreError;
    use sketchscore::algorithm::aggregation::{AggregationConfig, aggregate};
    use sketchscore::algorithm::distance::DistanceField;
    use sketchscore::algorithm::streaming::{StreamingScorer, StreamingState};
    use sketchscore::spatial::mask::{BackgroundMode, Mask, PointSet, Region};

    const DIMS: (usize, usize) = (40, 40);

    fn config() -> AggregationConfig {
        AggregationConfig {
            grid_cells: 4,
            ..AggregationConfig::default()
        }
    }

    fn reference() -> PointSet {
        let coords = (5..35).map(|i| [i, 20]).chain((5..35).map(|i| [20, i]));
        PointSet::from_coordinates(Region::Reference, DIMS, coords).expect("points in bounds")
    }

    fn scorer() -> StreamingScorer {
        StreamingScorer::from_reference_points(reference(), BackgroundMode::Opaque, config())
            .expect("reference has content")
    }

    // Tests that scoring after incremental additions equals scoring the final sets from scratch
    // Verified by lowering the field with only the last batch
    #[test]
    fn test_streamed_score_matches_full_score() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut streaming = scorer();
        let mut all = Vec::new();

        for _ in 0..5 {
            let batch: Vec<[usize; 2]> = (0..8)
                .map(|_| [rng.random_range(0..DIMS.0), rng.random_range(0..DIMS.1)])
                .collect();
            streaming
                .add_observation_points(&batch)
                .expect("points in bounds");
            all.extend_from_slice(&batch);
        }

        let observation = PointSet::from_coordinates(Region::Observation, DIMS, all)
            .expect("points in bounds");
        let reference = reference();
        let expected = aggregate(
            &reference,
            &observation,
            &DistanceField::build(&reference).expect("non-empty set"),
            &DistanceField::build(&observation).expect("non-empty set"),
            &config(),
        )
        .expect("both sets are non-empty");

        assert_eq!(streaming.score().ok(), Some(expected));
        assert_eq!(streaming.observation_points(), observation);
    }

    // Tests that the returned value is the current top cell error
    // Verified by returning the error of the batch alone
    #[test]
    fn test_add_returns_current_top_cell_error() {
        let mut streaming = scorer();

        let on_stroke = streaming
            .add_observation_points(&[[20, 20]])
            .expect("point in bounds");
        let with_stray = streaming
            .add_observation_points(&[[0, 0]])
            .expect("point in bounds");

        let score = streaming.score().expect("observation has content");
        assert!((with_stray - score.top5_cell_error()).abs() < f64::EPSILON);
        assert!(with_stray > on_stroke);
    }

    // Tests that an empty batch on an empty observation scores zero instead of failing
    // Verified by forwarding the empty-set error
    #[test]
    fn test_empty_observation_scores_zero() {
        let mut streaming = scorer();

        let value = streaming
            .add_observation_points(&[])
            .expect("nothing to validate");

        assert!(value.abs() < f64::EPSILON);
        assert!(matches!(
            streaming.score(),
            Err(ScoreError::EmptyPointSet {
                region: Region::Observation
            })
        ));
    }

    // Tests that repeated points are counted once
    // Verified by counting every submitted point
    #[test]
    fn test_duplicate_points_are_skipped() {
        let mut streaming = scorer();

        streaming
            .add_observation_points(&[[1, 1], [1, 1], [2, 2]])
            .expect("points in bounds");
        streaming
            .add_observation_points(&[[2, 2]])
            .expect("points in bounds");

        assert_eq!(streaming.observation_count(), 2);
        assert_eq!(streaming.observation_points().len(), 2);
    }

    // Tests that a batch with one bad point adds nothing
    // Verified by validating points while inserting them
    #[test]
    fn test_out_of_bounds_batch_is_rejected_whole() {
        let mut streaming = scorer();

        let result = streaming.add_observation_points(&[[3, 3], [40, 0]]);

        assert!(matches!(result, Err(ScoreError::InvalidParameter { .. })));
        assert_eq!(streaming.observation_count(), 0);
    }

    // Tests that reset clears observations while keeping the reference
    // Verified by leaving the observation field untouched on reset
    #[test]
    fn test_reset_observation() {
        let mut streaming = scorer();
        streaming
            .add_observation_points(&[[0, 0], [39, 39]])
            .expect("points in bounds");

        streaming.reset_observation();
        assert_eq!(streaming.observation_count(), 0);
        assert!(streaming.observation_points().is_empty());

        let after_reset = streaming
            .add_observation_points(&[[20, 20]])
            .expect("point in bounds");
        let mut fresh = scorer();
        let from_fresh = fresh
            .add_observation_points(&[[20, 20]])
            .expect("point in bounds");
        assert!((after_reset - from_fresh).abs() < f64::EPSILON);
    }

    // Tests that an exported state survives JSON and restores an equivalent scorer
    // Verified by dropping the aggregation settings from the state
    #[test]
    fn test_state_round_trip_preserves_scores() {
        let points = [[0, 0], [12, 30], [20, 21]];
        let mut original = scorer();
        original
            .add_observation_points(&points)
            .expect("points in bounds");

        let json = serde_json::to_string(&original.export_state()).expect("serializable state");
        let state: StreamingState = serde_json::from_str(&json).expect("deserializable state");
        let mut restored = StreamingScorer::from_state(state).expect("consistent state");

        assert_eq!(restored.observation_count(), 0);
        assert_eq!(restored.mode(), BackgroundMode::Opaque);
        restored
            .add_observation_points(&points)
            .expect("points in bounds");
        assert_eq!(restored.score().ok(), original.score().ok());
    }

    // Tests that a state with an unfinished reference field is refused
    // Verified by skipping the completeness check
    #[test]
    fn test_incomplete_state_is_rejected() {
        let state = StreamingState {
            reference_field: DistanceField::unreached(DIMS),
            reference_points: reference(),
            mode: BackgroundMode::Opaque,
            aggregation: config(),
        };

        assert!(matches!(
            StreamingScorer::from_state(state),
            Err(ScoreError::InvalidParameter { .. })
        ));
    }

    // Tests that a blank reference mask cannot start a session
    // Verified by building an unreached reference field
    #[test]
    fn test_blank_reference_mask_is_rejected() {
        let blank = Mask::filled(40, 40, 0);

        let result =
            StreamingScorer::from_reference_mask(&blank, BackgroundMode::Transparent, config());

        assert!(matches!(
            result,
            Err(ScoreError::EmptyPointSet {
                region: Region::Reference
            })
        ));
    }

    // Tests that a reference mask is read with the mode's background value
    // Verified by always treating 255 as background
    #[test]
    fn test_reference_mask_uses_mode_background() {
        let mut mask = Mask::filled(40, 40, 0);
        mask.set([10, 10], 200);

        let mut streaming =
            StreamingScorer::from_reference_mask(&mask, BackgroundMode::Transparent, config())
                .expect("one stroke pixel");
        streaming
            .add_observation_points(&[[10, 10]])
            .expect("point in bounds");

        let score = streaming.score().expect("observation has content");
        assert_eq!(score.pixel_count(), 1);
        assert!(score.mean_error().abs() < f64::EPSILON);
    }
}
