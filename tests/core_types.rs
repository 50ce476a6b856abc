use rpnprop::{
    AnchorLayout, BBox, FeatureMap, ImageSize, Mode, ProposalConfig, ProposalCreator,
    ProposalError, Roi,
};

#[test]
fn feature_map_rejects_short_buffer() {
    let data = [0.0f32; 10];
    let err = FeatureMap::new(&data, 1, 3, 2, 2).err().unwrap();
    assert_eq!(
        err,
        ProposalError::ShapeMismatch {
            expected: 12,
            got: 10,
            context: "map buffer length",
        }
    );
    assert!(err.is_malformed_input());
}

#[test]
fn feature_map_exposes_shape_and_planes() {
    let data: Vec<f32> = (0..12).map(|v| v as f32).collect();
    let map = FeatureMap::from_shape(&data, [1, 3, 2, 2]).unwrap();
    assert_eq!(map.shape(), [1, 3, 2, 2]);
    assert_eq!(map.batch(), 1);
    assert_eq!(map.channels(), 3);
    assert_eq!(map.as_slice(), data.as_slice());
    assert_eq!(map.plane(0, 2).unwrap(), &[8.0, 9.0, 10.0, 11.0]);
    assert_eq!(map.get(0, 1, 1, 0), Some(6.0));
}

#[test]
fn bbox_array_round_trip_and_extent() {
    let b = BBox::from([1.0, 2.0, 11.0, 7.0]);
    assert_eq!(b.to_array(), [1.0, 2.0, 11.0, 7.0]);
    assert_eq!(b.width(), 10.0);
    assert_eq!(b.height(), 5.0);
    assert_eq!(b.area(), 50.0);
    assert_eq!(b.center(), (6.0, 4.5));
}

#[test]
fn default_config_matches_reference_values() {
    let cfg = ProposalConfig::default();
    assert_eq!(cfg.suppression_iou_threshold, 0.7);
    assert_eq!(cfg.budgets(Mode::Train), (12000, 2000));
    assert_eq!(cfg.budgets(Mode::Eval), (6000, 300));
    assert_eq!(cfg.min_object_side, 16.0);
    assert_eq!(cfg.anchor_layout, AnchorLayout::PositionMajor);
    assert_eq!(cfg.prefer_accelerated_suppression, cfg!(feature = "rayon"));
}

#[test]
fn creator_rejects_invalid_scale_and_image_size() {
    let creator = ProposalCreator::new(ProposalConfig::default()).unwrap();
    let scores = [0.0f32; 2];
    let deltas = [0.0f32; 4];
    let anchors = [BBox::new(0.0, 0.0, 16.0, 16.0)];
    let s = FeatureMap::new(&scores, 1, 2, 1, 1).unwrap();
    let d = FeatureMap::new(&deltas, 1, 4, 1, 1).unwrap();

    for scale in [0.0, -1.0, f32::NAN, f32::INFINITY] {
        let err = creator
            .propose(&s, &d, &anchors, ImageSize::new(32.0, 32.0), scale, Mode::Eval)
            .unwrap_err();
        assert!(matches!(err, ProposalError::MalformedInput(_)));
    }

    let err = creator
        .propose(&s, &d, &anchors, ImageSize::new(-1.0, 32.0), 1.0, Mode::Eval)
        .unwrap_err();
    assert!(matches!(err, ProposalError::MalformedInput(_)));
}

#[test]
fn roi_rows_have_zero_batch_index() {
    let roi = Roi {
        batch_index: 0,
        bbox: BBox::new(4.0, 5.0, 6.0, 7.0),
    };
    assert_eq!(roi.to_array(), [0.0, 4.0, 5.0, 6.0, 7.0]);
}
