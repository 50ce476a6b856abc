use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rpnprop::lowlevel::{clip_boxes, filter_and_rank, rank_desc, size_filter};
use rpnprop::{BBox, ImageSize};

fn random_boxes(rng: &mut StdRng, n: usize, extent: f32) -> Vec<BBox> {
    (0..n)
        .map(|_| {
            BBox::new(
                rng.random_range(-extent..2.0 * extent),
                rng.random_range(-extent..2.0 * extent),
                rng.random_range(-extent..2.0 * extent),
                rng.random_range(-extent..2.0 * extent),
            )
        })
        .collect()
}

#[test]
fn clipping_is_idempotent_and_bounded() {
    let mut rng = StdRng::seed_from_u64(11);
    let size = ImageSize::new(64.0, 48.0);
    let mut boxes = random_boxes(&mut rng, 500, 64.0);
    clip_boxes(&mut boxes, size);
    for b in &boxes {
        assert!((0.0..=64.0).contains(&b.x1) && (0.0..=64.0).contains(&b.x2));
        assert!((0.0..=48.0).contains(&b.y1) && (0.0..=48.0).contains(&b.y2));
    }
    let mut twice = boxes.clone();
    clip_boxes(&mut twice, size);
    assert_eq!(twice, boxes);
}

#[test]
fn size_filter_boundary_is_inclusive() {
    let min_side = 16.0f32;
    for eps in [1e-3f32, 0.1, 1.0] {
        let boxes = [
            BBox::new(0.0, 0.0, min_side, min_side),
            BBox::new(0.0, 0.0, min_side - eps, min_side),
        ];
        assert_eq!(size_filter(&boxes, min_side), vec![0]);
    }
}

#[test]
fn ranked_scores_are_non_increasing_and_within_budget() {
    let mut rng = StdRng::seed_from_u64(5);
    let size = ImageSize::new(100.0, 100.0);
    let boxes = random_boxes(&mut rng, 400, 100.0);
    let scores: Vec<f32> = (0..400).map(|_| rng.random_range(0.0..1.0)).collect();

    for budget in [0usize, 1, 17, 1000] {
        let (out, ranked) = filter_and_rank(boxes.clone(), &scores, size, 4.0, budget).unwrap();
        assert_eq!(out.len(), ranked.len());
        if budget > 0 {
            assert!(ranked.len() <= budget);
        }
        for pair in ranked.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
        for b in &out {
            assert!(b.width() >= 4.0 && b.height() >= 4.0);
        }
    }
}

#[test]
fn unlimited_budget_keeps_every_survivor() {
    let mut rng = StdRng::seed_from_u64(21);
    let size = ImageSize::new(80.0, 80.0);
    let boxes = random_boxes(&mut rng, 300, 80.0);
    let scores: Vec<f32> = (0..300).map(|_| rng.random_range(0.0..1.0)).collect();

    let mut clipped = boxes.clone();
    clip_boxes(&mut clipped, size);
    let survivors = size_filter(&clipped, 2.0).len();

    let (out, _) = filter_and_rank(boxes, &scores, size, 2.0, 0).unwrap();
    assert_eq!(out.len(), survivors);
}

#[test]
fn rank_ties_keep_original_order() {
    let scores = [0.5f32; 6];
    assert_eq!(rank_desc(&scores), vec![0, 1, 2, 3, 4, 5]);
}
