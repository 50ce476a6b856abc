use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rpnprop::lowlevel::nms_greedy;
use rpnprop::{BBox, GreedyNms, Suppressor};

fn random_scene(seed: u64, n: usize) -> (Vec<BBox>, Vec<f32>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let boxes = (0..n)
        .map(|_| {
            let x1: f32 = rng.random_range(0.0..120.0);
            let y1: f32 = rng.random_range(0.0..120.0);
            BBox::new(
                x1,
                y1,
                x1 + rng.random_range(8.0..48.0),
                y1 + rng.random_range(8.0..48.0),
            )
        })
        .collect();
    let scores = (0..n).map(|_| rng.random_range(0.0..1.0)).collect();
    (boxes, scores)
}

#[test]
fn kept_boxes_overlap_below_threshold() {
    for (seed, thr) in [(1u64, 0.3f32), (2, 0.5), (3, 0.7)] {
        let (boxes, scores) = random_scene(seed, 300);
        let keep = nms_greedy(&boxes, &scores, thr).unwrap();
        assert!(!keep.is_empty());
        for (i, &a) in keep.iter().enumerate() {
            for &b in &keep[i + 1..] {
                assert!(boxes[a].iou(&boxes[b]) < thr);
            }
        }
    }
}

#[test]
fn kept_indices_are_in_descending_score_order() {
    let (boxes, scores) = random_scene(9, 200);
    let keep = nms_greedy(&boxes, &scores, 0.5).unwrap();
    for pair in keep.windows(2) {
        assert!(scores[pair[0]] >= scores[pair[1]]);
    }
    // The best box always survives.
    let best = (0..scores.len())
        .max_by(|&a, &b| scores[a].total_cmp(&scores[b]))
        .unwrap();
    assert_eq!(keep[0], best);
}

#[test]
fn every_dropped_box_overlaps_a_better_kept_box() {
    let (boxes, scores) = random_scene(4, 150);
    let thr = 0.45;
    let keep = nms_greedy(&boxes, &scores, thr).unwrap();
    for idx in 0..boxes.len() {
        if keep.contains(&idx) {
            continue;
        }
        let covered = keep
            .iter()
            .any(|&k| scores[k] >= scores[idx] && boxes[k].iou(&boxes[idx]) >= thr);
        assert!(covered, "box {idx} dropped without a suppressor");
    }
}

#[test]
fn threshold_one_keeps_all_distinct_boxes() {
    let boxes = [
        BBox::new(0.0, 0.0, 10.0, 10.0),
        BBox::new(1.0, 1.0, 11.0, 11.0),
        BBox::new(2.0, 2.0, 12.0, 12.0),
    ];
    let scores = [0.3, 0.2, 0.1];
    let keep = GreedyNms.suppress(&boxes, &scores, 1.0, false).unwrap();
    assert_eq!(keep, vec![0, 1, 2]);
}

#[test]
fn empty_input_keeps_nothing() {
    assert!(nms_greedy(&[], &[], 0.5).unwrap().is_empty());
}
