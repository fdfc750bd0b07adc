#[path = "helpers/mod.rs"]
mod helpers;

use helpers::{image_candidate, video_candidate};

use carousel_client::registry::{
    AutoConfirm, MediaRegistry, RemoveOutcome, ReorderOutcome,
};
use carousel_core::error::RejectReason;
use carousel_core::MediaLimits;

fn names(registry: &MediaRegistry) -> Vec<String> {
    registry
        .snapshot()
        .iter()
        .map(|s| s.display_name.clone())
        .collect()
}

#[test]
fn capacity_is_never_exceeded() {
    let mut registry = MediaRegistry::new(MediaLimits::default());
    for i in 0..9 {
        registry
            .add(image_candidate(&format!("img-{i}.png"), 1))
            .unwrap();
    }
    assert_eq!(registry.len(), 9);

    let rejected = registry.add(image_candidate("one-too-many.png", 1));
    assert_eq!(rejected, Err(RejectReason::CapacityReached { limit: 9 }));
    assert_eq!(registry.len(), 9);
    assert!(registry.invariants_hold());
}

#[test]
fn video_always_lands_at_position_zero() {
    let mut registry = MediaRegistry::new(MediaLimits::default());
    registry.add(image_candidate("a.png", 2)).unwrap();
    registry.add(image_candidate("b.png", 3)).unwrap();
    registry.add(video_candidate("v.mp4", 5)).unwrap();

    assert_eq!(names(&registry), vec!["v.mp4", "a.png", "b.png"]);
}

#[test]
fn second_video_is_rejected_not_replaced() {
    let mut registry = MediaRegistry::new(MediaLimits::default());
    registry.add(video_candidate("v.mp4", 5)).unwrap();

    assert_eq!(
        registry.add(video_candidate("v2.mp4", 6)),
        Err(RejectReason::VideoAlreadyPresent)
    );
    assert_eq!(names(&registry), vec!["v.mp4"]);
}

#[test]
fn duplicate_name_and_size_rejected_regardless_of_kind() {
    let mut registry = MediaRegistry::new(MediaLimits::default());
    registry.add(image_candidate("clip.png", 2)).unwrap();

    // Same (name, size) as a video is still a duplicate.
    assert!(matches!(
        registry.add(video_candidate("clip.png", 2)),
        Err(RejectReason::Duplicate { .. })
    ));

    // Same name with a different size is a different file.
    registry.add(image_candidate("clip.png", 3)).unwrap();
    assert_eq!(registry.len(), 2);
}

#[test]
fn reorder_into_video_slot_is_blocked() {
    let mut registry = MediaRegistry::new(MediaLimits::default());
    registry.add(video_candidate("v.mp4", 5)).unwrap();
    registry.add(image_candidate("a.png", 1)).unwrap();
    registry.add(image_candidate("b.png", 1)).unwrap();

    assert_eq!(registry.reorder(1, 0), ReorderOutcome::Blocked);
    assert_eq!(names(&registry), vec!["v.mp4", "a.png", "b.png"]);
}

#[test]
fn reorder_that_displaces_video_is_corrected() {
    let mut registry = MediaRegistry::new(MediaLimits::default());
    registry.add(video_candidate("v.mp4", 5)).unwrap();
    registry.add(image_candidate("a.png", 1)).unwrap();
    registry.add(image_candidate("b.png", 1)).unwrap();

    // Dragging the video to the tail snaps it back to the front; the
    // images keep their relative order.
    assert_eq!(registry.reorder(0, 2), ReorderOutcome::Corrected);
    assert_eq!(names(&registry), vec!["v.mp4", "a.png", "b.png"]);
    assert!(registry.invariants_hold());
}

#[test]
fn reorder_images_without_video_is_free() {
    let mut registry = MediaRegistry::new(MediaLimits::default());
    registry.add(image_candidate("a.png", 1)).unwrap();
    registry.add(image_candidate("b.png", 1)).unwrap();
    registry.add(image_candidate("c.png", 1)).unwrap();

    assert_eq!(registry.reorder(2, 0), ReorderOutcome::Moved);
    assert_eq!(names(&registry), vec!["c.png", "a.png", "b.png"]);

    assert_eq!(registry.reorder(0, 5), ReorderOutcome::OutOfRange);
}

#[test]
fn removing_video_lifts_the_one_video_rule() {
    let mut registry = MediaRegistry::new(MediaLimits::default());
    let video_id = registry.add(video_candidate("v.mp4", 5)).unwrap();
    registry.add(image_candidate("a.png", 1)).unwrap();

    assert_eq!(
        registry.remove(video_id, &AutoConfirm),
        RemoveOutcome::Removed
    );
    registry.add(video_candidate("v2.mp4", 6)).unwrap();
    assert_eq!(names(&registry), vec!["v2.mp4", "a.png"]);
}

#[test]
fn remove_unknown_slot_reports_not_found() {
    let mut registry = MediaRegistry::new(MediaLimits::default());
    assert_eq!(
        registry.remove(uuid::Uuid::new_v4(), &AutoConfirm),
        RemoveOutcome::NotFound
    );
}

#[test]
fn batch_intake_takes_first_files_and_reports_skips() {
    let mut registry = MediaRegistry::new(MediaLimits::default());
    for i in 0..5 {
        registry
            .add(image_candidate(&format!("existing-{i}.png"), 1))
            .unwrap();
    }

    let candidates = (0..7)
        .map(|i| image_candidate(&format!("new-{i}.png"), 1))
        .collect();
    let report = registry.batch_intake(candidates);

    assert_eq!(report.accepted.len(), 4);
    assert_eq!(report.skipped, 3);
    assert!(report.rejected.is_empty());
    assert_eq!(registry.len(), 9);

    // The first four of the selection made it in, in order.
    let tail = names(&registry)[5..].to_vec();
    assert_eq!(tail, vec!["new-0.png", "new-1.png", "new-2.png", "new-3.png"]);
}

#[test]
fn batch_intake_reports_per_file_rejections() {
    let mut registry = MediaRegistry::new(MediaLimits::default());
    registry.add(image_candidate("dup.png", 1)).unwrap();

    let report = registry.batch_intake(vec![
        image_candidate("dup.png", 1),
        image_candidate("fresh.png", 1),
    ]);

    assert_eq!(report.accepted.len(), 1);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].0, "dup.png");
    assert!(matches!(report.rejected[0].1, RejectReason::Duplicate { .. }));
}

#[test]
fn invariants_hold_after_every_mutation() {
    let mut registry = MediaRegistry::new(MediaLimits::default());

    let mut ids = Vec::new();
    for i in 0..4 {
        ids.push(registry.add(image_candidate(&format!("i{i}.png"), 1)).unwrap());
        assert!(registry.invariants_hold());
    }
    ids.push(registry.add(video_candidate("v.mp4", 2)).unwrap());
    assert!(registry.invariants_hold());

    registry.reorder(2, 4);
    assert!(registry.invariants_hold());
    registry.reorder(0, 3);
    assert!(registry.invariants_hold());

    for id in ids {
        registry.remove(id, &AutoConfirm);
        assert!(registry.invariants_hold());
    }
    assert!(registry.is_empty());
}
