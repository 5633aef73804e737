use super::*;
use crate::{
    behavior::{kind::ChannelKind, model::RequestId},
    schedule::test_support::relative,
};

fn table(kinds: &[ChannelKind]) -> ChannelTable {
    let mut t = ChannelTable::default();
    for &k in kinds {
        t.register(k, Box::new(|_: Instruction| {}));
    }
    t
}

fn request(id: u64, start_global: f64, instructions: Vec<Instruction>) -> Request {
    let end = instructions.iter().map(|i| i.sync.end).fold(0.0, f64::max);
    Request {
        id: RequestId(id),
        composition: instructions
            .first()
            .map_or(CompositionMode::Merge, |i| i.composition),
        start: 0.0,
        end,
        instructions,
        start_global,
        end_global: start_global + end,
    }
}

fn windows(channels: &ChannelTable, kind: ChannelKind) -> Vec<(f64, f64)> {
    channels
        .queue(kind)
        .map(|q| q.iter().map(|e| (e.start_global, e.end_global)).collect())
        .unwrap_or_default()
}

fn project(
    channels: &mut ChannelTable,
    arena: &mut Arena<Instruction>,
    req: Request,
) -> (Vec<Handle>, Vec<ScheduleIssue>) {
    let mut issues = Vec::new();
    let handles = project_request(req, channels, arena, &mut issues);
    (handles, issues)
}

#[test]
fn merge_at_ten_projects_to_global_window() {
    let mut channels = table(&[ChannelKind::Gaze]);
    let mut arena = Arena::new();
    let (handles, issues) = project(
        &mut channels,
        &mut arena,
        request(1, 10.0, vec![relative(ChannelKind::Gaze, 1, 0.0, 2.0)]),
    );
    assert!(issues.is_empty());
    assert_eq!(handles.len(), 1);
    assert_eq!(windows(&channels, ChannelKind::Gaze), vec![(10.0, 12.0)]);

    let ins = arena.get(handles[0]).unwrap();
    assert_eq!(ins.sync.start, 0.0);
    assert_eq!(ins.sync.end, 2.0);
    assert!(ins.sync.is_ordered());
}

#[test]
fn interior_points_become_offsets_from_start() {
    let mut channels = table(&[ChannelKind::Gaze]);
    let mut arena = Arena::new();
    let ins = relative(ChannelKind::Gaze, 1, 1.0, 3.0);
    let ready = ins.sync.ready;
    let (handles, _) = project(&mut channels, &mut arena, request(1, 4.0, vec![ins]));
    let ins = arena.get(handles[0]).unwrap();
    assert_eq!(ins.window(), (5.0, 7.0));
    assert!((ins.sync.ready - (ready - 1.0)).abs() < 1e-12);
    assert_eq!(ins.sync.end, 2.0);
}

#[test]
fn merge_leaves_overlapping_entries_untouched() {
    let mut channels = table(&[ChannelKind::Head]);
    let mut arena = Arena::new();
    let (first, _) = project(
        &mut channels,
        &mut arena,
        request(1, 0.0, vec![relative(ChannelKind::Head, 1, 0.0, 2.0)]),
    );
    project(
        &mut channels,
        &mut arena,
        request(2, 1.0, vec![relative(ChannelKind::Head, 2, 0.0, 2.0)]),
    );
    assert_eq!(
        windows(&channels, ChannelKind::Head),
        vec![(0.0, 2.0), (1.0, 3.0)]
    );
    let kept = arena.get(first[0]).unwrap();
    assert_eq!(kept.window(), (0.0, 2.0));
    assert_eq!(kept.sync.end, 2.0);

    let mut issues = Vec::new();
    check_invariants(&channels, &mut issues);
    assert_eq!(
        issues,
        vec![ScheduleIssue::InvariantViolation {
            kind: ChannelKind::Head,
            index: 0
        }]
    );
}

#[test]
fn earlier_newcomer_goes_before_later_entries() {
    let mut channels = table(&[ChannelKind::Head]);
    let mut arena = Arena::new();
    project(
        &mut channels,
        &mut arena,
        request(1, 3.0, vec![relative(ChannelKind::Head, 1, 0.0, 2.0)]),
    );
    project(
        &mut channels,
        &mut arena,
        request(2, 2.5, vec![relative(ChannelKind::Head, 2, 0.0, 1.5)]),
    );
    assert_eq!(
        windows(&channels, ChannelKind::Head),
        vec![(2.5, 4.0), (3.0, 5.0)]
    );
    assert_eq!(arena.len(), 2);
}

#[test]
fn equal_starts_keep_submission_order() {
    let mut channels = table(&[ChannelKind::Face]);
    let mut arena = Arena::new();
    for id in 1..=3 {
        project(
            &mut channels,
            &mut arena,
            request(id, 0.0, vec![relative(ChannelKind::Face, id, 0.0, 1.0)]),
        );
    }
    let order: Vec<_> = channels
        .queue(ChannelKind::Face)
        .unwrap()
        .iter()
        .map(|e| e.request)
        .collect();
    assert_eq!(order, vec![RequestId(1), RequestId(2), RequestId(3)]);
    assert_eq!(arena.len(), 3);
}

#[test]
fn overwrite_conflict_drops_instruction() {
    let mut channels = table(&[ChannelKind::Gesture]);
    let mut arena = Arena::new();
    project(
        &mut channels,
        &mut arena,
        request(1, 0.0, vec![relative(ChannelKind::Gesture, 1, 0.0, 2.0)]),
    );
    let mut ins = relative(ChannelKind::Gesture, 2, 0.0, 2.0);
    ins.composition = CompositionMode::Overwrite;
    let (handles, issues) = project(&mut channels, &mut arena, request(2, 1.0, vec![ins]));
    assert!(handles.is_empty());
    assert_eq!(
        issues,
        vec![ScheduleIssue::ProjectionConflict {
            kind: ChannelKind::Gesture,
            request: RequestId(2),
            start_global: 1.0,
        }]
    );
    assert_eq!(windows(&channels, ChannelKind::Gesture), vec![(0.0, 2.0)]);
}

#[test]
fn overwrite_evicts_later_overlaps() {
    let mut channels = table(&[ChannelKind::Gesture]);
    let mut arena = Arena::new();
    project(
        &mut channels,
        &mut arena,
        request(1, 0.0, vec![relative(ChannelKind::Gesture, 1, 0.0, 2.0)]),
    );
    let (later, _) = project(
        &mut channels,
        &mut arena,
        request(2, 2.5, vec![relative(ChannelKind::Gesture, 2, 0.0, 1.5)]),
    );
    let mut ins = relative(ChannelKind::Gesture, 3, 0.0, 1.0);
    ins.composition = CompositionMode::Overwrite;
    let (handles, issues) = project(&mut channels, &mut arena, request(3, 2.0, vec![ins]));
    assert_eq!(
        issues,
        vec![ScheduleIssue::OverwriteEviction {
            kind: ChannelKind::Gesture,
            evicted: RequestId(2),
            start_global: 2.5,
        }]
    );
    assert!(issues[0].dropped_instruction());
    assert_eq!(handles.len(), 1);
    assert!(!arena.contains(later[0]));
    assert_eq!(
        windows(&channels, ChannelKind::Gesture),
        vec![(0.0, 2.0), (2.0, 3.0)]
    );
}

#[test]
fn reference_start_resolves_against_global_start() {
    assert_eq!(resolve_reference(-3.0, 10.0), -7.0);
    assert_eq!(resolve_reference(-12.0, 10.0), 2.0);

    let mut issues = Vec::new();
    let mut ins = relative(ChannelKind::Gaze, 1, 0.0, 2.0);
    ins.anchors.start = Some(-12.0);
    let ins = resolve_timing(ins, 10.0, &mut issues).unwrap();
    assert!(issues.is_empty());
    assert_eq!(ins.window(), (12.0, 14.0));
    assert_eq!(ins.sync.start, 0.0);
}

#[test]
fn negative_resolved_start_is_reported_and_clamped() {
    let mut issues = Vec::new();
    let mut ins = relative(ChannelKind::Gaze, 1, 0.0, 2.0);
    ins.anchors.start = Some(-3.0);
    let ins = resolve_timing(ins, 10.0, &mut issues).unwrap();
    assert_eq!(
        issues,
        vec![ScheduleIssue::NegativeResolvedTime {
            kind: ChannelKind::Gaze,
            field: "start",
            resolved: -7.0,
        }]
    );
    assert_eq!(ins.window(), (10.0, 12.0));
}

#[test]
fn reference_end_sets_window_end() {
    let mut issues = Vec::new();
    let mut ins = relative(ChannelKind::Gaze, 1, 0.0, 2.0);
    ins.anchors.end = Some(-11.5);
    let ins = resolve_timing(ins, 10.0, &mut issues).unwrap();
    assert!(issues.is_empty());
    assert_eq!(ins.window(), (10.0, 11.5));

    let mut ins = relative(ChannelKind::Gaze, 1, 0.0, 2.0);
    ins.anchors.end = Some(-4.0);
    let ins = resolve_timing(ins, 10.0, &mut issues).unwrap();
    assert_eq!(issues.len(), 1);
    assert!(matches!(
        issues[0],
        ScheduleIssue::NegativeResolvedTime { field: "end", .. }
    ));
    assert_eq!(ins.window(), (10.0, 12.0));
}

#[test]
fn empty_resolved_window_is_dropped() {
    let mut issues = Vec::new();
    let mut ins = relative(ChannelKind::Gaze, 1, 0.0, 2.0);
    ins.anchors.end = Some(-10.0);
    assert!(resolve_timing(ins, 10.0, &mut issues).is_none());
    assert!(matches!(
        issues.as_slice(),
        [ScheduleIssue::MalformedInstruction { dropped: true, .. }]
    ));
}

#[test]
fn unregistered_kind_is_dropped() {
    let mut channels = table(&[ChannelKind::Gaze]);
    let mut arena = Arena::new();
    let (handles, issues) = project(
        &mut channels,
        &mut arena,
        request(
            1,
            0.0,
            vec![
                relative(ChannelKind::Speech, 1, 0.0, 1.0),
                relative(ChannelKind::Gaze, 1, 0.0, 1.0),
            ],
        ),
    );
    assert_eq!(handles.len(), 1);
    assert_eq!(
        issues,
        vec![ScheduleIssue::UnregisteredChannel {
            kind: ChannelKind::Speech
        }]
    );
    assert_eq!(arena.len(), 1);
}

#[test]
fn invariant_check_reports_overlap() {
    let mut channels = table(&[ChannelKind::Posture]);
    let mut arena = Arena::new();
    let a = arena.insert(relative(ChannelKind::Posture, 1, 0.0, 1.0));
    let b = arena.insert(relative(ChannelKind::Posture, 2, 0.0, 1.0));
    let queue = channels.queue_mut(ChannelKind::Posture).unwrap();
    queue.insert_at(
        0,
        QueueEntry {
            handle: a,
            request: RequestId(1),
            start_global: 0.0,
            end_global: 2.0,
        },
    );
    queue.insert_at(
        1,
        QueueEntry {
            handle: b,
            request: RequestId(2),
            start_global: 1.0,
            end_global: 3.0,
        },
    );
    let mut issues = Vec::new();
    check_invariants(&channels, &mut issues);
    assert_eq!(
        issues,
        vec![ScheduleIssue::InvariantViolation {
            kind: ChannelKind::Posture,
            index: 0
        }]
    );
}
