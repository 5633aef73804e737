use super::*;

fn request(mode: CompositionMode, start: f64, end: f64) -> Request {
    Request {
        id: RequestId(0),
        composition: mode,
        start,
        end,
        instructions: Vec::new(),
        start_global: 0.0,
        end_global: 0.0,
    }
}

fn entry(id: u64, mode: CompositionMode, window: (f64, f64)) -> PendingEntry {
    PendingEntry {
        id: RequestId(id),
        composition: mode,
        start_global: window.0,
        end_global: window.1,
        active: false,
        handles: Vec::new(),
    }
}

fn ids(stack: &PendingStack) -> Vec<u64> {
    stack.entries().iter().map(|e| e.id.0).collect()
}

#[test]
fn merge_is_relative_to_now() {
    let stack = PendingStack::new();
    let w = stack.resolve(&request(CompositionMode::Merge, 0.0, 2.0), 10.0);
    assert_eq!(w, (10.0, 12.0));
    let w = stack.resolve(&request(CompositionMode::Merge, 0.5, 2.0), 10.0);
    assert_eq!(w, (10.5, 12.0));
}

#[test]
fn append_follows_tail() {
    let mut stack = PendingStack::new();
    let append = request(CompositionMode::Append, 0.0, 1.0);
    assert_eq!(stack.resolve(&append, 0.0), (0.0, 1.0));

    stack.insert(entry(1, CompositionMode::Merge, (0.0, 2.0)), 0.0);
    assert_eq!(stack.resolve(&append, 0.0), (2.0, 3.0));
}

#[test]
fn replace_waits_for_active_entries() {
    let mut stack = PendingStack::new();
    stack.insert(entry(1, CompositionMode::Merge, (0.0, 5.0)), 0.0);
    stack.insert(entry(2, CompositionMode::Append, (5.0, 6.0)), 0.0);
    let replace = request(CompositionMode::Replace, 0.0, 1.0);
    assert_eq!(stack.resolve(&replace, 1.0), (5.0, 6.0));

    let cancelled = stack.cancel_inactive(1.0);
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].id, RequestId(2));
    assert_eq!(ids(&stack), vec![1]);
}

#[test]
fn replace_on_idle_stack_starts_now() {
    let stack = PendingStack::new();
    let replace = request(CompositionMode::Replace, 0.0, 1.0);
    assert_eq!(stack.resolve(&replace, 4.0), (4.0, 5.0));
}

#[test]
fn merge_inserts_by_start() {
    let mut stack = PendingStack::new();
    stack.insert(entry(1, CompositionMode::Merge, (0.0, 1.0)), 0.0);
    stack.insert(entry(2, CompositionMode::Merge, (3.0, 4.0)), 0.0);
    stack.insert(entry(3, CompositionMode::Merge, (1.0, 9.0)), 0.0);
    stack.insert(entry(4, CompositionMode::Merge, (1.0, 2.0)), 0.0);
    assert_eq!(ids(&stack), vec![1, 3, 4, 2]);
}

#[test]
fn overwrite_splices_before_later_ending_tail() {
    let mut stack = PendingStack::new();
    stack.insert(entry(1, CompositionMode::Merge, (0.0, 1.0)), 0.5);
    stack.insert(entry(2, CompositionMode::Append, (1.0, 4.0)), 0.5);
    stack.insert(entry(3, CompositionMode::Overwrite, (0.5, 2.0)), 0.5);
    assert_eq!(ids(&stack), vec![1, 3, 2]);

    stack.insert(entry(4, CompositionMode::Overwrite, (0.5, 5.0)), 0.5);
    assert_eq!(ids(&stack), vec![1, 3, 2, 4]);
}

#[test]
fn tick_activates_then_expires() {
    let mut stack = PendingStack::new();
    stack.insert(entry(1, CompositionMode::Merge, (0.0, 2.0)), 0.0);
    stack.insert(entry(2, CompositionMode::Merge, (1.0, 3.0)), 0.0);

    assert_eq!(stack.tick(0.5), 0);
    assert!(stack.entries()[0].active);
    assert!(!stack.entries()[1].active);

    assert_eq!(stack.tick(2.0), 1);
    assert_eq!(ids(&stack), vec![2]);
    assert!(stack.entries()[0].active);

    assert_eq!(stack.tick(3.0), 1);
    assert!(stack.is_empty());
}
