use std::{cell::RefCell, rc::Rc};

use super::*;
use crate::behavior::dsl::{RequestBuilder, blink, gaze, head};

type Fired = Rc<RefCell<Vec<(ChannelKind, RequestId, f64)>>>;

fn engine(kinds: &[ChannelKind]) -> (Realizer, Fired) {
    let fired = Fired::default();
    let mut r = Realizer::default();
    for &kind in kinds {
        let log = Rc::clone(&fired);
        r.register_channel(kind, move |ins: Instruction| {
            log.borrow_mut()
                .push((ins.kind, ins.request, ins.start_global))
        });
    }
    (r, fired)
}

#[test]
fn ids_are_sequential_and_report_window() {
    let (mut r, _) = engine(&[ChannelKind::Gaze]);
    let req = RequestBuilder::new()
        .instruction(gaze("CAMERA").end(2.0))
        .build()
        .unwrap();
    let a = r.submit_request(&req, 10.0).unwrap();
    let b = r.submit_request(&req, 10.0).unwrap();
    assert_eq!(a.request, RequestId(0));
    assert_eq!(b.request, RequestId(1));
    assert_eq!((a.start_global, a.end_global), (10.0, 12.0));
    assert_eq!(a.projected, 1);
    assert!(a.cancelled.is_empty());
    assert_eq!(r.pending().len(), 2);
}

#[test]
fn replace_purges_inactive_requests() {
    let (mut r, fired) = engine(&[ChannelKind::Gaze, ChannelKind::Head]);
    let a = RequestBuilder::new()
        .instruction(gaze("A").end(5.0))
        .build()
        .unwrap();
    let b = RequestBuilder::new()
        .composition(CompositionMode::Append)
        .instruction(head("NOD").end(1.0))
        .build()
        .unwrap();
    let c = RequestBuilder::new()
        .composition(CompositionMode::Replace)
        .instruction(gaze("C").end(1.0))
        .build()
        .unwrap();

    r.submit_request(&a, 0.0).unwrap();
    let b = r.submit_request(&b, 0.0).unwrap();
    assert_eq!(r.queue_len(ChannelKind::Head), 1);
    r.advance(1.0);

    let c = r.submit_request(&c, 1.0).unwrap();
    assert_eq!(c.start_global, 5.0);
    assert_eq!(c.cancelled, vec![b.request]);
    assert_eq!(r.queue_len(ChannelKind::Head), 0);
    assert_eq!(r.queued(ChannelKind::Gaze), vec![(5.0, 6.0)]);

    r.advance(10.0);
    let kinds: Vec<_> = fired.borrow().iter().map(|f| f.0).collect();
    assert_eq!(kinds, vec![ChannelKind::Gaze, ChannelKind::Gaze]);
    assert!(r.is_idle());
}

#[test]
fn backwards_tick_dispatches_nothing() {
    let (mut r, fired) = engine(&[ChannelKind::Blink]);
    let req = RequestBuilder::new()
        .start(1.0)
        .instruction(blink())
        .build()
        .unwrap();
    r.advance(0.5);
    r.submit_request(&req, 0.5).unwrap();
    assert_eq!(r.next_wake(), Some(1.5));
    assert_eq!(r.advance(0.4), 0);
    assert_eq!(r.now(), Some(0.5));
    assert_eq!(r.advance(f64::NAN), 0);
    assert_eq!(r.advance(1.5), 1);
    assert_eq!(fired.borrow().len(), 1);
    assert_eq!(r.dispatched_total(), 1);
}

#[test]
fn update_steps_clock() {
    let (mut r, fired) = engine(&[ChannelKind::Blink]);
    let req = RequestBuilder::new()
        .instruction(blink())
        .build()
        .unwrap();
    let mut clock = SimClock::starting_at(0.0);
    r.submit_request(&req, clock.now()).unwrap();
    assert_eq!(r.update(&mut clock, 1.0 / 60.0), 1);
    assert_eq!(fired.borrow().len(), 1);
    assert!(clock.now() > 0.0);
}

#[test]
fn reset_keeps_handlers_and_clears_work() {
    let (mut r, fired) = engine(&[ChannelKind::Gaze]);
    let req = RequestBuilder::new()
        .instruction(gaze("X").start(1.0).end(2.0))
        .build()
        .unwrap();
    r.submit_request(&req, 0.0).unwrap();
    r.advance(0.5);
    r.reset();
    assert!(r.is_idle());
    assert_eq!(r.next_wake(), None);
    assert_eq!(r.advance(5.0), 0);

    r.reset();
    assert!(r.is_idle());
    assert_eq!(r.now(), None);

    let again = r.submit_request(&req, 0.0).unwrap();
    assert_eq!(again.request, RequestId(1));
    assert_eq!(r.advance(1.0), 1);
    assert_eq!(fired.borrow().len(), 1);
}

#[test]
fn unregistered_kind_is_reported() {
    let (mut r, _) = engine(&[ChannelKind::Gaze]);
    let req = RequestBuilder::new()
        .instruction(gaze("X"))
        .instruction(blink())
        .build()
        .unwrap();
    assert!(r.is_registered(ChannelKind::Gaze));
    assert!(!r.is_registered(ChannelKind::Blink));
    let report = r.submit_request(&req, 0.0).unwrap();
    assert_eq!(report.projected, 1);
    assert_eq!(
        report.issues,
        vec![ScheduleIssue::UnregisteredChannel {
            kind: ChannelKind::Blink
        }]
    );
}

#[test]
fn queued_instruction_is_self_relative() {
    let (mut r, _) = engine(&[ChannelKind::Head]);
    let req = RequestBuilder::new()
        .instruction(head("NOD").start(1.0))
        .build()
        .unwrap();
    r.submit_request(&req, 2.0).unwrap();
    let ins = r.queued_instruction(ChannelKind::Head, 0).unwrap();
    assert_eq!(ins.start_global, 3.0);
    assert_eq!(ins.sync.start, 0.0);
    assert_eq!(ins.sync.end, 2.0);
    assert!(r.queued_instruction(ChannelKind::Head, 1).is_none());
    assert!(format!("{r:?}").contains("Head"));
}

#[test]
fn same_start_merges_both_dispatch_in_submission_order() {
    let (mut r, fired) = engine(&[ChannelKind::Gaze]);
    let long = RequestBuilder::new()
        .instruction(gaze("A").start(1.0).end(3.0))
        .build()
        .unwrap();
    let short = RequestBuilder::new()
        .instruction(gaze("B").start(1.0).end(2.0))
        .build()
        .unwrap();
    let a = r.submit_request(&long, 0.0).unwrap();
    let b = r.submit_request(&short, 0.0).unwrap();
    assert!(a.issues.is_empty());
    assert_eq!(r.queued(ChannelKind::Gaze), vec![(1.0, 3.0), (1.0, 2.0)]);

    assert_eq!(r.advance(10.0), 2);
    let requests: Vec<_> = fired.borrow().iter().map(|f| f.1).collect();
    assert_eq!(requests, vec![a.request, b.request]);
}

#[test]
fn replace_keeps_active_request_window() {
    let (mut r, fired) = engine(&[ChannelKind::Gaze]);
    let a = RequestBuilder::new()
        .instruction(gaze("A").start(1.0).end(5.0))
        .build()
        .unwrap();
    let b = RequestBuilder::new()
        .start(3.0)
        .instruction(gaze("B").end(1.0))
        .build()
        .unwrap();
    let c = RequestBuilder::new()
        .composition(CompositionMode::Replace)
        .instruction(gaze("C").end(1.0))
        .build()
        .unwrap();

    let a = r.submit_request(&a, 0.0).unwrap();
    let b = r.submit_request(&b, 0.0).unwrap();
    r.advance(0.5);
    let c = r.submit_request(&c, 0.5).unwrap();
    assert_eq!(c.cancelled, vec![b.request]);
    assert_eq!(r.queued(ChannelKind::Gaze), vec![(1.0, 5.0), (5.0, 6.0)]);
    let kept = r.queued_instruction(ChannelKind::Gaze, 0).unwrap();
    assert_eq!((kept.request, kept.sync.end), (a.request, 4.0));

    r.advance(10.0);
    let requests: Vec<_> = fired.borrow().iter().map(|f| f.1).collect();
    assert_eq!(requests, vec![a.request, c.request]);
}
