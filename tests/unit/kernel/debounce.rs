use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Class {
    Save,
    Create,
}

const QUIET: Duration = Duration::from_millis(300);

#[test]
fn burst_of_schedules_fires_once_with_last_job() {
    let t0 = Instant::now();
    let mut debouncer: Debouncer<Class, u32> = Debouncer::new();

    for i in 0..10u32 {
        let now = t0 + Duration::from_millis(u64::from(i) * 50);
        debouncer.schedule(Class::Save, i, QUIET, now);
        assert!(debouncer.poll(now).is_empty());
    }

    // last trigger at 450ms, deadline 750ms
    assert!(debouncer.poll(t0 + Duration::from_millis(749)).is_empty());
    let fired = debouncer.poll(t0 + Duration::from_millis(750));
    assert_eq!(fired, vec![(Class::Save, 9)]);
    assert!(debouncer.poll(t0 + Duration::from_secs(5)).is_empty());
}

#[test]
fn schedule_reports_superseded_job() {
    let now = Instant::now();
    let mut debouncer: Debouncer<Class, &str> = Debouncer::new();

    assert!(!debouncer.schedule(Class::Save, "a", QUIET, now));
    assert!(debouncer.schedule(Class::Save, "b", QUIET, now));
    assert_eq!(debouncer.poll(now + QUIET), vec![(Class::Save, "b")]);
}

#[test]
fn cancel_is_idempotent() {
    let now = Instant::now();
    let mut debouncer: Debouncer<Class, u8> = Debouncer::new();
    debouncer.schedule(Class::Save, 1, QUIET, now);

    assert_eq!(debouncer.cancel(Class::Save), Some(1));
    assert_eq!(debouncer.cancel(Class::Save), None);
    assert!(!debouncer.is_pending(Class::Save));
    assert!(debouncer.poll(now + QUIET).is_empty());
}

#[test]
fn classes_are_independent() {
    let t0 = Instant::now();
    let mut debouncer: Debouncer<Class, u8> = Debouncer::new();
    debouncer.schedule(Class::Save, 1, QUIET, t0);
    debouncer.schedule(Class::Create, 2, Duration::from_millis(100), t0);

    assert_eq!(debouncer.next_deadline(), Some(t0 + Duration::from_millis(100)));

    debouncer.cancel(Class::Create);
    assert!(debouncer.is_pending(Class::Save));
    assert_eq!(debouncer.next_deadline(), Some(t0 + QUIET));
}

#[test]
fn poll_returns_due_jobs_earliest_first() {
    let t0 = Instant::now();
    let mut debouncer: Debouncer<Class, u8> = Debouncer::new();
    debouncer.schedule(Class::Save, 1, QUIET, t0);
    debouncer.schedule(Class::Create, 2, Duration::from_millis(100), t0);

    let fired = debouncer.poll(t0 + Duration::from_secs(1));
    assert_eq!(fired, vec![(Class::Create, 2), (Class::Save, 1)]);
    assert_eq!(debouncer.next_deadline(), None);
}
