use latchsched::kernel::{register_reference_tasks, run_ticks};
use latchsched::{
    Channel, EventLog, FaultEvent, FaultEventKind, FaultLatch, FaultSnapshot, FaultState,
    LatchConfig, ReplaySource, Scheduler, SchedulerConfig,
};

/// Transitions over the first 27 samples of the reference trace.
const REFERENCE_EVENTS: [FaultEvent; 12] = [
    FaultEvent::detected(Channel::Lcd),
    FaultEvent::detected(Channel::Led),
    FaultEvent::cleared(Channel::Lcd),
    FaultEvent::detected(Channel::Gmsl),
    FaultEvent::cleared(Channel::Led),
    FaultEvent::cleared(Channel::Gmsl),
    FaultEvent::detected(Channel::Lcd),
    FaultEvent::cleared(Channel::Lcd),
    FaultEvent::detected(Channel::Led),
    FaultEvent::detected(Channel::Gmsl),
    FaultEvent::cleared(Channel::Led),
    FaultEvent::cleared(Channel::Gmsl),
];

#[test]
fn reference_trace_under_scheduler() {
    let events: EventLog<32> = EventLog::new();
    let noop = || {};
    let latch = FaultLatch::with_sink(LatchConfig::default(), ReplaySource::reference(), &events);

    let mut sched = Scheduler::new(SchedulerConfig::default());
    register_reference_tasks(&mut sched, &noop, &latch).unwrap();

    // Samples at 2000, 3000, ..., 28000.
    run_ticks(&mut sched, 28_000, || {}, || {});

    assert_eq!(events.snapshot().as_slice(), &REFERENCE_EVENTS);
    for channel in Channel::ALL {
        assert_eq!(latch.state(channel), FaultState::Normal);
    }
}

#[test]
fn first_detection_lands_on_third_sample() {
    let noop = || {};
    let latch = FaultLatch::new(LatchConfig::default(), ReplaySource::reference());
    let mut sched = Scheduler::new(SchedulerConfig::default());
    register_reference_tasks(&mut sched, &noop, &latch).unwrap();

    run_ticks(&mut sched, 3_999, || {}, || {});
    assert!(!latch.is_latched(Channel::Lcd));
    assert_eq!(latch.fault_count(Channel::Lcd), 2);

    run_ticks(&mut sched, 1, || {}, || {});
    assert!(latch.is_latched(Channel::Lcd));
    assert!(!latch.is_latched(Channel::Led));
}

#[test]
fn event_text_matches_log_format() {
    let events: EventLog<16> = EventLog::new();
    let latch = FaultLatch::with_sink(LatchConfig::default(), ReplaySource::reference(), &events);
    for _ in 0..8 {
        latch.process();
    }

    let text: Vec<String> = events.snapshot().iter().map(ToString::to_string).collect();
    assert_eq!(
        text,
        [
            "[FAULT] LCD detected",
            "[FAULT] LED detected",
            "[CLEAR] LCD cleared",
        ]
    );
}

#[test]
fn trace_repeats_after_full_cycle() {
    let events: EventLog<32> = EventLog::new();
    let latch = FaultLatch::with_sink(LatchConfig::default(), ReplaySource::reference(), &events);

    for _ in 0..33 {
        latch.process();
    }
    let first = events.snapshot();
    events.clear();
    for _ in 0..33 {
        latch.process();
    }
    assert_eq!(events.snapshot(), first);
    assert_eq!(first.len(), REFERENCE_EVENTS.len());
}

#[test]
fn all_faulted_latches_every_channel_at_threshold() {
    let latch = FaultLatch::new(LatchConfig::default(), || FaultSnapshot::new(true, true, true));

    assert!(latch.process().is_empty());
    assert!(latch.process().is_empty());
    let events = latch.process();
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|e| e.kind == FaultEventKind::Detected));

    // Sustained faults produce nothing further.
    for _ in 0..10 {
        assert!(latch.process().is_empty());
    }
    for channel in Channel::ALL {
        assert!(latch.is_latched(channel));
    }
}

#[test]
fn all_clear_never_reports() {
    let latch = FaultLatch::new(LatchConfig::default(), || FaultSnapshot::CLEAR);
    for _ in 0..20 {
        assert!(latch.process().is_empty());
    }
    for channel in Channel::ALL {
        assert_eq!(latch.state(channel), FaultState::Normal);
        assert_eq!(latch.clear_count(channel), 3);
        assert_eq!(latch.fault_count(channel), 0);
    }
}

#[test]
fn mixed_snapshot_leaves_clean_channel_alone() {
    let latch = FaultLatch::new(LatchConfig::default(), || FaultSnapshot::new(true, true, false));
    for _ in 0..3 {
        latch.process();
    }
    assert!(latch.is_latched(Channel::Lcd));
    assert!(latch.is_latched(Channel::Led));
    assert!(!latch.is_latched(Channel::Gmsl));
}

#[test]
fn interrupted_fault_run_does_not_latch() {
    let mut script = [true, true, false, true, true, false].into_iter().cycle();
    let latch = FaultLatch::new(LatchConfig::default(), move || {
        FaultSnapshot::from_array([script.next().unwrap_or(false), false, false])
    });
    for _ in 0..30 {
        assert!(latch.process().is_empty());
    }
    assert!(!latch.is_latched(Channel::Lcd));
}

#[test]
fn queries_are_idempotent() {
    let latch = FaultLatch::new(LatchConfig::default(), ReplaySource::reference());
    for _ in 0..6 {
        latch.process();
    }
    let before: Vec<_> = Channel::ALL.iter().map(|&c| latch.channel(c)).collect();
    for _ in 0..4 {
        for &channel in &Channel::ALL {
            latch.is_latched(channel);
            latch.state(channel);
        }
    }
    let after: Vec<_> = Channel::ALL.iter().map(|&c| latch.channel(c)).collect();
    assert_eq!(before, after);
}
