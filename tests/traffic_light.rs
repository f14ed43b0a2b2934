//! Behavior of the traffic light against its transition table and timers.

mod common;

use common::{light, light_in, ms};
use parking_lot::Mutex;
use std::sync::Arc;
use stoplight::core::Trigger;
use stoplight::effects::{Dispatch, PendingTimeout};
use stoplight::traffic::{self, LightEvent, LightState, TransitionReason, Weather};

use LightEvent as Ev;
use LightState as St;

/// Every defined rule, written out independently of the builder calls.
const RULES: &[(LightState, LightEvent, LightState)] = &[
    (St::Red, Ev::Next, St::Green),
    (St::Red, Ev::ManualRed, St::Red),
    (St::Red, Ev::ManualYellow, St::Yellow),
    (St::Red, Ev::ManualGreen, St::Green),
    (St::Red, Ev::PedestrianRequest, St::PedestrianGreen),
    (St::Red, Ev::Emergency, St::Emergency),
    (St::Red, Ev::Fault, St::Fault),
    (St::Yellow, Ev::Next, St::Red),
    (St::Yellow, Ev::ManualRed, St::Red),
    (St::Yellow, Ev::ManualYellow, St::Yellow),
    (St::Yellow, Ev::ManualGreen, St::Green),
    (St::Yellow, Ev::Emergency, St::Emergency),
    (St::Yellow, Ev::Fault, St::Fault),
    (St::Green, Ev::Next, St::Yellow),
    (St::Green, Ev::ManualRed, St::Red),
    (St::Green, Ev::ManualYellow, St::Yellow),
    (St::Green, Ev::ManualGreen, St::Green),
    (St::Green, Ev::PedestrianRequest, St::PedestrianGreen),
    (St::Green, Ev::Emergency, St::Emergency),
    (St::Green, Ev::Fault, St::Fault),
    (St::PedestrianGreen, Ev::PedestrianDone, St::Red),
    (St::PedestrianGreen, Ev::Emergency, St::Emergency),
    (St::PedestrianGreen, Ev::Fault, St::Fault),
    (St::Emergency, Ev::ClearEmergency, St::Red),
    (St::EmergencyFlashOff, Ev::ClearEmergency, St::Red),
    (St::Fault, Ev::ResetFault, St::Red),
];

fn expected(state: LightState, event: LightEvent) -> Option<LightState> {
    RULES
        .iter()
        .find(|(from, on, _)| *from == state && *on == event)
        .map(|(_, _, to)| *to)
}

#[test]
fn table_matches_every_state_event_pair() {
    let table = traffic::table();
    for state in LightState::ALL {
        for event in LightEvent::ALL {
            assert_eq!(
                table.next(state, event).copied(),
                expected(*state, *event),
                "{state} on {event}"
            );
        }
    }
}

#[test]
fn undefined_pairs_are_ignored_without_side_effects() {
    for state in LightState::ALL {
        for event in LightEvent::ALL {
            if expected(*state, *event).is_some() {
                continue;
            }
            let (clock, light) = light_in(*state);
            let pending_before = light.pending_timeout();
            let queued_before = clock.pending();
            let due_before = clock.next_due();
            let stats_before = light.stats();

            let outcome = light.dispatch(*event);

            assert_eq!(outcome, Dispatch::Ignored { state: *state }, "{state} on {event}");
            assert_eq!(light.state(), *state);
            assert_eq!(light.pending_timeout(), pending_before);
            assert_eq!(clock.pending(), queued_before);
            assert_eq!(clock.next_due(), due_before);
            assert_eq!(light.stats().ignored, stats_before.ignored + 1);
        }
    }
}

#[test]
fn defined_pairs_are_accepted() {
    for (from, event, to) in RULES {
        let (_clock, light) = light_in(*from);
        let outcome = light.dispatch(*event);
        assert_eq!(outcome, Dispatch::Accepted { from: *from, to: *to });
        assert_eq!(light.state(), *to);
    }
}

#[test]
fn next_cycles_red_green_yellow() {
    let (_clock, light) = light();
    assert_eq!(light.state(), St::Red);
    assert_eq!(light.dispatch(Ev::Next).state(), &St::Green);
    assert_eq!(light.dispatch(Ev::Next).state(), &St::Yellow);
    assert_eq!(light.dispatch(Ev::Next).state(), &St::Red);
}

#[test]
fn starts_red_with_timer_armed() {
    let (clock, light) = light();
    assert_eq!(
        light.pending_timeout(),
        Some(PendingTimeout {
            state: St::Red,
            target: St::Green,
            delay: ms(3000),
        })
    );
    assert_eq!(clock.pending(), 1);
}

#[test]
fn red_times_out_to_green_after_3000ms() {
    let (clock, light) = light();
    clock.advance(ms(2999));
    assert_eq!(light.state(), St::Red);
    clock.advance(ms(1));
    assert_eq!(light.state(), St::Green);
}

#[test]
fn automatic_cycle_follows_phase_durations() {
    let (clock, light) = light();
    clock.advance(ms(3000));
    assert_eq!(light.state(), St::Green);
    clock.advance(ms(3000));
    assert_eq!(light.state(), St::Yellow);
    clock.advance(ms(1000));
    assert_eq!(light.state(), St::Red);
    assert_eq!(light.stats().timeouts, 3);
}

#[test]
fn manual_event_cancels_old_timeout() {
    let (clock, light) = light();
    clock.advance(ms(2000));
    assert!(light.dispatch(Ev::ManualRed).is_accepted());

    // The first red timer was due at 3000ms.
    clock.advance(ms(1000));
    assert_eq!(light.state(), St::Red);
    assert_eq!(light.stats().timeouts, 0);
    assert_eq!(clock.pending(), 1);

    clock.advance(ms(2000));
    assert_eq!(light.state(), St::Green);
}

#[test]
fn manual_yellow_before_red_timeout() {
    let (clock, light) = light();
    clock.advance(ms(1000));
    light.dispatch(Ev::ManualYellow);

    clock.advance(ms(1000));
    assert_eq!(light.state(), St::Red);
    // Red re-armed at 2000ms; the first red timer would have fired at 3000ms.
    clock.advance(ms(1000));
    assert_eq!(light.state(), St::Red);
    clock.advance(ms(2000));
    assert_eq!(light.state(), St::Green);
}

#[test]
fn emergency_from_each_cyclic_state() {
    for state in LightState::CYCLIC {
        let (_clock, light) = light_in(state);
        assert_eq!(light.dispatch(Ev::Emergency).state(), &St::Emergency);
    }
}

#[test]
fn emergency_flashes_until_cleared() {
    let (clock, light) = light_in(St::Emergency);
    for _ in 0..10 {
        clock.advance(ms(500));
        assert_eq!(light.state(), St::EmergencyFlashOff);
        clock.advance(ms(500));
        assert_eq!(light.state(), St::Emergency);
    }
    assert_eq!(light.dispatch(Ev::ClearEmergency).state(), &St::Red);
    assert_eq!(light.pending_timeout().map(|p| p.target), Some(St::Green));
}

#[test]
fn clear_emergency_from_flash_off() {
    let (clock, light) = light_in(St::EmergencyFlashOff);
    assert_eq!(light.dispatch(Ev::ClearEmergency).state(), &St::Red);
    clock.advance(ms(500));
    assert_eq!(light.state(), St::Red);
}

#[test]
fn pedestrian_request_from_red_and_green() {
    for state in [St::Red, St::Green] {
        let (_clock, light) = light_in(state);
        assert_eq!(
            light.dispatch(Ev::PedestrianRequest).state(),
            &St::PedestrianGreen
        );
    }
}

#[test]
fn pedestrian_request_ignored_from_yellow() {
    let (_clock, light) = light_in(St::Yellow);
    let outcome = light.dispatch(Ev::PedestrianRequest);
    assert!(!outcome.is_accepted());
    assert_eq!(light.state(), St::Yellow);
}

#[test]
fn pedestrian_done_returns_to_red() {
    let (clock, light) = light_in(St::PedestrianGreen);
    clock.advance(ms(4000));
    assert_eq!(light.dispatch(Ev::PedestrianDone).state(), &St::Red);

    // The crossing timer would have fired at 8000ms.
    clock.advance(ms(2999));
    assert_eq!(light.state(), St::Red);
    clock.advance(ms(1));
    assert_eq!(light.state(), St::Green);
}

#[test]
fn pedestrian_window_times_out_after_8000ms() {
    let (clock, light) = light_in(St::PedestrianGreen);
    clock.advance(ms(7999));
    assert_eq!(light.state(), St::PedestrianGreen);
    clock.advance(ms(1));
    assert_eq!(light.state(), St::Red);
}

#[test]
fn fault_from_each_cyclic_state() {
    for state in LightState::CYCLIC {
        let (_clock, light) = light_in(state);
        assert_eq!(light.dispatch(Ev::Fault).state(), &St::Fault);
    }
}

#[test]
fn fault_has_no_timeout_and_only_reset_exits() {
    let (clock, light) = light_in(St::Fault);
    assert!(light.pending_timeout().is_none());
    assert_eq!(clock.pending(), 0);

    clock.advance(ms(60_000));
    assert_eq!(light.state(), St::Fault);

    for event in LightEvent::ALL {
        if *event != Ev::ResetFault {
            assert!(!light.dispatch(*event).is_accepted(), "{event}");
        }
    }
    assert_eq!(light.state(), St::Fault);

    assert_eq!(light.dispatch(Ev::ResetFault).state(), &St::Red);
    clock.advance(ms(3000));
    assert_eq!(light.state(), St::Green);
}

#[test]
fn listeners_receive_previous_new_and_trigger() {
    let (clock, light) = light();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    light.subscribe(move |record| {
        sink.lock().push((
            record.from,
            record.to,
            record.trigger.clone(),
            TransitionReason::of(record),
        ));
    });

    light.dispatch(Ev::Emergency);
    clock.advance(ms(500));
    light.dispatch(Ev::Next);
    light.dispatch(Ev::ClearEmergency);

    assert_eq!(
        *seen.lock(),
        vec![
            (
                St::Red,
                St::Emergency,
                Trigger::Event(Ev::Emergency),
                TransitionReason::Emergency
            ),
            (
                St::Emergency,
                St::EmergencyFlashOff,
                Trigger::Timeout { after: ms(500) },
                TransitionReason::Emergency
            ),
            (
                St::EmergencyFlashOff,
                St::Red,
                Trigger::Event(Ev::ClearEmergency),
                TransitionReason::Normal
            ),
        ]
    );
}

#[test]
fn history_keeps_last_ten_transitions() {
    let (_clock, light) = light();
    for _ in 0..12 {
        light.dispatch(Ev::Next);
    }

    let history = light.history();
    assert_eq!(history.transitions().len(), 10);
    assert_eq!(history.latest().map(|r| r.to), Some(St::Red));
    assert_eq!(light.stats().accepted, 12);
}

#[test]
fn weather_change_applies_from_next_phase() {
    let (clock, light) = light();
    light.set_timing(Weather::Rain);

    clock.advance(ms(3000));
    assert_eq!(light.state(), St::Green);
    assert_eq!(light.pending_timeout().map(|p| p.delay), Some(ms(4000)));

    clock.advance(ms(3999));
    assert_eq!(light.state(), St::Green);
    clock.advance(ms(1));
    assert_eq!(light.state(), St::Yellow);
    assert_eq!(light.pending_timeout().map(|p| p.delay), Some(ms(1000)));
}

#[test]
fn concurrent_dispatch_keeps_one_timer() {
    const THREADS: usize = 8;
    const ROUNDS: usize = 500;

    let (clock, light) = light();
    let table = traffic::table();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    light.subscribe(move |record| sink.lock().push((record.from, record.to)));

    std::thread::scope(|scope| {
        for worker in 0..THREADS {
            let clock = clock.clone();
            let light = light.clone();
            scope.spawn(move || {
                for round in 0..ROUNDS {
                    let event = LightEvent::ALL[(worker + round) % LightEvent::ALL.len()];
                    light.dispatch(event);
                    if round % 7 == worker % 7 {
                        clock.advance(ms(137));
                    }
                    assert!(clock.pending() <= 1);
                }
            });
        }
    });

    let state = light.state();
    let stats = light.stats();
    assert!(clock.pending() <= 1);
    assert_eq!(
        light.pending_timeout().is_some(),
        table.timeout(&state).is_some()
    );
    assert_eq!(clock.pending(), usize::from(light.pending_timeout().is_some()));
    assert_eq!(stats.accepted + stats.ignored, (THREADS * ROUNDS) as u64);

    // Notifications form one unbroken chain ending in the current state.
    let seen = seen.lock();
    assert_eq!(seen.len() as u64, stats.accepted + stats.timeouts);
    assert!(seen.windows(2).all(|pair| pair[0].1 == pair[1].0));
    assert_eq!(seen.first().map(|(from, _)| *from), Some(St::Red));
    assert_eq!(seen.last().map(|(_, to)| *to), Some(state));
}
