#![allow(dead_code)]

use std::time::Duration;
use stoplight::effects::ManualScheduler;
use stoplight::traffic::{self, LightEvent, LightState, TrafficLight};

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

pub fn light() -> (ManualScheduler, TrafficLight) {
    let clock = ManualScheduler::new();
    let light = traffic::start(clock.clone());
    (clock, light)
}

/// Drive a fresh light into `state` without letting any timer fire.
pub fn light_in(state: LightState) -> (ManualScheduler, TrafficLight) {
    let (clock, light) = light();
    match state {
        LightState::Red => {}
        LightState::Yellow => {
            light.dispatch(LightEvent::ManualYellow);
        }
        LightState::Green => {
            light.dispatch(LightEvent::Next);
        }
        LightState::PedestrianGreen => {
            light.dispatch(LightEvent::PedestrianRequest);
        }
        LightState::Emergency => {
            light.dispatch(LightEvent::Emergency);
        }
        LightState::EmergencyFlashOff => {
            light.dispatch(LightEvent::Emergency);
            clock.advance(ms(500));
        }
        LightState::Fault => {
            light.dispatch(LightEvent::Fault);
        }
    }
    assert_eq!(light.state(), state);
    (clock, light)
}
