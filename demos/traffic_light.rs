//! Traffic Light Simulation
//!
//! This example drives the traffic light on a virtual clock.
//!
//! Key concepts:
//! - Timed auto-transitions (red 3s, green 3s, yellow 1s)
//! - Manual overrides cancel the pending timer
//! - Pedestrian crossing, emergency flash and fault lockout
//! - Ignored events leave the light untouched
//!
//! Run with: cargo run --example traffic_light
//! Set RUST_LOG=stoplight=debug to see every transition logged.

use std::time::Duration;
use stoplight::effects::ManualScheduler;
use stoplight::traffic::{self, LightEvent, TransitionReason};
use stoplight::Dispatch;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Traffic Light Simulation ===\n");

    let clock = ManualScheduler::new();
    let light = traffic::start(clock.clone());

    let timestamps = clock.clone();
    light.subscribe(move |record| {
        println!(
            "  {:>6}ms  {} -> {} ({}, {})",
            timestamps.now().as_millis(),
            record.from,
            record.to,
            record.trigger.label(),
            TransitionReason::of(record)
        );
    });

    println!("Initial state: {}\n", light.state());

    println!("1. Automatic cycle:");
    for _ in 0..3 {
        let waited = clock.next_due().unwrap_or_default().saturating_sub(clock.now());
        clock.advance(waited);
    }

    println!("\n2. Pedestrian request while red:");
    report(light.dispatch(LightEvent::PedestrianRequest));
    clock.advance(Duration::from_millis(8000));
    println!("  crossing window elapsed, now {}", light.state());

    println!("\n3. Pedestrian request while yellow:");
    light.dispatch(LightEvent::ManualYellow);
    report(light.dispatch(LightEvent::PedestrianRequest));

    println!("\n4. Emergency flash:");
    light.dispatch(LightEvent::Emergency);
    for _ in 0..4 {
        clock.advance(Duration::from_millis(500));
    }
    report(light.dispatch(LightEvent::Next));
    report(light.dispatch(LightEvent::ClearEmergency));

    println!("\n5. Fault lockout:");
    light.dispatch(LightEvent::Fault);
    clock.advance(Duration::from_secs(60));
    println!(
        "  after 60s: {} (timer pending: {})",
        light.state(),
        light.pending_timeout().is_some()
    );
    report(light.dispatch(LightEvent::ClearEmergency));
    report(light.dispatch(LightEvent::ResetFault));

    let stats = light.stats();
    println!("\nRecent history:");
    for record in light.history().transitions() {
        println!("  {} -> {} [{}]", record.from, record.to, TransitionReason::of(record));
    }
    println!(
        "\nAccepted: {}, ignored: {}, timeouts: {}",
        stats.accepted, stats.ignored, stats.timeouts
    );

    println!("\n=== Example Complete ===");
}

fn report(outcome: Dispatch<traffic::LightState>) {
    match outcome {
        Dispatch::Accepted { from, to } => println!("  accepted: {from} -> {to}"),
        Dispatch::Ignored { state } => println!("  ignored in {state}"),
    }
}
