//! Weather-Dependent Timing
//!
//! This example loads phase durations from JSON and lengthens the red and
//! green phases when the weather changes at runtime.
//!
//! Key concepts:
//! - `TimingConfig` parsed and validated from JSON
//! - Validation collects every violation, not just the first
//! - `Weather` as a pluggable timing policy
//! - A policy change applies from the next armed timer
//!
//! Run with: cargo run --example weather_timing

use stoplight::effects::ManualScheduler;
use stoplight::timing::TimingConfig;
use stoplight::traffic::{self, LightState, Weather};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Weather-Dependent Timing ===\n");

    println!("1. Rejecting a bad config:");
    match TimingConfig::from_json(r#"{ "red_ms": 0, "yellow_ms": 0 }"#) {
        Ok(_) => println!("  unexpectedly accepted"),
        Err(err) => println!("  {err}"),
    }

    println!("\n2. Loading a config:");
    let config = match TimingConfig::from_json(r#"{ "red_ms": 2000, "green_ms": 2500 }"#) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("  invalid config: {err}");
            return;
        }
    };
    println!(
        "  red {}ms, yellow {}ms, green {}ms",
        config.red_ms, config.yellow_ms, config.green_ms
    );

    let clock = ManualScheduler::new();
    let light = match traffic::start_with(&config, Weather::Normal, clock.clone()) {
        Ok(light) => light,
        Err(err) => {
            eprintln!("  failed to start: {err}");
            return;
        }
    };

    for weather in [Weather::Normal, Weather::Rain, Weather::Fog] {
        light.set_timing(weather);
        println!("\n3. One cycle in {weather:?} weather:");
        cycle(&clock, &light);
    }

    println!("\n=== Example Complete ===");
}

/// Run timers until the light is back in red, printing each phase length.
fn cycle(clock: &ManualScheduler, light: &traffic::TrafficLight) {
    loop {
        let Some(pending) = light.pending_timeout() else {
            return;
        };
        println!("  {:<7} {}ms", pending.state.to_string(), pending.delay.as_millis());
        let Some(due) = clock.next_due() else {
            return;
        };
        clock.advance(due.saturating_sub(clock.now()));
        if light.state() == LightState::Red {
            return;
        }
    }
}
