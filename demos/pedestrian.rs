//! A pedestrian waiting to cross at a single traffic light.
//!
//! Run with `cargo run --example pedestrian`. The light cycles on a
//! compressed timer so the demo finishes in a few seconds.

use std::time::Duration;

use crossing::CycleTiming;
use crossing::TrafficLight;
use tracing::Level;
use tracing::info;
use tracing_subscriber::fmt::Subscriber;

fn main() {
    let subscriber = Subscriber::builder()
        .compact()
        .with_max_level(Level::TRACE)
        .finish();
    tracing::subscriber::set_global_default(subscriber).unwrap();

    let timing = CycleTiming::new(Duration::from_millis(800), Duration::from_millis(1600));
    let light = TrafficLight::with_timing(timing);

    info!("the light starts {:?}", light.current_phase());
    light.simulate();

    for attempt in 1..=3 {
        light.wait_for_green();
        info!("pedestrian crosses (crossing #{attempt})");
    }

    light.stop();
    info!("simulation stopped");
}
