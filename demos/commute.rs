//! Rank commute routes from a few weeks of logged trips.
//!
//! Run with `RUST_LOG=tripbandit=debug cargo run --example commute` to see the
//! replay and update events.

use chrono::{TimeDelta, TimeZone, Utc};
use tracing_subscriber::EnvFilter;
use tripbandit::{
    truncate_arm_name, ConjugateBandit, Event, NormalGammaBandit, NormalGammaConfig,
    DEFAULT_WINDOW_DAYS, MAX_ARM_NAME_BYTES,
};

fn main() -> Result<(), tripbandit::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let routes: Vec<String> = [
        "metro via the central interchange",
        "bus 42",
        "bike along the river embankment, then the long bridge back over to the office park",
    ]
    .iter()
    .map(|r| truncate_arm_name(r, MAX_ARM_NAME_BYTES).to_string())
    .collect();

    let start = Utc.with_ymd_and_hms(2025, 3, 3, 8, 0, 0).unwrap();
    let trips = [
        (0, "00:38:00"),
        (1, "00:51:30"),
        (2, "00:33:10"),
        (0, "00:41:00"),
        (1, "00:47:00"),
        (2, "00:29:45"),
        (0, "00:36:20"),
        (2, "00:44:00"),
    ];
    let events: Vec<Event<&str>> = trips
        .iter()
        .enumerate()
        .map(|(day, &(route, time))| {
            Event::new(start + TimeDelta::days(day as i64), routes[route].clone(), time)
        })
        .collect();

    let cfg = NormalGammaConfig::default().with_rho(3.37);
    let mut bandit = NormalGammaBandit::new(routes, cfg)?;
    let ranking = bandit.process_events(events, DEFAULT_WINDOW_DAYS)?;

    println!("{bandit}\n");
    println!("{ranking}");
    if let Some(best) = ranking.best() {
        println!("take today: {}", best.name);
    }
    Ok(())
}
