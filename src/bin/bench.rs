//! Benchmark for a single roster solve over a generated instance.
//!
//! Run with: cargo run --release --bin bench

use std::time::Instant;

use rostering_engine::fixtures::{self, FixtureSize};
use rostering_engine::RosterEngine;

fn main() {
    let (guards, slots) = fixtures::generate(FixtureSize::Large);

    println!("Benchmark: roster solve");
    println!("  Guards: {}", guards.len());
    println!("  Slots:  {}", slots.len());
    println!();

    let engine = RosterEngine::new(None).expect("default configuration is always valid");

    let started = Instant::now();
    let result = engine.solve(&guards, &slots, Some(30.0));
    let elapsed = started.elapsed();

    println!("Results:");
    println!("  Status:    {}", result.status);
    println!("  Feasible:  {}", result.feasible);
    println!("  Objective: {:?}", result.objective_value);
    println!("  Time:      {elapsed:.2?}");
}
