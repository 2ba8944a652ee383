pub mod calculator;
pub mod snapshot;
