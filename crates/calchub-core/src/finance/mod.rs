//! Amortization and compounding engine plus the calculators built on it.
//!
//! `rate` -> `payment` -> `schedule` -> `summary` is the engine; `loan`,
//! `payoff` and `compound` are the calculators the UI talks to.

pub mod compound;
pub mod loan;
pub mod payment;
pub mod payoff;
pub mod rate;
pub mod schedule;
pub mod summary;
