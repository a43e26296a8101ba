//! Difficulty scoring: the pure score formulas and the drop ledger they
//! consume.

pub mod calculator;
pub mod ledger;

pub use calculator::ScoreCalculator;
pub use ledger::{DropLedger, DropRecord};
