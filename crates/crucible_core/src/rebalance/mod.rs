//! Day-2 to Day-3 team rebalancing.

pub mod rebalancer;

pub use rebalancer::TeamRebalancer;
