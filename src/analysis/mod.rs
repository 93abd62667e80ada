//! Order analysis modules.
//!
//! Filtering selects the orders a report covers; aggregation turns them
//! into totals and ranked item breakdowns.

pub mod aggregator;
pub mod filter;

pub use aggregator::*;
pub use filter::OrderFilter;
