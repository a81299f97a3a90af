//! Expand-until-stable loops
//!
//! Pages that lazily reveal content ("load more replies", collapsed threads)
//! are expanded by clicking every expandable control, waiting, and repeating
//! until several passes in a row find nothing. The loop is an explicit state
//! machine so its termination conditions can be read and tested; the async
//! driver only adds timers around it.

pub mod driver;
pub mod state_machine;
