//! Picks the billboards that belong in an availability report.

use crate::models::Billboard;

/// Billboards whose availability flag is set, in input order.
pub fn available(boards: &[Billboard]) -> Vec<&Billboard> {
    boards.iter().filter(|b| b.is_available).collect()
}
