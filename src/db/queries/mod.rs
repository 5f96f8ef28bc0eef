pub mod categories;
pub mod questions;

use itertools::Itertools;

/// `$1, $2, ..., $n` for an `IN (...)` list.
pub(crate) fn placeholders(count: usize) -> String {
    (1..=count).map(|n| format!("${n}")).join(", ")
}
