//! Class-scoped row extraction over a roster grouped by class.

use crate::roster::{ClassSelector, Row};

/// Return the rows belonging to `selector`.
///
/// `All` hands back `rows` untouched. For a single class the first and last
/// matching rows are located and everything between them is returned, so the
/// input must keep each class in one contiguous run ([`crate::Roster`]
/// checks this on construction). A class with no rows yields an empty slice.
pub fn filter<'a>(rows: &'a [Row], selector: &ClassSelector) -> &'a [Row] {
    if selector.is_all() {
        return rows;
    }

    let Some(start) = rows.iter().position(|r| selector.matches(r)) else {
        return &[];
    };
    // `start` matched, so a last match exists.
    let end = rows.iter().rposition(|r| selector.matches(r)).unwrap_or(start);

    let run = &rows[start..=end];
    debug_assert!(
        run.iter().all(|r| selector.matches(r)),
        "rows of class '{}' are not contiguous",
        selector
    );
    run
}
