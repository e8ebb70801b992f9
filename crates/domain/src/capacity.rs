// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capacity extraction from free-text source cells.
//!
//! Shelter datasets record capacity as prose such as `"1,234人"`,
//! `"約300名"` or `"未定"`. Only the first number is taken.

use regex::Regex;
use std::sync::LazyLock;

/// First run of digits, either thousands-grouped or ungrouped.
///
/// The grouped alternative is tried first so `1,234` is not cut at the comma;
/// it requires at least one group, so plain `1234` falls to the second
/// alternative and is read whole.
const CAPACITY_PATTERN: &str = r"[0-9]{1,3}(?:,[0-9]{3})+|[0-9]+";

static CAPACITY_REGEX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(CAPACITY_PATTERN).ok());

/// Maps full-width digits and the full-width comma to ASCII.
fn normalize_width(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '０'..='９' => {
                char::from_u32(u32::from(c) - u32::from('０') + u32::from('0')).unwrap_or(c)
            }
            '，' => ',',
            other => other,
        })
        .collect()
}

/// Extracts a capacity figure from a free-text cell.
///
/// Returns `None` when the cell holds no digits or the figure does not fit
/// in a `u32`. A missing figure is "unknown", never zero.
#[must_use]
pub fn extract_capacity(raw: &str) -> Option<u32> {
    let regex: &Regex = CAPACITY_REGEX.as_ref()?;
    let normalized: String = normalize_width(raw);
    let matched = regex.find(&normalized)?;
    let digits: String = matched.as_str().chars().filter(char::is_ascii_digit).collect();
    digits.parse::<u32>().ok()
}
