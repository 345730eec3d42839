use std::ops::RangeInclusive;

use anyhow::{ensure, Context, Result};

/// Image offset, 1 to 4 hex digits. Optional $ or 0x prefix.
pub fn decode_offset(s: &str) -> Result<usize> {
    let digits = s
        .strip_prefix('$')
        .or_else(|| s.strip_prefix("0x"))
        .unwrap_or(s);

    ensure!(!digits.is_empty(), "empty offset: {s:?}");
    ensure!(digits.len() <= 4, "offset too long: {s:?}");
    ensure!(
        digits.chars().all(|c| c.is_ascii_hexdigit()),
        "not a hex offset: {s:?}"
    );

    let n = usize::from_str_radix(digits, 16).with_context(|| format!("bad offset: {s:?}"))?;
    Ok(n)
}

/// `start.end`, both ends inclusive, e.g. `$400.7ff`.
pub fn decode_range(s: &str) -> Result<RangeInclusive<usize>> {
    let (start, end) = s
        .split_once('.')
        .with_context(|| format!("expected <start>.<end>, got {s:?}"))?;
    let start = decode_offset(start)?;
    let end = decode_offset(end)?;
    ensure!(start <= end, "range is backwards: {s:?}");
    Ok(start..=end)
}
