//! Integer-first percentage helpers (no floats).

use alloc::format;
use alloc::string::String;

/// Percentage of `num / den` in **tenths** of a percent, rounded half-to-even.
///
/// Returns `None` when `den == 0` or `num > den`.
pub fn percent_one_decimal_tenths(num: u64, den: u64) -> Option<u32> {
    if den == 0 || num > den {
        return None;
    }
    let scaled = u128::from(num) * 1000;
    let den = u128::from(den);
    let q = scaled / den;
    let r = scaled % den;
    let twice = r * 2;
    let rounded = if twice > den || (twice == den && q % 2 == 1) { q + 1 } else { q };
    // num <= den, so rounded <= 1000.
    Some(rounded as u32)
}

/// Render tenths as a one-decimal string: `667` → `"66.7"`.
pub fn format_tenths(tenths: u32) -> String {
    format!("{}.{}", tenths / 10, tenths % 10)
}
