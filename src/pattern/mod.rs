//! Diamond pattern printer over the FORMULAQSOLUTIONS alphabet.
//!
//! Rows are rotating circular slices of [`ALPHABET`]: widths step up by 2 to
//! the middle row then back down, the alphabet cursor advances by exactly one
//! position per row, and each row is left-padded by `(m - width) / 2` spaces.
//! The reference layout pads on the left only, so rows are not all the same
//! length.

/// Fixed alphabet the diamond rows are sliced from. All index arithmetic is
/// modulo `ALPHABET.len()` — never a hardcoded length.
pub const ALPHABET: &str = "FORMULAQSOLUTIONS";

/// Smallest line count a caller may request.
pub const MIN_LINES: i32 = 1;
/// Largest line count a caller may request.
pub const MAX_LINES: i32 = 100;

fn circular_slice(start: usize, len: usize) -> String {
    let bytes = ALPHABET.as_bytes();
    (0..len).map(|k| bytes[(start + k) % bytes.len()] as char).collect()
}

/// Build the diamond for `n` requested lines.
///
/// Total over all integers: `n < 1` yields an empty vec, even `n` is silently
/// rounded up to `n + 1` so the diamond always has a single widest middle row.
pub fn build_diamond(n: i32) -> Vec<String> {
    if n < MIN_LINES {
        return Vec::new();
    }
    let m = (if n % 2 == 1 { n } else { n.saturating_add(1) }) as usize;
    let mid = m / 2;

    let mut lines = Vec::with_capacity(m);
    let mut start = 0usize;
    for i in 0..m {
        let width = if i <= mid { 2 * i + 1 } else { 2 * (m - 1 - i) + 1 };
        let raw = circular_slice(start, width);
        let pad = (m - width) / 2;
        lines.push(format!("{}{}", " ".repeat(pad), raw));
        start = (start + 1) % ALPHABET.len();
    }
    lines
}

/// The diamond as a single newline-joined block, ready for display.
pub fn as_block(n: i32) -> String {
    build_diamond(n).join("\n")
}

/// Defensive parse for untrusted `lines` input: missing or non-numeric maps
/// to 1, anything else is clamped to `[MIN_LINES, MAX_LINES]`.
pub fn requested_lines(raw: Option<&str>) -> i32 {
    let n = raw.and_then(|s| s.trim().parse::<i32>().ok()).unwrap_or(MIN_LINES);
    n.clamp(MIN_LINES, MAX_LINES)
}
