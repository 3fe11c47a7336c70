// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Render bin counts as a text histogram.
//!
//! Each bin is printed on its own line as its count, right aligned to the
//! width of the largest count, followed by a bar of `*`. Bars are scaled down
//! to fit [`MAX_BAR_LENGTH`] when the largest count would not fit.

pub const MAX_BAR_LENGTH: usize = 80;

const MARKER: &str = "*";

/// The length of the bar drawn for each count.
#[must_use]
pub fn scaled_lengths(counts: &[usize]) -> Vec<usize> {
    let max = counts.iter().copied().max().unwrap_or(0);
    counts
        .iter()
        .map(|&count| {
            if max > MAX_BAR_LENGTH {
                // Widened so `count * MAX_BAR_LENGTH` cannot overflow
                (count as u128 * MAX_BAR_LENGTH as u128 / max as u128) as usize
            } else {
                count
            }
        })
        .collect()
}

#[must_use]
pub fn render(counts: &[usize]) -> String {
    let max = counts.iter().copied().max().unwrap_or(0);
    let width = max.to_string().len();

    counts
        .iter()
        .zip(scaled_lengths(counts))
        .map(|(count, length)| format!("{count:>width$} {}\n", MARKER.repeat(length)))
        .collect()
}
