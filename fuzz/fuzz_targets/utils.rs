use std::str;

/// Inputs are capped to keep quadratic scanning bounded.
pub const MAX_INPUT_SIZE: usize = 64 * 1024;

/// UTF-8 view of `data` truncated to `MAX_INPUT_SIZE`, trimming at most 3
/// bytes when the cut splits a code point.
#[inline]
pub fn truncate_utf8(data: &[u8]) -> Option<&str> {
    let cap = data.len().min(MAX_INPUT_SIZE);
    (0..=3.min(cap)).find_map(|trim| str::from_utf8(&data[..cap - trim]).ok())
}
