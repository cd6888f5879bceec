// Fixed-width UTF-8 fields

/// Longest prefix of `s` that fits in `max_bytes` without splitting a character.
pub fn truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Fits `s` into exactly `budget` bytes: truncated on a character boundary, then NUL padded.
pub fn fit_utf8(s: &str, budget: usize) -> String {
    let kept = truncate_utf8(s, budget);
    let mut out = String::with_capacity(budget);
    out.push_str(kept);
    out.extend(std::iter::repeat('\0').take(budget - kept.len()));
    out
}

/// Decodes a fixed-width title field, dropping its NUL padding.
pub(crate) fn read_title(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches('\0')
        .to_string()
}
