// Marker boundary detection shared by the batch and streaming paths.

/// Find where a marker occurs or could begin in a buffer.
///
/// A complete occurrence anywhere in `buffer` wins and its byte index is
/// returned. Otherwise the buffer's suffixes are checked from shortest to
/// longest, and the start of the first suffix that is a prefix of `marker` is
/// returned: that tail could still grow into the marker once more text
/// arrives. Returns `None` for an empty marker or when nothing qualifies.
pub fn potential_marker_start(buffer: &str, marker: &str) -> Option<usize> {
    if marker.is_empty() {
        return None;
    }

    if let Some(idx) = buffer.find(marker) {
        return Some(idx);
    }

    // Shortest suffix first, so the latest viable start wins and the fewest
    // characters are held back. Suffixes at marker length and beyond cannot
    // match: an equal one was found above, a longer one is never a prefix.
    for (idx, _) in buffer.char_indices().rev() {
        let suffix = &buffer[idx..];
        if suffix.len() >= marker.len() {
            break;
        }
        if marker.starts_with(suffix) {
            return Some(idx);
        }
    }

    None
}
