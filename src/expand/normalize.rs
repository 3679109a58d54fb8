//! Final cleanup pass over rendered output

/// Collapse runs of blank lines to a single blank line.
///
/// A line counts as blank when it contains only whitespace. The first line
/// of a run is kept byte-for-byte, the rest are dropped; everything else is
/// untouched. Idempotent.
pub fn collapse_blank_lines(text: &str) -> String {
    let mut kept = Vec::new();
    let mut prev_blank = false;

    for line in text.split('\n') {
        let blank = line.trim().is_empty();
        if blank && prev_blank {
            continue;
        }
        kept.push(line);
        prev_blank = blank;
    }

    kept.join("\n")
}
