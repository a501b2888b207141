//! Text formatters for CLI output.

/// Truncate to at most `max_chars` characters, ending in a unicode ellipsis.
pub fn truncate_ellipsis(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}\u{2026}")
}

/// First non-blank line of `text`, whitespace collapsed, for one-line previews.
pub fn preview_line(text: &str, max_chars: usize) -> String {
    let line = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default();
    let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_ellipsis(&collapsed, max_chars)
}

/// Format a count with label: "1 chunk", "3 chunks".
pub fn count_label(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

/// Human-readable byte size: "512 B", "2.4 KiB", "1.1 MiB".
pub fn byte_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    let value = bytes as f64;
    if value < KIB {
        format!("{bytes} B")
    } else if value < KIB * KIB {
        format!("{:.1} KiB", value / KIB)
    } else {
        format!("{:.1} MiB", value / (KIB * KIB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ellipsis_is_char_safe() {
        assert_eq!(truncate_ellipsis("short", 10), "short");
        assert_eq!(truncate_ellipsis("báo cáo quý", 5), "báo \u{2026}");
    }

    #[test]
    fn test_preview_line_skips_blank_lines() {
        assert_eq!(preview_line("\n   \n  first   line \nsecond", 40), "first line");
        assert_eq!(preview_line("", 10), "");
    }

    #[test]
    fn test_count_label() {
        assert_eq!(count_label(1, "chunk", "chunks"), "1 chunk");
        assert_eq!(count_label(0, "chunk", "chunks"), "0 chunks");
    }

    #[test]
    fn test_byte_size() {
        assert_eq!(byte_size(512), "512 B");
        assert_eq!(byte_size(2048), "2.0 KiB");
        assert_eq!(byte_size(3 * 1024 * 1024), "3.0 MiB");
    }
}
