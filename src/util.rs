use unicode_width::UnicodeWidthChar;

pub fn char_display_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

/// Truncate to a display-cell width, appending "..." when anything was cut
/// and the width allows it.
pub fn truncate_line(input: &str, width: usize) -> String {
    let width = width.max(1);
    let mut out = String::new();
    let mut used = 0usize;
    let mut truncated = false;

    for ch in input.chars() {
        let ch_width = char_display_width(ch);
        if used + ch_width > width {
            truncated = true;
            break;
        }
        out.push(ch);
        used += ch_width;
    }

    if truncated && width >= 4 {
        while out
            .chars()
            .map(char_display_width)
            .sum::<usize>()
            > width - 3
        {
            out.pop();
        }
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_line_respects_display_width() {
        assert_eq!(truncate_line("short", 10), "short");
        assert_eq!(truncate_line("a long status line", 9), "a long...");
    }

    #[test]
    fn test_truncate_line_handles_wide_characters() {
        // Each of these characters occupies two display cells.
        let truncated = truncate_line("路口信号配时优化", 8);
        assert!(truncated.chars().map(char_display_width).sum::<usize>() <= 8);
    }
}
