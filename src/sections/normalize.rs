/// Canonical comparison form of a line. Only used for heading detection,
/// never for output.
pub fn normalize(input: &str) -> String {
    let unified = input
        .replace('\u{2019}', "'")
        .replace('\u{2013}', "-")
        .replace('\u{2014}', "-");

    unified
        .split(is_line_space)
        .filter(|word| !word.is_empty())
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase()
}

/// Unicode whitespace plus the ASCII separators U+001C..=U+001F, which
/// `char::is_whitespace` leaves out but extracted text uses as breaks.
pub fn is_line_space(character: char) -> bool {
    character.is_whitespace() || ('\u{001C}'..='\u{001F}').contains(&character)
}

/// `line` without leading or trailing whitespace, terminators included.
pub fn trim_line(line: &str) -> &str {
    line.trim_matches(is_line_space)
}

const LINE_TERMINATORS: [char; 10] = [
    '\n', '\r', '\u{000B}', '\u{000C}', '\u{001C}', '\u{001D}', '\u{001E}', '\u{0085}',
    '\u{2028}', '\u{2029}',
];

/// Splits `text` into lines that keep their terminator, so that concatenating
/// the result reproduces `text` exactly. `\r\n` counts as one terminator.
pub fn split_lines_inclusive(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut line_start = 0usize;
    let mut chars = text.char_indices().peekable();

    while let Some((index, character)) = chars.next() {
        if !LINE_TERMINATORS.contains(&character) {
            continue;
        }

        let mut line_end = index + character.len_utf8();
        if character == '\r' {
            if let Some(&(next_index, '\n')) = chars.peek() {
                line_end = next_index + 1;
                chars.next();
            }
        }

        lines.push(&text[line_start..line_end]);
        line_start = line_end;
    }

    if line_start < text.len() {
        lines.push(&text[line_start..]);
    }

    lines
}

/// The line content without its terminator.
pub fn strip_line_terminator(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .unwrap_or_else(|| line.trim_end_matches(|character: char| LINE_TERMINATORS.contains(&character)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_unifies_typographic_punctuation() {
        assert_eq!(
            normalize("  Today\u{2019}s   Must\u{2013}Know\tNews \n"),
            "today's must-know news"
        );
        assert_eq!(normalize("Greater \u{2014} China"), "greater - china");
    }

    #[test]
    fn normalize_handles_empty_and_blank_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \t\r\n"), "");
    }

    #[test]
    fn normalize_treats_ascii_separators_as_whitespace() {
        assert_eq!(normalize("Americas\u{001E}"), "americas");
        assert_eq!(normalize("\u{001C}Greater\u{001F}China\u{001D}"), "greater china");
        assert_eq!(normalize("\u{001F}\u{001C}"), "");
    }

    #[test]
    fn trim_line_strips_terminators_and_separators() {
        assert_eq!(trim_line("  - item.\u{001C}"), "- item.");
        assert_eq!(trim_line("\u{001F}Americas\r\n"), "Americas");
        assert_eq!(trim_line(" \u{001D}\n"), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "",
            "1. Today\u{2019}s Must-Know News\n",
            "  AMERICAS  ",
            "Greater\u{00A0}China\u{2029}",
            "\u{2014}\u{2014} U.S.A. \u{2013} Markets",
            "ΣΊΣΥΦΟΣ İstanbul",
            "Americas\u{001E}",
            "\u{001C}Greater\u{001F}China\u{001D}",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "sample: {sample:?}");
        }
    }

    #[test]
    fn split_lines_inclusive_keeps_every_terminator() {
        let text = "a\nb\r\nc\rd\u{000C}e\u{2028}\n\nlast";
        let lines = split_lines_inclusive(text);
        assert_eq!(
            lines,
            vec!["a\n", "b\r\n", "c\r", "d\u{000C}", "e\u{2028}", "\n", "\n", "last"]
        );
        assert_eq!(lines.concat(), text);
    }

    #[test]
    fn split_lines_inclusive_without_trailing_text() {
        assert!(split_lines_inclusive("").is_empty());
        assert_eq!(split_lines_inclusive("only\n"), vec!["only\n"]);
    }

    #[test]
    fn strip_line_terminator_removes_only_the_terminator() {
        assert_eq!(strip_line_terminator("  - item  \r\n"), "  - item  ");
        assert_eq!(strip_line_terminator("page\u{000C}"), "page");
        assert_eq!(strip_line_terminator("no terminator"), "no terminator");
    }
}
