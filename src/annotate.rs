use anyhow::{Context, Result};
use regex::Regex;

use crate::cli::IconMode;
use crate::model::SectionKey;
use crate::sections::{normalize, split_lines_inclusive, strip_line_terminator, trim_line};

// First matching rule wins.
const EMOJI_RULES: [(&str, &str); 5] = [
    (r"flight|airline|airport|non-?stop|route", "\u{2708}\u{FE0F}"),
    (
        r"warn|ban|sanction|probe|investigat|violate|must-?nots|interfer",
        "\u{1F6AB}",
    ),
    (
        r"semiconductor|chip|foundry|fab|license|production|manufactur|tech|taiwan|tsmc",
        "\u{1F527}",
    ),
    (
        r"deal|agreement|talk|negotiat|summit|meeting|breakthrough|trade",
        "\u{1F91D}",
    ),
    (
        r"stock|market|index|shares|rall|sell-?off|volume|hang seng|hsi|overbought|resistance|support",
        "\u{1F4C8}",
    ),
];

/// Adds icons to verbatim section text. Words and in-line whitespace are
/// never changed. Per-line modes re-join lines with `\n`; heading mode keeps
/// the section's own line terminators.
pub struct IconAnnotator {
    bullet_prefix: Regex,
    rules: Vec<(Regex, &'static str)>,
}

impl IconAnnotator {
    pub fn new() -> Result<Self> {
        let bullet_prefix = Regex::new(r"^([ \t]*[\x{2022}\-\x{2023}\x{25AA}\x{25E6}]\s+)(.*)$")
            .context("failed to compile bullet prefix regex")?;

        let rules = EMOJI_RULES
            .iter()
            .map(|(pattern, emoji)| {
                Regex::new(pattern)
                    .with_context(|| format!("failed to compile emoji rule: {pattern}"))
                    .map(|regex| (regex, *emoji))
            })
            .collect::<Result<Vec<(Regex, &'static str)>>>()?;

        Ok(Self {
            bullet_prefix,
            rules,
        })
    }

    pub fn annotate(&self, mode: IconMode, key: SectionKey, section_text: &str) -> String {
        let icon = key.default_icon();
        let message = match mode {
            IconMode::Bullets => self.add_emoji_to_bullets(section_text, icon),
            IconMode::EveryLine => add_icon_each_line(section_text, icon),
            IconMode::Heading => add_icon_heading(section_text, icon, key.label()),
        };
        trim_trailing_blank_lines(&message).to_string()
    }

    pub fn pick_emoji<'a>(&self, payload: &str, default_icon: &'a str) -> &'a str {
        let normalized = normalize(payload);
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.is_match(&normalized))
            .map(|(_, emoji)| *emoji)
            .unwrap_or(default_icon)
    }

    /// Prefixes an emoji on the first line of every bullet item only.
    pub fn add_emoji_to_bullets(&self, section_text: &str, default_icon: &str) -> String {
        text_lines(section_text)
            .into_iter()
            .map(|line| match self.bullet_prefix.captures(line) {
                Some(captures) => {
                    let payload = captures.get(2).map(|value| value.as_str()).unwrap_or("");
                    format!("{} {}", self.pick_emoji(payload, default_icon), line)
                }
                None => line.to_string(),
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}

fn text_lines(section_text: &str) -> Vec<&str> {
    split_lines_inclusive(section_text)
        .into_iter()
        .map(strip_line_terminator)
        .collect()
}

pub fn add_icon_each_line(section_text: &str, icon: &str) -> String {
    text_lines(section_text)
        .into_iter()
        .map(|line| {
            if trim_line(line).is_empty() {
                line.to_string()
            } else {
                format!("{icon} {line}")
            }
        })
        .collect::<Vec<String>>()
        .join("\n")
}

pub fn add_icon_heading(section_text: &str, icon: &str, label: &str) -> String {
    format!("{icon} {label}\n{section_text}")
}

/// Drops trailing blank lines and the terminator of the last kept line.
fn trim_trailing_blank_lines(message: &str) -> &str {
    let lines = split_lines_inclusive(message);
    let Some(last) = lines.iter().rposition(|line| !trim_line(line).is_empty()) else {
        return "";
    };
    let head = lines[..last].iter().map(|line| line.len()).sum::<usize>();
    &message[..head + strip_line_terminator(lines[last]).len()]
}
