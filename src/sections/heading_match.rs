use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result};
use regex::Regex;

use crate::model::SectionKey;

use super::normalize::{normalize, trim_line};

const ENUMERATION_PREFIX: &str = r"(?:\d+\s*[.)]\s*)?";

const US_ALIASES: [&str; 5] = ["us", "u.s.", "usa", "u.s.a.", "united states"];
const CN_ALIASES: [&str; 3] = ["cn", "prc", "china"];

const HEADING_MAX_CHARS: usize = 80;
const SENTENCE_ENDINGS: [char; 5] = ['.', '!', '?', ';', ','];

#[derive(Debug, Clone)]
pub struct LineRecord<'a> {
    pub index: usize,
    pub raw: &'a str,
    pub normalized: String,
}

impl<'a> LineRecord<'a> {
    pub fn new(index: usize, raw: &'a str) -> Self {
        Self {
            index,
            raw,
            normalized: normalize(raw),
        }
    }

    pub fn is_blank(&self) -> bool {
        trim_line(self.raw).is_empty()
    }
}

/// Target headings found in one pass plus every heading-shaped line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HeadingScan {
    pub targets: BTreeMap<SectionKey, usize>,
    pub heading_candidates: BTreeSet<usize>,
}

#[derive(Debug, Clone)]
pub struct HeadingMatcher {
    todays_must_know_news: Regex,
    americas: Regex,
    greater_china: Regex,
}

impl HeadingMatcher {
    pub fn new() -> Result<Self> {
        let todays_must_know_news = Regex::new(&format!(
            r"^{ENUMERATION_PREFIX}today'?s\s+must-?know\s+news\s*$"
        ))
        .context("failed to compile today's must-know news heading regex")?;
        let americas = Regex::new(&format!(r"^{ENUMERATION_PREFIX}americas\s*$"))
            .context("failed to compile americas heading regex")?;
        let greater_china = Regex::new(&format!(r"^{ENUMERATION_PREFIX}greater\s+china\s*$"))
            .context("failed to compile greater china heading regex")?;

        Ok(Self {
            todays_must_know_news,
            americas,
            greater_china,
        })
    }

    /// Whether `normalized` is, in its entirety, the heading of `key`.
    pub fn matches(&self, key: SectionKey, normalized: &str) -> bool {
        let pattern = match key {
            SectionKey::TodaysMustKnowNews => &self.todays_must_know_news,
            SectionKey::Americas => &self.americas,
            SectionKey::GreaterChina => &self.greater_china,
        };
        pattern.is_match(normalized)
    }

    pub fn scan(&self, lines: &[LineRecord<'_>]) -> HeadingScan {
        let mut scan = HeadingScan::default();

        for (position, line) in lines.iter().enumerate() {
            for key in SectionKey::ALL {
                if self.matches(key, &line.normalized) {
                    scan.targets.entry(key).or_insert(line.index);
                }
            }

            if let Some(key) = alias_target(&line.normalized) {
                let next = lines[position + 1..].iter().find(|next| !next.is_blank());
                if let Some(next) = next {
                    if self.matches(key, &next.normalized) {
                        scan.targets.entry(key).or_insert(line.index);
                    }
                }
            }

            if looks_like_heading(line.raw) {
                scan.heading_candidates.insert(line.index);
            }
        }

        scan
    }
}

/// The section whose canonical heading may follow `normalized` as the second
/// line of a two-line heading.
pub fn alias_target(normalized: &str) -> Option<SectionKey> {
    if US_ALIASES.contains(&normalized) {
        Some(SectionKey::Americas)
    } else if CN_ALIASES.contains(&normalized) {
        Some(SectionKey::GreaterChina)
    } else {
        None
    }
}

/// Short, non-empty, and not ending like a sentence.
pub fn looks_like_heading(raw: &str) -> bool {
    let trimmed = trim_line(raw);
    !trimmed.is_empty()
        && trimmed.chars().count() <= HEADING_MAX_CHARS
        && !trimmed.ends_with(SENTENCE_ENDINGS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> HeadingMatcher {
        HeadingMatcher::new().expect("heading regexes should compile")
    }

    fn records(lines: &[&'static str]) -> Vec<LineRecord<'static>> {
        lines
            .iter()
            .enumerate()
            .map(|(index, raw)| LineRecord::new(index, *raw))
            .collect()
    }

    #[test]
    fn matches_target_headings_with_optional_punctuation() {
        let matcher = matcher();
        for heading in [
            "today's must-know news",
            "todays mustknow news",
            "today's  must-know news",
        ] {
            assert!(
                matcher.matches(SectionKey::TodaysMustKnowNews, heading),
                "heading: {heading}"
            );
        }
        assert!(matcher.matches(SectionKey::Americas, "americas"));
        assert!(matcher.matches(SectionKey::GreaterChina, "greater china"));
    }

    #[test]
    fn matches_enumerated_headings() {
        let matcher = matcher();
        assert!(matcher.matches(SectionKey::TodaysMustKnowNews, &normalize("1. Today's Must-Know News")));
        assert!(matcher.matches(SectionKey::Americas, &normalize("2)Americas")));
        assert!(matcher.matches(SectionKey::GreaterChina, &normalize("3 . Greater China")));
        assert!(matcher.matches(SectionKey::GreaterChina, &normalize("12) Greater China")));
    }

    #[test]
    fn rejects_partial_line_matches() {
        let matcher = matcher();
        assert!(!matcher.matches(SectionKey::Americas, "americas outlook"));
        assert!(!matcher.matches(SectionKey::Americas, "north americas"));
        assert!(!matcher.matches(SectionKey::GreaterChina, "greater china markets"));
        assert!(!matcher.matches(SectionKey::Americas, "a. americas"));
        assert!(!matcher.matches(SectionKey::TodaysMustKnowNews, "today's must know news"));
    }

    #[test]
    fn looks_like_heading_applies_shape_rules() {
        assert!(looks_like_heading("Americas\n"));
        assert!(looks_like_heading("  Market Wrap  "));
        assert!(!looks_like_heading("   \n"));
        assert!(!looks_like_heading("Some headline here.\n"));
        assert!(!looks_like_heading("Is this a question?"));
        assert!(!looks_like_heading("First clause,"));
        assert!(!looks_like_heading("- Fed holds rates.\u{001C}"));
        assert!(looks_like_heading("Americas\u{001E}"));
        assert!(looks_like_heading(&"x".repeat(80)));
        assert!(!looks_like_heading(&"x".repeat(81)));
    }

    #[test]
    fn looks_like_heading_counts_characters_not_bytes() {
        let heading = "\u{00E9}".repeat(80);
        assert!(heading.len() > 80);
        assert!(looks_like_heading(&heading));
    }

    #[test]
    fn alias_target_recognises_fixed_sets() {
        assert_eq!(alias_target("u.s.a."), Some(SectionKey::Americas));
        assert_eq!(alias_target("united states"), Some(SectionKey::Americas));
        assert_eq!(alias_target("prc"), Some(SectionKey::GreaterChina));
        assert_eq!(alias_target("americas"), None);
    }

    #[test]
    fn scan_keeps_first_match_per_key() {
        let lines = records(&["Americas\n", "text.\n", "Americas\n", "Greater China\n"]);
        let scan = matcher().scan(&lines);
        assert_eq!(scan.targets.get(&SectionKey::Americas), Some(&0));
        assert_eq!(scan.targets.get(&SectionKey::GreaterChina), Some(&3));
        assert!(!scan.targets.contains_key(&SectionKey::TodaysMustKnowNews));
    }

    #[test]
    fn scan_prefers_alias_line_across_blank_lines() {
        let lines = records(&["US\n", "\n", "  \n", "Americas\n", "- item.\n"]);
        let scan = matcher().scan(&lines);
        assert_eq!(scan.targets.get(&SectionKey::Americas), Some(&0));
    }

    #[test]
    fn scan_ignores_alias_when_heading_already_matched() {
        let lines = records(&[
            "Greater China\n",
            "- one.\n",
            "China\n",
            "Greater China\n",
        ]);
        let scan = matcher().scan(&lines);
        assert_eq!(scan.targets.get(&SectionKey::GreaterChina), Some(&0));
    }

    #[test]
    fn scan_ignores_alias_not_followed_by_its_heading() {
        let lines = records(&["USA\n", "Markets rallied.\n", "Americas\n"]);
        let scan = matcher().scan(&lines);
        assert_eq!(scan.targets.get(&SectionKey::Americas), Some(&2));
    }

    #[test]
    fn separator_only_line_counts_as_blank() {
        let lines = records(&["US\u{001D}", "\u{001F}\u{001C}", "Americas\n"]);
        assert!(lines[1].is_blank());
        let scan = matcher().scan(&lines);
        assert_eq!(scan.targets.get(&SectionKey::Americas), Some(&0));
        assert!(!scan.heading_candidates.contains(&1));
    }

    #[test]
    fn scan_flags_target_headings_as_candidates() {
        let lines = records(&["Americas\n", "- Fed holds rates.\n", "\n", "Decoy\n"]);
        let scan = matcher().scan(&lines);
        assert_eq!(
            scan.heading_candidates.iter().copied().collect::<Vec<usize>>(),
            vec![0, 3]
        );
    }
}
