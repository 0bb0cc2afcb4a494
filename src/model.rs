use std::fmt;

use serde::Serialize;

/// The three sections located in a briefing document, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    TodaysMustKnowNews,
    Americas,
    GreaterChina,
}

impl SectionKey {
    pub const ALL: [SectionKey; 3] = [
        SectionKey::TodaysMustKnowNews,
        SectionKey::Americas,
        SectionKey::GreaterChina,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TodaysMustKnowNews => "todays_must_know_news",
            Self::Americas => "americas",
            Self::GreaterChina => "greater_china",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TodaysMustKnowNews => "Today\u{2019}s Must-Know News",
            Self::Americas => "Americas",
            Self::GreaterChina => "Greater China",
        }
    }

    pub fn default_icon(self) -> &'static str {
        match self {
            Self::TodaysMustKnowNews => "\u{1F4CC}",
            Self::Americas => "\u{1F1FA}\u{1F1F8}",
            Self::GreaterChina => "\u{1F1E8}\u{1F1F3}",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open byte range `[start, end)` into the extracted text, plus the line
/// indices it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionSpan {
    pub start: usize,
    pub end: usize,
    pub heading_line: usize,
    pub end_line: usize,
}

impl SectionSpan {
    pub fn slice<'a>(&self, full_text: &'a str) -> &'a str {
        &full_text[self.start..self.end]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SpanReport {
    pub key: SectionKey,
    pub label: String,
    pub heading_line: usize,
    pub end_line: usize,
    pub start: usize,
    pub end: usize,
    pub text_len: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionManifestEntry {
    pub key: SectionKey,
    pub label: String,
    pub icon: String,
    pub heading_line: usize,
    pub start: usize,
    pub end: usize,
    pub file_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionsManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_path: String,
    pub source_sha256: String,
    pub extraction_backend: String,
    pub icon_mode: String,
    pub warnings: Vec<String>,
    pub sections: Vec<SectionManifestEntry>,
}
