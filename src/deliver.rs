use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::SectionError;
use crate::model::SectionKey;

const SHARE_BASE_URL: &str = "https://wa.me/?text=";
const RESPONSE_BODY_PREVIEW_CHARS: usize = 200;

pub fn download_file_name(label: &str) -> String {
    format!("{}.txt", label.replace(' ', "_"))
}

/// Click-to-chat link with the message pre-filled. `/` stays unescaped.
pub fn share_link(message: &str) -> String {
    format!(
        "{SHARE_BASE_URL}{}",
        urlencoding::encode(message).replace("%2F", "/")
    )
}

/// Splits `message` into chunks of at most `limit` characters, cutting at the
/// last blank line in the window, else the last line break, else hard.
pub fn split_for_platform(message: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    if message.chars().count() <= limit {
        return vec![message.to_string()];
    }

    let mut parts = Vec::new();
    let mut remain = message;
    while remain.chars().count() > limit {
        let window_end = remain
            .char_indices()
            .nth(limit)
            .map(|(index, _)| index)
            .unwrap_or(remain.len());
        let window = &remain[..window_end];
        let cut = window
            .rfind("\n\n")
            .or_else(|| window.rfind('\n'))
            .unwrap_or(window_end);

        let part = &remain[..cut];
        if !part.is_empty() {
            parts.push(part.to_string());
        }
        remain = &remain[cut..];
        remain = remain.strip_prefix('\n').unwrap_or(remain);
    }

    if !remain.is_empty() {
        parts.push(remain.to_string());
    }
    parts
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    Delivered,
    Rejected { status: u16, body: String },
}

pub trait MessageSink {
    /// Posts one chunk. `Err` carries a transport failure.
    fn post(&self, content: &str) -> std::result::Result<PostOutcome, String>;
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

pub struct WebhookClient {
    client: reqwest::blocking::Client,
    url: String,
}

impl WebhookClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build webhook HTTP client")?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

impl MessageSink for WebhookClient {
    fn post(&self, content: &str) -> std::result::Result<PostOutcome, String> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { content })
            .send()
            .map_err(|error| error.to_string())?;

        let status = response.status().as_u16();
        if status >= 300 {
            let body = response.text().unwrap_or_default();
            return Ok(PostOutcome::Rejected {
                status,
                body: body.chars().take(RESPONSE_BODY_PREVIEW_CHARS).collect(),
            });
        }
        Ok(PostOutcome::Delivered)
    }
}

/// Logs chunks instead of posting them.
pub struct DryRunSink;

impl MessageSink for DryRunSink {
    fn post(&self, content: &str) -> std::result::Result<PostOutcome, String> {
        info!(chars = content.chars().count(), "dry-run chunk");
        debug!(content = %content, "dry-run chunk content");
        Ok(PostOutcome::Delivered)
    }
}

/// Sends every chunk of one section in order, stopping at the first failure.
/// Returns the number of chunks delivered.
pub fn deliver_section(
    sink: &dyn MessageSink,
    section: SectionKey,
    message: &str,
    limit: usize,
) -> std::result::Result<usize, SectionError> {
    let chunks = split_for_platform(message, limit);
    for (index, chunk) in chunks.iter().enumerate() {
        let chunk_number = index + 1;
        match sink.post(chunk) {
            Ok(PostOutcome::Delivered) => {
                debug!(section = %section, chunk = chunk_number, "chunk delivered");
            }
            Ok(PostOutcome::Rejected { status, body }) => {
                return Err(SectionError::DeliveryFailure {
                    section,
                    chunk: chunk_number,
                    status,
                    body,
                });
            }
            Err(reason) => {
                return Err(SectionError::DeliveryTransport {
                    section,
                    chunk: chunk_number,
                    reason,
                });
            }
        }
    }
    Ok(chunks.len())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct RecordingSink {
        posted: RefCell<Vec<String>>,
        reject_at: Option<usize>,
    }

    impl RecordingSink {
        fn new(reject_at: Option<usize>) -> Self {
            Self {
                posted: RefCell::new(Vec::new()),
                reject_at,
            }
        }
    }

    impl MessageSink for RecordingSink {
        fn post(&self, content: &str) -> std::result::Result<PostOutcome, String> {
            let mut posted = self.posted.borrow_mut();
            posted.push(content.to_string());
            if Some(posted.len()) == self.reject_at {
                return Ok(PostOutcome::Rejected {
                    status: 429,
                    body: "rate limited".to_string(),
                });
            }
            Ok(PostOutcome::Delivered)
        }
    }

    #[test]
    fn download_file_name_replaces_spaces() {
        assert_eq!(
            download_file_name("Today\u{2019}s Must-Know News"),
            "Today\u{2019}s_Must-Know_News.txt"
        );
        assert_eq!(download_file_name("Americas"), "Americas.txt");
    }

    #[test]
    fn share_link_percent_encodes_message() {
        assert_eq!(
            share_link("A/B & C\n- 5%"),
            "https://wa.me/?text=A/B%20%26%20C%0A-%205%25"
        );
    }

    #[test]
    fn short_messages_are_not_split() {
        assert_eq!(split_for_platform("short", 1800), vec!["short"]);
    }

    #[test]
    fn split_prefers_blank_line_then_line_break() {
        let message = "aaaa\n\nbbbb\ncccc";
        assert_eq!(split_for_platform(message, 12), vec!["aaaa", "\nbbbb\ncccc"]);

        let message = "aaaa\nbbbb\ncccc";
        assert_eq!(split_for_platform(message, 12), vec!["aaaa\nbbbb", "cccc"]);
    }

    #[test]
    fn split_hard_cuts_on_character_boundaries() {
        let message = "\u{00E9}".repeat(5);
        assert_eq!(
            split_for_platform(&message, 2),
            vec!["\u{00E9}\u{00E9}", "\u{00E9}\u{00E9}", "\u{00E9}"]
        );
    }

    #[test]
    fn split_pieces_stay_within_limit() {
        let message = (0..400)
            .map(|index| format!("- bullet number {index}.\n"))
            .collect::<String>();
        let parts = split_for_platform(&message, 1800);
        assert!(parts.len() > 1);
        assert!(parts.iter().all(|part| part.chars().count() <= 1800));
        assert!(parts.iter().all(|part| !part.is_empty()));
    }

    #[test]
    fn deliver_section_sends_all_chunks() {
        let sink = RecordingSink::new(None);
        let sent = deliver_section(&sink, SectionKey::Americas, "aaaa\nbbbb\ncccc", 12)
            .expect("all chunks delivered");
        assert_eq!(sent, 2);
        assert_eq!(*sink.posted.borrow(), vec!["aaaa\nbbbb", "cccc"]);
    }

    #[test]
    fn deliver_section_stops_at_first_rejection() {
        let sink = RecordingSink::new(Some(1));
        let error = deliver_section(&sink, SectionKey::GreaterChina, "aaaa\nbbbb\ncccc", 5)
            .expect_err("first chunk rejected");
        assert_eq!(sink.posted.borrow().len(), 1);
        match error {
            SectionError::DeliveryFailure {
                section,
                chunk,
                status,
                body,
            } => {
                assert_eq!(section, SectionKey::GreaterChina);
                assert_eq!(chunk, 1);
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
