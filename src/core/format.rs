//! Line templates
//!
//! A template is plain text with the placeholders `{level}`, `{thread}`,
//! `{message}` and `{timestamp}`. Anything else, including unknown
//! placeholders and stray braces, is copied through literally. Templates are
//! parsed once when set, so rendering is a single pass over the segments.

use super::log_level::LogLevel;
use super::thread_id::this_thread_id;
use chrono::{DateTime, Local};
use std::fmt::{self, Write};

/// Format used until `set_format` is called.
pub const DEFAULT_FORMAT: &str = "[{level}] [T{thread}] {message} [{timestamp}]";

/// strftime pattern of the `{timestamp}` placeholder
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Level,
    Thread,
    Message,
    Timestamp,
}

impl Segment {
    fn placeholder(name: &str) -> Option<Self> {
        match name {
            "level" => Some(Segment::Level),
            "thread" => Some(Segment::Thread),
            "message" => Some(Segment::Message),
            "timestamp" => Some(Segment::Timestamp),
            _ => None,
        }
    }
}

/// A parsed line template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFormat {
    template: String,
    segments: Vec<Segment>,
    uses_thread: bool,
    uses_timestamp: bool,
}

impl LineFormat {
    pub fn parse(template: impl Into<String>) -> Self {
        let template = template.into();
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template.as_str();

        while let Some(open) = rest.find('{') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let placeholder = after
                .find('}')
                .and_then(|close| Segment::placeholder(&after[..close]).map(|seg| (seg, close)));

            match placeholder {
                Some((segment, close)) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(segment);
                    rest = &after[close + 1..];
                }
                None => {
                    literal.push('{');
                    rest = after;
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        let uses_thread = segments.contains(&Segment::Thread);
        let uses_timestamp = segments.contains(&Segment::Timestamp);
        Self {
            template,
            segments,
            uses_thread,
            uses_timestamp,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    pub fn uses_message(&self) -> bool {
        self.segments.contains(&Segment::Message)
    }

    pub fn uses_thread(&self) -> bool {
        self.uses_thread
    }

    pub fn uses_timestamp(&self) -> bool {
        self.uses_timestamp
    }

    /// Render a line for the calling thread at the current local time.
    pub fn render(&self, level: LogLevel, message: &str) -> String {
        self.render_with(level, message, this_thread_id, Local::now)
    }

    /// Render with explicit sources for the thread id and the clock.
    ///
    /// `thread` and `now` are only called if the template references them.
    pub fn render_with(
        &self,
        level: LogLevel,
        message: &str,
        thread: impl FnOnce() -> u32,
        now: impl FnOnce() -> DateTime<Local>,
    ) -> String {
        let thread = self.uses_thread.then(thread);
        let timestamp = self
            .uses_timestamp
            .then(|| now().format(TIMESTAMP_FORMAT).to_string());

        let mut line = String::with_capacity(self.template.len() + message.len() + 16);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => line.push_str(text),
                Segment::Level => line.push(level.letter()),
                Segment::Message => line.push_str(message),
                Segment::Thread => {
                    if let Some(id) = thread {
                        let _ = write!(line, "{id}");
                    }
                }
                Segment::Timestamp => {
                    if let Some(ts) = &timestamp {
                        line.push_str(ts);
                    }
                }
            }
        }
        line
    }
}

impl Default for LineFormat {
    fn default() -> Self {
        Self::parse(DEFAULT_FORMAT)
    }
}

impl fmt::Display for LineFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}
