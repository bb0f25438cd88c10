//! Line-oriented record formatting
//!
//! A [`LineFormatter`] renders a [`LogEntry`] from a template containing the
//! placeholders `%datetime%`, `%channel%`, `%level_name%`, `%message%` and
//! `%context%`. The default template produces lines such as:
//!
//! ```text
//! [2025-01-08 10:30:45] production.ERROR: boom {"code":5}
//! ```

use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    DateTime,
    Channel,
    LevelName,
    Message,
    Context,
}

/// Formats each record as one line (or one multi-line entry when inline
/// line breaks are allowed).
#[derive(Debug, Clone)]
pub struct LineFormatter {
    template: String,
    segments: Vec<Segment>,
    timestamp_format: TimestampFormat,
    allow_inline_line_breaks: bool,
    include_stacktraces: bool,
}

impl LineFormatter {
    pub const DEFAULT_FORMAT: &'static str =
        "[%datetime%] %channel%.%level_name%: %message% %context%\n";

    /// Create a formatter using [`LineFormatter::DEFAULT_FORMAT`].
    ///
    /// Line breaks inside messages are escaped and stack detail is omitted
    /// until enabled with the builder methods.
    #[must_use]
    pub fn new() -> Self {
        Self::with_format(Self::DEFAULT_FORMAT)
    }

    #[must_use]
    pub fn with_format(template: impl Into<String>) -> Self {
        let template = template.into();
        let segments = parse_template(&template);
        Self {
            template,
            segments,
            timestamp_format: TimestampFormat::default(),
            allow_inline_line_breaks: false,
            include_stacktraces: false,
        }
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Keep `\n` and `\r` inside messages instead of escaping them
    #[must_use]
    pub fn allow_inline_line_breaks(mut self, allow: bool) -> Self {
        self.allow_inline_line_breaks = allow;
        self
    }

    /// Render the source chain of an attached exception. Enabling this also
    /// allows inline line breaks so each cause gets its own line.
    #[must_use]
    pub fn include_stacktraces(mut self, include: bool) -> Self {
        self.include_stacktraces = include;
        if include {
            self.allow_inline_line_breaks = true;
        }
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn allows_inline_line_breaks(&self) -> bool {
        self.allow_inline_line_breaks
    }

    pub fn includes_stacktraces(&self) -> bool {
        self.include_stacktraces
    }

    pub fn format(&self, entry: &LogEntry) -> String {
        let mut output = String::with_capacity(self.template.len() + entry.message.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::DateTime => {
                    output.push_str(&self.timestamp_format.format(&entry.timestamp))
                }
                Segment::Channel => output.push_str(&entry.channel),
                Segment::LevelName => output.push_str(entry.level.to_str()),
                Segment::Message => output.push_str(&self.sanitize(&entry.message)),
                Segment::Context => output.push_str(&self.format_context(entry)),
            }
        }

        output
    }

    fn format_context(&self, entry: &LogEntry) -> String {
        let context = &entry.context;
        let mut rendered = if context.fields().is_empty() {
            "[]".to_string()
        } else {
            context.to_json_value().to_string()
        };

        if let Some(exception) = context.exception() {
            rendered.push_str(" [exception] ");
            rendered.push_str(&self.sanitize(&exception.message));

            if self.include_stacktraces {
                for cause in &exception.chain {
                    rendered.push('\n');
                    rendered.push_str("Caused by: ");
                    rendered.push_str(&self.sanitize(cause));
                }
            }
        }

        rendered
    }

    /// Escape line breaks and tabs so one record cannot forge another
    fn sanitize(&self, text: &str) -> String {
        if self.allow_inline_line_breaks {
            text.to_string()
        } else {
            text.replace('\n', "\\n")
                .replace('\r', "\\r")
                .replace('\t', "\\t")
        }
    }
}

impl Default for LineFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_template(template: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some(start) = rest.find('%') {
        literal.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let placeholder = after.find('%').and_then(|end| {
            let segment = match &after[..end] {
                "datetime" => Segment::DateTime,
                "channel" => Segment::Channel,
                "level_name" => Segment::LevelName,
                "message" => Segment::Message,
                "context" => Segment::Context,
                _ => return None,
            };
            Some((segment, end))
        });

        match placeholder {
            Some((segment, end)) => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(segment);
                rest = &after[end + 1..];
            }
            None => {
                literal.push('%');
                rest = after;
            }
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    segments
}
