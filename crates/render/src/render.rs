//! Record rendering

use chrono::NaiveDateTime;
use owo_colors::{OwoColorize, Style};

use logtee_record::{Record, Severity};

use crate::RenderError;

/// Timestamp format records carry on the wire
const INPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Rendering options
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// chrono format string for the displayed timestamp
    pub timespec: String,

    /// Width of the component column (pad or truncate)
    pub component_width: usize,

    /// Width of the type column (pad or truncate)
    pub type_width: usize,

    /// Colorize output based on priority
    pub colors: bool,

    /// Append the `line` field when present
    pub show_lines: bool,

    /// Append the `stacktrace` field as an indented block when present
    pub show_stacktrace: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            timespec: "%b %e %H:%M:%S%.3f".to_string(),
            component_width: 8,
            type_width: 8,
            colors: true,
            show_lines: true,
            show_stacktrace: true,
        }
    }
}

/// Renders records into display lines
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    /// Create a renderer with the given options
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render one record into one display string
    ///
    /// Line shape: `<ts> {<component>} [<type>]: <payload>`, optionally
    /// followed by the source location and an indented stacktrace block.
    pub fn render(&self, record: &Record) -> Result<String, RenderError> {
        let raw_ts = record.timestamp()?;
        let component = record.component()?;
        let message_type = record.message_type()?;
        let payload = record.data_text()?;

        let parsed = NaiveDateTime::parse_from_str(raw_ts, INPUT_TIMESTAMP_FORMAT).map_err(
            |source| RenderError::Timestamp {
                value: raw_ts.to_string(),
                source,
            },
        )?;
        let ts = parsed.format(&self.options.timespec).to_string();

        let style = self.payload_style(record);
        let mut out = format!(
            "{} {{{}}} [{}]: {}",
            ts,
            pad_or_truncate(component, self.options.component_width),
            pad_or_truncate(message_type, self.options.type_width),
            payload.style(style),
        );

        if self.options.show_lines
            && let Some(location) = record.line()
        {
            let loc_style = if self.options.colors {
                Style::new().blue()
            } else {
                Style::new()
            };
            out.push_str(&format!(" ({})", location.style(loc_style)));
        }

        if self.options.show_stacktrace
            && let Some(trace) = record.stacktrace()
        {
            for trace_line in trace.split('\n') {
                out.push_str("\n  |");
                out.push_str(trace_line);
            }
        }

        Ok(out)
    }

    /// Style for the payload, driven by priority
    fn payload_style(&self, record: &Record) -> Style {
        if !self.options.colors {
            return Style::new();
        }
        // Synthesized error records are always red, priority or not.
        if record.component() == Ok("INTERNAL") && record.message_type() == Ok("ERROR") {
            return Style::new().red();
        }
        // Unknown or absent priority renders uncolored.
        match record.severity().unwrap_or(Severity::Info) {
            Severity::Emergency | Severity::Alert | Severity::Critical | Severity::Error => {
                Style::new().red().bold()
            }
            Severity::Warning => Style::new().yellow().bold(),
            Severity::Notice => Style::new().bold(),
            Severity::Info => Style::new(),
            Severity::Debug => Style::new().dimmed(),
        }
    }
}

/// Pad with spaces to `width`, or cut off at `width`
fn pad_or_truncate(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    while out.chars().count() < width {
        out.push(' ');
    }
    out
}

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;
