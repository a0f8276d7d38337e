//! Multi-line aware record formatting

use super::record::LogRecord;
use super::settings::LogSettings;

/// Width of the continuation indent, sized to tuck wrapped lines under the
/// `HH:MM:SS ` header prefix.
const INDENT: &str = "         "; // 9 spaces

/// Renders records to file lines, indenting continuation lines so multi-line
/// messages stay visually attached to their header.
#[derive(Debug, Clone)]
pub struct MultiLineFormatter {
    format: String,
    date_format: String,
}

impl MultiLineFormatter {
    pub fn new(settings: &LogSettings) -> Self {
        Self {
            format: settings.format.clone(),
            date_format: settings.date_format.clone(),
        }
    }

    /// Render one record to its final file text (no trailing newline).
    ///
    /// The `{timestamp}` and `{message}` placeholders of the format template
    /// are filled in, then every line break in the result gets the fixed
    /// continuation indent. An attached failure trace already has its own
    /// structure and is appended verbatim.
    #[must_use]
    pub fn render(&self, record: &LogRecord) -> String {
        let timestamp = record.timestamp.format(&self.date_format).to_string();
        let line = self
            .format
            .replace("{timestamp}", &timestamp)
            .replace("{message}", &record.render());

        let mut rendered = line.replace('\n', &format!("\n{}", INDENT));
        if let Some(ref trace) = record.trace {
            rendered.push('\n');
            rendered.push_str(trace);
        }
        rendered
    }
}
