//! Numeric form fields - parsing, formatting and the edit buffer

/// Parse user-entered number. Accepts a comma as decimal separator.
///
/// Returns `None` for anything that is not a finite number; callers keep
/// the previous value in that case.
pub fn parse_number(text: &str) -> Option<f64> {
    let normalized = text.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Whole numbers without decimals, everything else with one
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Planned value with its unit, e.g. "10 reps"
pub fn format_target(value: f64, unit: &str) -> String {
    format!("{} {}", format_number(value), unit)
}

/// Text being typed into a numeric field
#[derive(Debug, Clone, PartialEq)]
pub struct EditBuffer {
    text: String,
}

impl EditBuffer {
    /// Start editing from the exact current value, so committing the
    /// untouched text stores the same number
    pub fn new(value: f64) -> Self {
        Self {
            text: value.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn push(&mut self, c: char) {
        if !c.is_control() {
            self.text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }
}
