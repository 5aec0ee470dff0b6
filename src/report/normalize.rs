//! Metric value normalization
//!
//! Report `avg` attributes are written with the locale of the machine that
//! produced the report: `1,234`, `2.5 %`, `+0.3`, `<0.01`, or a sentinel
//! such as `-` or `NaN` when nothing was measured.

/// Value written when the measured rate rounds below the report's precision
const BELOW_PRECISION: &str = "<0.01";

/// Characters removed before parsing: space, no-break space, narrow no-break space
const SPACES: [char; 3] = [' ', '\u{00A0}', '\u{202F}'];

/// Convert raw `avg` text to a number
///
/// Commas are decimal separators. Returns `None` for anything that does not
/// parse to a finite value; that is never an error.
pub fn normalize_metric(raw: &str) -> Option<f32> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !SPACES.contains(c) && *c != '%')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);

    if cleaned == BELOW_PRECISION {
        return Some(0.0);
    }

    cleaned.parse::<f32>().ok().filter(|value| value.is_finite())
}
