//! Horizontal bar charts sized to the terminal.

use super::text::{display_width, pad_to_width};

const BAR: char = '█';
const MAX_LABEL_WIDTH: usize = 24;
const MIN_BAR_WIDTH: usize = 10;

/// One rendered chart row, split so rich output can style each part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarLine {
    pub label: String,
    pub bar: String,
    pub value: String,
}

impl BarLine {
    /// Plain text form: `label  bar value`.
    #[must_use]
    pub fn to_plain(&self) -> String {
        if self.bar.is_empty() {
            format!("{}  {}", self.label, self.value)
        } else {
            format!("{}  {} {}", self.label, self.bar, self.value)
        }
    }
}

/// Lay out `(label, value)` pairs as bars scaled to the largest value.
///
/// `width` is the full line width; labels are padded to a common column and
/// values are printed with `format_value`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn bar_lines<F>(entries: &[(String, f64)], width: usize, format_value: F) -> Vec<BarLine>
where
    F: Fn(f64) -> String,
{
    let values: Vec<String> = entries.iter().map(|(_, v)| format_value(*v)).collect();
    let label_width = entries
        .iter()
        .map(|(label, _)| display_width(label))
        .max()
        .unwrap_or(0)
        .min(MAX_LABEL_WIDTH);
    let value_width = values.iter().map(|v| display_width(v)).max().unwrap_or(0);
    let bar_width = width
        .saturating_sub(label_width + value_width + 3)
        .max(MIN_BAR_WIDTH);
    let max = entries
        .iter()
        .map(|(_, v)| *v)
        .fold(0.0_f64, f64::max);

    entries
        .iter()
        .zip(values)
        .map(|((label, value), shown)| {
            let len = if max > 0.0 && *value > 0.0 {
                ((value / max) * bar_width as f64).round().max(1.0) as usize
            } else {
                0
            };
            BarLine {
                label: pad_to_width(label, label_width),
                bar: BAR.to_string().repeat(len),
                value: shown,
            }
        })
        .collect()
}

/// Convert integer counts into chart entries.
#[must_use]
pub fn count_entries<'a, I>(counts: I) -> Vec<(String, f64)>
where
    I: IntoIterator<Item = (&'a String, &'a usize)>,
{
    counts
        .into_iter()
        .map(|(label, count)| (label.clone(), *count as f64))
        .collect()
}
