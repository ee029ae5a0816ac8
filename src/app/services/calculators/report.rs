//! Fixed-width text reports

use crate::constants::{REPORT_LABEL_WIDTH, REPORT_VALUE_WIDTH};

const BANNER_WIDTH: usize = 92;

/// Render labelled values as a fixed-width table
///
/// Values print as absolute amounts with two decimals, right-aligned.
pub fn render_report<I>(headers: (&str, &str), rows: I) -> String
where
    I: IntoIterator<Item = (String, f64)>,
{
    let banner = "=".repeat(BANNER_WIDTH);
    let mut out = String::new();

    out.push_str(&banner);
    out.push('\n');
    out.push_str(&format!("{:>30} {:>50}\n", headers.0, headers.1));
    out.push_str(&banner);
    out.push('\n');

    for (label, value) in rows {
        out.push_str(&format!(
            "{:<label_width$}{:>value_width$}\n",
            label,
            format!("{:.2}", value.abs()),
            label_width = REPORT_LABEL_WIDTH,
            value_width = REPORT_VALUE_WIDTH,
        ));
    }

    out.push_str(&banner);
    out.push('\n');
    out
}
