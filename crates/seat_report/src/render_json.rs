//! render_json.rs
//! Report JSON renderer. Key order follows the model's field order
//! (cover → totals → rows → panels → warnings → integrity).

use crate::{ReportError, ReportModel};

/// Pretty-printed JSON with a trailing newline.
pub fn render_json(model: &ReportModel) -> Result<String, ReportError> {
    let mut s = serde_json::to_string_pretty(model)?;
    s.push('\n');
    Ok(s)
}
