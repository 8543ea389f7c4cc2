//! HTML report generation with the embedded D3 viewer

use super::ReportData;
use std::io::{self, Write};

const VIEWER_HTML: &str = include_str!("../viewer.html");
const DATA_PLACEHOLDER: &str = "/*__METHANETREE_DATA__*/null";

/// Viewer page with `data` embedded
pub fn render(data: &ReportData) -> serde_json::Result<String> {
    let json = serde_json::to_string(data)?;
    // keep the payload from closing the script element
    let json = json.replace("</", "<\\/");
    let footer = format!(
        "<footer style=\"color:#86868b;margin-top:2rem\">Generated {}</footer>\n</body>",
        data.generated_at
    );
    Ok(VIEWER_HTML
        .replacen(DATA_PLACEHOLDER, &json, 1)
        .replacen("</body>", &footer, 1))
}

pub fn write<W: Write>(writer: &mut W, data: &ReportData) -> io::Result<()> {
    let page = render(data)?;
    writer.write_all(page.as_bytes())
}
