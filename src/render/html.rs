use crate::aggregate::ReportTable;
use crate::error::{ReportError, Result};
use crate::source::binary_on_path;
use std::path::Path;
use std::process::Command;

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Styled landscape-Letter HTML document for the rich backend.
pub fn build_report_html(table: &ReportTable, narrative: &str) -> String {
    let head_cells: String = ReportTable::headers()
        .iter()
        .map(|cell| format!("<th>{}</th>", escape_html(cell)))
        .collect();

    let body_rows: String = table
        .to_rows()
        .iter()
        .map(|row| {
            let css_class = if row.first().is_some_and(|cell| cell == "Total") {
                "total-row"
            } else {
                ""
            };
            let cells: String = row
                .iter()
                .map(|cell| format!("<td>{}</td>", escape_html(cell)))
                .collect();
            format!("<tr class='{css_class}'>{cells}</tr>")
        })
        .collect();

    let narrative_html: String = narrative
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                "<p class='spacer'></p>".to_string()
            } else {
                format!("<p>{}</p>", escape_html(line))
            }
        })
        .collect();

    format!(
        r#"<!doctype html>
<html>
<head>
  <meta charset='utf-8'>
  <style>
    @page {{
      size: Letter landscape;
      margin: 0.4in;
    }}
    body {{
      font-family: Arial, Helvetica, sans-serif;
      color: #1f2937;
      font-size: 10px;
    }}
    h1 {{
      margin: 0 0 2px 0;
      font-size: 20px;
      color: #0f3d69;
    }}
    .subtitle {{
      margin: 0 0 12px 0;
      color: #4b5563;
      font-size: 11px;
    }}
    table {{
      width: 100%;
      border-collapse: collapse;
      table-layout: fixed;
      margin-bottom: 14px;
      font-size: 9px;
    }}
    th, td {{
      border: 1px solid #cbd5e1;
      padding: 4px;
      text-align: right;
      white-space: nowrap;
      overflow: hidden;
      text-overflow: ellipsis;
    }}
    th:first-child, td:first-child {{
      text-align: left;
      width: 160px;
    }}
    th {{
      background: #e2e8f0;
      color: #0f172a;
      font-weight: 700;
    }}
    tr:nth-child(even) td {{
      background: #f8fafc;
    }}
    tr.total-row td {{
      font-weight: 700;
      background: #e5f0ff !important;
    }}
    h2 {{
      font-size: 14px;
      color: #0f3d69;
      margin: 12px 0 6px 0;
      page-break-after: avoid;
    }}
    p {{
      margin: 0 0 6px 0;
      line-height: 1.35;
      white-space: pre-wrap;
    }}
    .spacer {{
      margin: 0 0 8px 0;
    }}
  </style>
</head>
<body>
  <h1>EDGAR Agents S-1/F-1 Monthly Filing Report ({year})</h1>
  <p class='subtitle'>12-month landscape table includes Jan-Dec, with row and column totals.</p>

  <table>
    <thead><tr>{head_cells}</tr></thead>
    <tbody>
      {body_rows}
    </tbody>
  </table>

  <h2>Executive Analysis</h2>
  {narrative_html}
</body>
</html>"#,
        year = table.year,
    )
}

fn engine_error(details: impl Into<String>) -> ReportError {
    ReportError::RenderEngineUnavailable {
        engine: "weasyprint".to_string(),
        details: details.into(),
    }
}

/// Renders via the WeasyPrint CLI. The PDF lands in a temp file next to the
/// destination and is persisted only on success, so a failed run leaves no
/// partial output behind.
pub(crate) fn render_weasyprint(
    table: &ReportTable,
    narrative: &str,
    output_path: &Path,
) -> Result<()> {
    if !binary_on_path("weasyprint") {
        return Err(engine_error("`weasyprint` not found in PATH"));
    }

    let html = build_report_html(table, narrative);
    let html_file = tempfile::Builder::new().suffix(".html").tempfile()?;
    std::fs::write(html_file.path(), html)?;

    let out_dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let pdf_file = tempfile::Builder::new().suffix(".pdf").tempfile_in(out_dir)?;

    let output = Command::new("weasyprint")
        .arg(html_file.path())
        .arg(pdf_file.path())
        .output()
        .map_err(|err| engine_error(err.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(engine_error(stderr.trim().to_string()));
    }

    pdf_file
        .persist(output_path)
        .map_err(|err| ReportError::IoError(err.error))?;
    Ok(())
}
