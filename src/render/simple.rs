//! Built-in PDF writer used when WeasyPrint is unavailable.
//!
//! Emits a minimal PDF 1.4 document: one Helvetica font object, one
//! uncompressed content stream per page, an xref table, and nothing else.
//! Landscape Letter, paginated table and narrative sections.

use crate::aggregate::ReportTable;
use crate::error::{ReportError, Result};
use std::path::Path;

const PAGE_WIDTH: i64 = 792;
const PAGE_HEIGHT: i64 = 612;
const TABLE_BOTTOM_LIMIT: i64 = 40;
const NARRATIVE_BOTTOM_LIMIT: i64 = 30;
const NARRATIVE_WRAP_WIDTH: usize = 130;

#[derive(Default)]
struct ObjectWriter {
    objects: Vec<Vec<u8>>,
}

impl ObjectWriter {
    /// Adds an object body, returning its 1-based object number.
    fn add(&mut self, data: Vec<u8>) -> usize {
        self.objects.push(data);
        self.objects.len()
    }

    fn build(&self, root_obj: usize) -> Vec<u8> {
        let mut out = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(self.objects.len());
        for (index, obj) in self.objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n", index + 1).as_bytes());
            out.extend_from_slice(obj);
            out.extend_from_slice(b"\nendobj\n");
        }

        let xref_pos = out.len();
        out.extend_from_slice(format!("xref\n0 {}\n", self.objects.len() + 1).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for pos in offsets {
            out.extend_from_slice(format!("{pos:010} 00000 n \n").as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF\n",
                self.objects.len() + 1,
                root_obj,
                xref_pos
            )
            .as_bytes(),
        );
        out
    }
}

#[derive(Default)]
struct PageCanvas {
    lines: Vec<String>,
}

impl PageCanvas {
    fn text(&mut self, x: i64, y: i64, size: u32, content: &str) {
        self.lines.push("BT".to_string());
        self.lines.push(format!("/F1 {size} Tf"));
        self.lines.push(format!("{x} {y} Td"));
        self.lines.push(format!("({}) Tj", escape_text(content)));
        self.lines.push("ET".to_string());
    }

    /// Content stream bytes. The base font only covers Latin-1, so anything
    /// outside that range degrades to `?`.
    fn stream(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (index, line) in self.lines.iter().enumerate() {
            if index > 0 {
                out.push(b'\n');
            }
            for ch in line.chars() {
                let code = ch as u32;
                if code <= 0xFF {
                    out.push(code as u8);
                } else {
                    out.push(b'?');
                }
            }
        }
        out
    }
}

fn escape_text(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)")
}

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn draw_table_header(page: &mut PageCanvas, headers: &[String], x_positions: &[i64], y: i64) -> i64 {
    for (index, cell) in headers.iter().enumerate() {
        page.text(x_positions[index] + 2, y, 8, cell);
    }
    y - 14
}

/// Assembles the whole document in memory.
pub fn build_pdf_bytes(table: &ReportTable, narrative: &str) -> Vec<u8> {
    let headers = ReportTable::headers();
    let rows = table.to_rows();

    // Agent column is wide, month columns narrow, total slightly wider.
    let mut col_widths = vec![150i64];
    col_widths.extend([42i64; 12]);
    col_widths.push(50);
    let mut x_positions = vec![30i64];
    for width in &col_widths[..col_widths.len() - 1] {
        x_positions.push(x_positions.last().unwrap() + width);
    }

    let mut pages: Vec<PageCanvas> = vec![PageCanvas::default()];
    let first = pages.last_mut().unwrap();
    first.text(
        30,
        580,
        18,
        &format!("EDGAR Agents S-1/F-1 Monthly Filing Report ({})", table.year),
    );
    first.text(
        30,
        560,
        11,
        "12-month landscape table includes Jan-Dec, with row and column totals.",
    );
    let mut y = draw_table_header(first, &headers, &x_positions, 535);

    for row in &rows {
        if y < TABLE_BOTTOM_LIMIT {
            pages.push(PageCanvas::default());
            let page = pages.last_mut().unwrap();
            page.text(30, 580, 13, "S-1/F-1 Filing Volume by Agent");
            y = draw_table_header(page, &headers, &x_positions, 560);
        }
        let page = pages.last_mut().unwrap();
        for (index, cell) in row.iter().enumerate() {
            page.text(x_positions[index] + 2, y, 7, cell);
        }
        y -= 12;
    }

    pages.push(PageCanvas::default());
    let narrative_page = pages.last_mut().unwrap();
    narrative_page.text(30, 580, 14, "Executive Analysis");
    let mut y = 560i64;
    for paragraph in narrative.split('\n') {
        for wrapped in wrap_text(paragraph, NARRATIVE_WRAP_WIDTH) {
            if y < NARRATIVE_BOTTOM_LIMIT {
                pages.push(PageCanvas::default());
                let page = pages.last_mut().unwrap();
                page.text(30, 580, 14, "Executive Analysis (continued)");
                y = 560;
            }
            let page = pages.last_mut().unwrap();
            page.text(30, y, 9, &wrapped);
            y -= 11;
        }
    }

    let streams: Vec<Vec<u8>> = pages.iter().map(PageCanvas::stream).collect();

    let mut pdf = ObjectWriter::default();
    let font_obj = pdf.add(b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_vec());

    let content_ids: Vec<usize> = streams
        .iter()
        .map(|stream| {
            let mut obj = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
            obj.extend_from_slice(stream);
            obj.extend_from_slice(b"\nendstream");
            pdf.add(obj)
        })
        .collect();

    // Page objects follow the content streams, then the pages tree itself.
    let pages_obj_id = pdf.objects.len() + content_ids.len() + 1;
    let page_ids: Vec<usize> = content_ids
        .iter()
        .map(|content_id| {
            pdf.add(
                format!(
                    "<< /Type /Page /Parent {pages_obj_id} 0 R \
                     /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                     /Resources << /Font << /F1 {font_obj} 0 R >> >> \
                     /Contents {content_id} 0 R >>"
                )
                .into_bytes(),
            )
        })
        .collect();

    let kids: Vec<String> = page_ids.iter().map(|id| format!("{id} 0 R")).collect();
    let pages_obj = pdf.add(
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            page_ids.len()
        )
        .into_bytes(),
    );
    let catalog_obj = pdf.add(format!("<< /Type /Catalog /Pages {pages_obj} 0 R >>").into_bytes());

    pdf.build(catalog_obj)
}

/// Writes through a temp file in the destination directory so a failed run
/// leaves no partial output behind.
pub(crate) fn render_simple(table: &ReportTable, narrative: &str, output_path: &Path) -> Result<()> {
    let bytes = build_pdf_bytes(table, narrative);
    let out_dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file = tempfile::Builder::new().suffix(".pdf").tempfile_in(out_dir)?;
    std::fs::write(file.path(), &bytes)?;
    file.persist(output_path)
        .map_err(|err| ReportError::IoError(err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AgentRow;

    fn table() -> ReportTable {
        let monthly = [2, 0, 1, 0, 0, 3, 0, 0, 0, 0, 0, 0];
        ReportTable {
            year: 2026,
            agents: vec![AgentRow {
                agent: "Donnelley (Chicago)".to_string(),
                monthly,
                total: 6,
            }],
            month_totals: monthly,
            grand_total: 6,
        }
    }

    #[test]
    fn test_pdf_framing() {
        let bytes = build_pdf_bytes(&table(), "Quiet quarter.");
        assert!(bytes.starts_with(b"%PDF-1.4\n"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Type /Catalog"));
        assert!(text.contains("/BaseFont /Helvetica"));
    }

    #[test]
    fn test_every_cell_value_appears_in_streams() {
        let bytes = build_pdf_bytes(&table(), "Quiet quarter.");
        let text = String::from_utf8_lossy(&bytes);
        for header in ReportTable::headers() {
            assert!(text.contains(&format!("({header}) Tj")), "missing {header}");
        }
        assert!(text.contains("(Donnelley \\(Chicago\\)) Tj"));
        assert!(text.contains("(6) Tj"));
        assert!(text.contains("(Quiet quarter.) Tj"));
    }

    #[test]
    fn test_empty_table_still_renders_full_grid() {
        let empty = ReportTable {
            year: 2023,
            agents: vec![],
            month_totals: [0; 12],
            grand_total: 0,
        };
        let bytes = build_pdf_bytes(&empty, "No activity.");
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("(Jan) Tj"));
        assert!(text.contains("(Dec) Tj"));
        assert!(text.contains("(Total) Tj"));
    }

    #[test]
    fn test_long_tables_paginate() {
        let agents: Vec<AgentRow> = (0..60)
            .map(|index| AgentRow {
                agent: format!("Agent {index:02}"),
                monthly: [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
                total: 1,
            })
            .collect();
        let mut month_totals = [0u64; 12];
        month_totals[0] = 60;
        let big = ReportTable {
            year: 2026,
            agents,
            month_totals,
            grand_total: 60,
        };
        let bytes = build_pdf_bytes(&big, "Busy January.");
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("(S-1/F-1 Filing Volume by Agent) Tj"));
        assert!(text.contains("/Count 3"));
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
        assert_eq!(wrap_text("one two", 10), vec!["one two".to_string()]);
        assert_eq!(
            wrap_text("alpha beta gamma", 10),
            vec!["alpha beta".to_string(), "gamma".to_string()]
        );
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a(b)c\\d"), "a\\(b\\)c\\\\d");
    }
}
