//! HTML summary report builder.
//!
//! Produces the pre-built HTML document that an external PDF-rendering
//! engine turns into a styled summary PDF. This module only constructs the
//! markup — a [`crate::output::DisplayBundle`] is the sole input, and the
//! rendering engine is someone else's problem.

use crate::output::DisplayBundle;
use crate::pipeline::transform::display_value;
use std::fmt::Write;

const REPORT_CSS: &str = r#"
body { font-family: 'Roboto', sans-serif; margin: 40px; color: #333; line-height: 1.6; }
.header { text-align: center; margin-bottom: 30px; padding-bottom: 10px; border-bottom: 2px solid #eee; }
.header h1 { color: #2c3e50; font-size: 28px; margin: 0; }
h2 { color: #34495e; font-size: 22px; border-bottom: 1px solid #ddd; padding-bottom: 5px; margin-top: 30px; margin-bottom: 15px; }
table { width: 100%; border-collapse: collapse; margin-bottom: 20px; }
th, td { border: 1px solid #ddd; padding: 10px; text-align: left; }
th { background-color: #f2f2f2; color: #555; font-weight: bold; }
tr:nth-child(even) { background-color: #f9f9f9; }
.summary-section p { background-color: #f9f9f9; border-left: 5px solid #3498db; padding: 15px; margin-bottom: 20px; }
.footer { text-align: center; margin-top: 50px; padding-top: 10px; border-top: 1px solid #eee; font-size: 12px; color: #777; }
"#;

/// Escape text for safe embedding in HTML element content.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Title-case a category name for the report heading.
fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Build the HTML summary document for one analysed document.
///
/// Sections, in order: title header, key-information table (main fields,
/// display-normalised), itemized-details table (only when rows exist),
/// summary block (only when a summary was chosen), footer.
pub fn build_report(bundle: &DisplayBundle, doc_type: &str) -> String {
    let title = format!("{} Analysis Summary", title_case(doc_type));
    let mut html = String::with_capacity(4096);

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n",
        escape(&title),
        REPORT_CSS
    );
    let _ = write!(html, "<div class=\"header\"><h1>{}</h1></div>\n", escape(&title));

    // ── Key information ──────────────────────────────────────────────────
    html.push_str("<h2>Key Information</h2>\n<table>\n<tr><th>Field</th><th>Value</th></tr>\n");
    for (key, value) in &bundle.main_fields {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td></tr>\n",
            escape(&humanise_key(key)),
            escape(&display_value(value))
        );
    }
    html.push_str("</table>\n");

    // ── Itemized details ─────────────────────────────────────────────────
    if !bundle.item_rows.is_empty() {
        let columns = item_columns(bundle);
        html.push_str("<h2>Itemized Details</h2>\n<table class=\"item-table\">\n<tr>");
        for column in &columns {
            let _ = write!(html, "<th>{}</th>", escape(&humanise_key(column)));
        }
        html.push_str("</tr>\n");
        for row in &bundle.item_rows {
            html.push_str("<tr>");
            for column in &columns {
                let cell = row.get(column).map(display_value).unwrap_or_default();
                let _ = write!(html, "<td>{}</td>", escape(&cell));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</table>\n");
    }

    // ── Summary ──────────────────────────────────────────────────────────
    if !bundle.summary_text.is_empty() {
        let _ = write!(
            html,
            "<div class=\"summary-section\">\n<h2>Summary</h2>\n<p>{}</p>\n</div>\n",
            escape(&bundle.summary_text)
        );
    }

    html.push_str("<div class=\"footer\">Generated by docglean</div>\n</body>\n</html>\n");
    html
}

/// Column set for the item table: the union of row keys, in the rows'
/// (sorted) key order.
fn item_columns(bundle: &DisplayBundle) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in &bundle.item_rows {
        for key in row.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

/// "invoice_number" → "Invoice Number" for table headers.
fn humanise_key(key: &str) -> String {
    key.split('_')
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::transform::transform;

    fn bundle_from(json: &str) -> DisplayBundle {
        transform(&serde_json::from_str(json).unwrap())
    }

    #[test]
    fn report_contains_title_fields_items_and_summary() {
        let bundle = bundle_from(
            r#"{
                "invoice_number": "INV-1",
                "items": [{"description": "Widget", "quantity": 2}],
                "summary": "Two widgets from Acme."
            }"#,
        );
        let html = build_report(&bundle, "invoice");

        assert!(html.contains("Invoice Analysis Summary"));
        assert!(html.contains("Invoice Number"));
        assert!(html.contains("INV-1"));
        assert!(html.contains("Itemized Details"));
        assert!(html.contains("Widget"));
        assert!(html.contains("Two widgets from Acme."));
    }

    #[test]
    fn item_table_is_omitted_without_rows() {
        let bundle = bundle_from(r#"{"a": "1"}"#);
        let html = build_report(&bundle, "general");
        assert!(!html.contains("Itemized Details"));
        assert!(!html.contains("Summary</h2>"));
    }

    #[test]
    fn field_values_are_escaped() {
        let bundle = bundle_from(r#"{"vendor_name": "<script>alert(1)</script>"}"#);
        let html = build_report(&bundle, "invoice");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn missing_item_cells_render_empty() {
        let bundle = bundle_from(r#"{"items": [{"a": "1"}, {"b": "2"}]}"#);
        let html = build_report(&bundle, "invoice");
        // both columns appear; each row fills only its own
        assert!(html.contains("<th>A</th>"));
        assert!(html.contains("<th>B</th>"));
        assert!(html.contains("<td></td>"));
    }
}
