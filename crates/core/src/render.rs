//! Report document rendering.
//!
//! Turns a [`DiagnosticReport`] into a complete, self-contained HTML page
//! (structure plus inline styling) suitable for on-screen preview and for
//! physical printing. Two variants exist:
//!
//! - the **preview** document embeds a visible "Print Report" button so the
//!   user can trigger printing manually;
//! - the **print** document is identical except the button is omitted; the
//!   caller invokes the print action itself once the surface has loaded
//!   (see [`crate::print`]).
//!
//! Rendering is deterministic: identical reports produce byte-identical
//! documents. Every embedded value is HTML-escaped before insertion, so
//! upstream data containing markup-significant characters cannot alter the
//! document structure. Absent values render as empty text against their
//! label rather than omitting the line.

use crate::constants::{REPORT_TAGLINE, REPORT_TITLE};
use crate::report::DiagnosticReport;
use chrono::Datelike;

/// Labels of the image-analysis section, in the fixed order they appear in
/// the rendered document.
pub const IMAGE_ANALYSIS_LABELS: [&str; 11] = [
    "Diagnosis",
    "Left or Right Breast",
    "Breast Density",
    "Image View",
    "Abnormality ID",
    "Abnormality Type",
    "Calcification Type",
    "Calcification Distribution",
    "Assessment",
    "Subtlety",
    "Description",
];

/// Inline stylesheet embedded in every report document.
///
/// The `@media print` block suppresses interactive controls when the
/// document is physically printed, so a previewed document prints cleanly
/// even with the button present.
const REPORT_STYLE: &str = "\
body {
  font-family: Arial, sans-serif;
  line-height: 1.6;
  color: #333;
  max-width: 800px;
  margin: 0 auto;
  padding: 20px;
}
h1, h2 {
  color: #d53f8c;
  margin-bottom: 16px;
}
.header {
  text-align: center;
  margin-bottom: 30px;
  border-bottom: 2px solid #d53f8c;
  padding-bottom: 10px;
}
.section {
  margin-bottom: 20px;
  padding: 15px;
  border: 1px solid #eee;
  border-radius: 5px;
}
.section-title {
  font-weight: bold;
  margin-bottom: 10px;
  color: #d53f8c;
}
.field {
  margin-bottom: 8px;
}
.field-label {
  font-weight: bold;
  display: inline-block;
  width: 200px;
}
.field-value {
  display: inline-block;
}
.footer {
  margin-top: 30px;
  text-align: center;
  font-size: 12px;
  color: #666;
}
@media print {
  body {
    padding: 0;
    margin: 0;
  }
  button {
    display: none;
  }
}
";

/// Manual print trigger embedded only in the preview variant.
const PRINT_TRIGGER: &str = "\
<div style=\"text-align: center; margin-top: 20px;\">
  <button onclick=\"window.print()\" style=\"padding: 10px 20px; background-color: #d53f8c; color: white; border: none; border-radius: 4px; cursor: pointer;\">
    Print Report
  </button>
</div>
";

/// Escapes the five HTML-significant characters in a field value.
///
/// Report fields originate from the external diagnostic capability and,
/// indirectly, from user-entered patient identifiers; none of them may be
/// allowed to carry markup into the document.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renderer for printable patient report documents.
///
/// Holds the organisation name stamped into the copyright line; everything
/// else comes from the report being rendered.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    system_name: String,
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_SYSTEM_NAME)
    }
}

impl ReportRenderer {
    /// Creates a renderer stamping `system_name` into the report footer.
    pub fn new(system_name: impl Into<String>) -> Self {
        Self {
            system_name: system_name.into(),
        }
    }

    /// Renders the preview document: the full report page with the manual
    /// print trigger embedded.
    pub fn preview_document(&self, report: &DiagnosticReport) -> String {
        self.document(report, true)
    }

    /// Renders the print document: identical to the preview document except
    /// the manual print trigger is omitted. The caller is expected to invoke
    /// the print action once the presentation surface has loaded it.
    pub fn print_document(&self, report: &DiagnosticReport) -> String {
        self.document(report, false)
    }

    fn document(&self, report: &DiagnosticReport, with_print_trigger: bool) -> String {
        let mut body = String::new();

        body.push_str("<div class=\"header\">\n");
        body.push_str(&format!("  <h1>{}</h1>\n", REPORT_TITLE));
        body.push_str(&format!(
            "  <h2>Patient Report for ID: {}</h2>\n",
            escape_html(report.patient_id.as_str())
        ));
        body.push_str("</div>\n");

        push_section(&mut body, "Patient Information", |fields| {
            push_field(fields, "Patient ID", report.patient_id.as_str());
        });

        push_section(&mut body, "Text-Based Analysis", |fields| {
            push_field(fields, "Diagnosis", report.text.diagnosis.as_str());
            push_field(fields, "Description", &report.text.description);
        });

        push_section(&mut body, "Image-Based Analysis", |fields| {
            let image = &report.image;
            push_field(fields, "Diagnosis", image.diagnosis.as_str());
            push_field(fields, "Left or Right Breast", image.breast_side.as_str());
            push_field(fields, "Breast Density", &image.breast_density);
            push_field(fields, "Image View", &image.image_view);
            push_field(fields, "Abnormality ID", &image.abnormality_id);
            push_field(fields, "Abnormality Type", &image.abnormality_type);
            push_field(fields, "Calcification Type", &image.calcification_type);
            push_field(
                fields,
                "Calcification Distribution",
                &image.calcification_distribution,
            );
            push_field(fields, "Assessment", &image.assessment);
            push_field(fields, "Subtlety", &image.subtlety);
            push_field(fields, "Description", &image.description);
        });

        body.push_str("<div class=\"footer\">\n");
        body.push_str(&format!("  <p>{}</p>\n", REPORT_TAGLINE));
        body.push_str(&format!(
            "  <p>&copy; {} {}</p>\n",
            report.generated_at.year(),
            escape_html(&self.system_name)
        ));
        body.push_str("</div>\n");

        if with_print_trigger {
            body.push_str(PRINT_TRIGGER);
        }

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<title>Patient Report</title>\n<style>\n{REPORT_STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n"
        )
    }
}

fn push_section(out: &mut String, title: &str, fill: impl FnOnce(&mut String)) {
    out.push_str("<div class=\"section\">\n");
    out.push_str(&format!("  <div class=\"section-title\">{title}</div>\n"));
    fill(out);
    out.push_str("</div>\n");
}

fn push_field(out: &mut String, label: &str, value: &str) {
    out.push_str("  <div class=\"field\">\n");
    out.push_str(&format!(
        "    <span class=\"field-label\">{label}:</span>\n"
    ));
    out.push_str(&format!(
        "    <span class=\"field-value\">{}</span>\n",
        escape_html(value)
    ));
    out.push_str("  </div>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{BreastSide, Diagnosis, DiagnosticReport};
    use bcd_types::PatientId;
    use chrono::{TimeZone, Utc};

    fn report_with_all_image_fields(value: &str) -> DiagnosticReport {
        let mut report = DiagnosticReport::pending(
            PatientId::new("X1").unwrap(),
            Utc.with_ymd_and_hms(2026, 8, 27, 12, 0, 0).unwrap(),
        );
        report.text.diagnosis = Diagnosis::Malignant;
        report.text.description = "d1".into();
        let image = &mut report.image;
        image.diagnosis = Diagnosis::Benign;
        image.breast_side = BreastSide::Left;
        image.breast_density = value.into();
        image.image_view = value.into();
        image.abnormality_id = value.into();
        image.abnormality_type = value.into();
        image.calcification_type = value.into();
        image.calcification_distribution = value.into();
        image.assessment = value.into();
        image.subtlety = value.into();
        image.description = value.into();
        report
    }

    fn unescape(value: &str) -> String {
        value
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&")
    }

    /// Extracts every `label: value` pair from a rendered document, in
    /// document order, undoing the renderer's escaping.
    fn extract_fields(document: &str) -> Vec<(String, String)> {
        let mut fields = Vec::new();
        let mut rest = document;
        while let Some(start) = rest.find("<span class=\"field-label\">") {
            rest = &rest[start + "<span class=\"field-label\">".len()..];
            let label_end = rest.find(":</span>").expect("label terminator");
            let label = rest[..label_end].to_owned();
            let value_start = rest.find("<span class=\"field-value\">").expect("value span")
                + "<span class=\"field-value\">".len();
            rest = &rest[value_start..];
            let value_end = rest.find("</span>").expect("value terminator");
            fields.push((label, unescape(rest[..value_end].trim())));
            rest = &rest[value_end..];
        }
        fields
    }

    #[test]
    fn rendered_values_round_trip() {
        let report = report_with_all_image_fields("v");
        let document = ReportRenderer::default().preview_document(&report);
        let fields = extract_fields(&document);

        assert_eq!(fields[0], ("Patient ID".to_owned(), "X1".to_owned()));
        assert_eq!(fields[1], ("Diagnosis".to_owned(), "Malignant".to_owned()));
        assert_eq!(fields[2], ("Description".to_owned(), "d1".to_owned()));
        assert_eq!(fields[3], ("Diagnosis".to_owned(), "Benign".to_owned()));
        assert_eq!(
            fields[4],
            ("Left or Right Breast".to_owned(), "Left".to_owned())
        );
        for (label, value) in &fields[5..] {
            assert!(IMAGE_ANALYSIS_LABELS.contains(&label.as_str()));
            assert_eq!(value, "v");
        }
    }

    #[test]
    fn image_section_labels_appear_once_in_fixed_order() {
        let report = report_with_all_image_fields("");
        let document = ReportRenderer::default().print_document(&report);
        let fields = extract_fields(&document);

        // Patient Information (1) + Text-Based Analysis (2) precede the
        // image section; the image section contributes exactly eleven
        // labelled lines even when every value is empty.
        let image_labels: Vec<&str> = fields[3..].iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(image_labels, IMAGE_ANALYSIS_LABELS);
        assert_eq!(fields.len(), 3 + IMAGE_ANALYSIS_LABELS.len());
    }

    #[test]
    fn preview_and_print_differ_only_by_the_print_trigger() {
        let report = report_with_all_image_fields("v");
        let renderer = ReportRenderer::default();
        let preview = renderer.preview_document(&report);
        let print = renderer.print_document(&report);

        assert!(preview.contains("window.print()"));
        assert!(!print.contains("window.print()"));
        assert_eq!(preview.replace(PRINT_TRIGGER, ""), print);
    }

    #[test]
    fn rendering_is_deterministic() {
        let report = report_with_all_image_fields("v");
        let renderer = ReportRenderer::default();
        assert_eq!(
            renderer.preview_document(&report),
            renderer.preview_document(&report)
        );
    }

    #[test]
    fn markup_in_field_values_is_escaped() {
        let mut report = report_with_all_image_fields("v");
        report.text.description = "<script>alert('x')</script> & \"quotes\"".into();
        let document = ReportRenderer::default().print_document(&report);

        assert!(!document.contains("<script>"));
        assert!(document.contains("&lt;script&gt;"));

        // Escaping is reversible, so extraction still round-trips.
        let fields = extract_fields(&document);
        assert_eq!(
            fields[2].1,
            "<script>alert('x')</script> & \"quotes\""
        );
    }

    #[test]
    fn footer_carries_tagline_and_copyright_year() {
        let report = report_with_all_image_fields("v");
        let document = ReportRenderer::default().preview_document(&report);
        assert!(document.contains("Early Detection Saves Lives"));
        assert!(document.contains("&copy; 2026 Breast Cancer Detection System"));
    }

    #[test]
    fn print_stylesheet_suppresses_buttons() {
        let report = report_with_all_image_fields("v");
        let document = ReportRenderer::default().preview_document(&report);
        let media_print = document
            .find("@media print")
            .map(|i| &document[i..])
            .expect("print stylesheet present");
        assert!(media_print.contains("display: none"));
    }
}
