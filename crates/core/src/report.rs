//! Diagnostic report data model.
//!
//! These types are the contract between the external diagnostic capability
//! and the rendering side of the system. They carry no behaviour beyond
//! construction helpers: the classification that populates them is out of
//! this crate's hands, and the renderer only reads them.

use bcd_types::PatientId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pathology outcome reported by the diagnostic capability.
///
/// `Unset` represents "no result yet" and renders as empty text, matching
/// the wire form where an absent diagnosis is the empty string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnosis {
    Benign,
    Malignant,
    #[default]
    #[serde(rename = "")]
    Unset,
}

impl Diagnosis {
    /// Returns the display form; `Unset` displays as empty text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Diagnosis::Benign => "Benign",
            Diagnosis::Malignant => "Malignant",
            Diagnosis::Unset => "",
        }
    }
}

/// Which breast a mammogram finding relates to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreastSide {
    Left,
    Right,
    #[default]
    #[serde(rename = "")]
    Unset,
}

impl BreastSide {
    /// Returns the display form; `Unset` displays as empty text.
    pub fn as_str(&self) -> &'static str {
        match self {
            BreastSide::Left => "Left",
            BreastSide::Right => "Right",
            BreastSide::Unset => "",
        }
    }
}

/// Result of the text-based (tumour data) analysis path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextAnalysisResult {
    pub diagnosis: Diagnosis,
    /// Free-text summary supplied by the diagnostic capability.
    pub description: String,
}

/// Result of the image-based (mammogram) analysis path.
///
/// All text fields are free-form and supplied by the diagnostic capability;
/// this crate displays them without interpreting their content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAnalysisResult {
    pub diagnosis: Diagnosis,
    pub breast_side: BreastSide,
    pub breast_density: String,
    pub image_view: String,
    pub abnormality_id: String,
    pub abnormality_type: String,
    pub calcification_type: String,
    pub calcification_distribution: String,
    pub assessment: String,
    pub subtlety: String,
    pub description: String,
    /// Optional URL of the analysed image. Not rendered into the printed
    /// report document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<String>,
}

/// An immutable snapshot of a patient's diagnostic results.
///
/// Created fresh for each results view or print action and never mutated
/// afterwards. The copyright year in the rendered footer is taken from
/// `generated_at`, which keeps rendering a pure function of this value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub patient_id: PatientId,
    pub text: TextAnalysisResult,
    pub image: ImageAnalysisResult,
    pub generated_at: DateTime<Utc>,
}

impl DiagnosticReport {
    /// Builds a report with every result field unset.
    ///
    /// This is what the results view shows before the diagnostic capability
    /// has produced anything for the patient.
    pub fn pending(patient_id: PatientId, generated_at: DateTime<Utc>) -> Self {
        Self {
            patient_id,
            text: TextAnalysisResult::default(),
            image: ImageAnalysisResult::default(),
            generated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_diagnosis_serialises_as_empty_string() {
        let json = serde_json::to_string(&Diagnosis::Unset).unwrap();
        assert_eq!(json, "\"\"");
        let back: Diagnosis = serde_json::from_str("\"\"").unwrap();
        assert_eq!(back, Diagnosis::Unset);
    }

    #[test]
    fn diagnosis_round_trips_named_variants() {
        let json = serde_json::to_string(&Diagnosis::Malignant).unwrap();
        assert_eq!(json, "\"Malignant\"");
        let back: BreastSide = serde_json::from_str("\"Left\"").unwrap();
        assert_eq!(back, BreastSide::Left);
    }

    #[test]
    fn pending_report_has_no_results() {
        let report = DiagnosticReport::pending(
            PatientId::new("P1").unwrap(),
            Utc::now(),
        );
        assert_eq!(report.text.diagnosis, Diagnosis::Unset);
        assert_eq!(report.image.diagnosis, Diagnosis::Unset);
        assert_eq!(report.image.breast_side, BreastSide::Unset);
        assert!(report.image.assessment.is_empty());
        assert!(report.image.image_reference.is_none());
    }

    #[test]
    fn report_json_round_trip() {
        let mut report = DiagnosticReport::pending(
            PatientId::new("P1").unwrap(),
            "2026-08-27T12:00:00Z".parse().unwrap(),
        );
        report.text.diagnosis = Diagnosis::Benign;
        report.image.breast_side = BreastSide::Right;
        report.image.subtlety = "3".into();
        let json = serde_json::to_string(&report).unwrap();
        let back: DiagnosticReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
