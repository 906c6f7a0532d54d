//! Intake classification for diagnostic submissions.
//!
//! The intake surface presents two parallel forms: a text path (patient ID
//! only) and an image path (patient ID plus mammogram upload). Both feed a
//! single decision function, [`resolve_intake`], which classifies the pair
//! of form states into exactly one [`AnalysisMode`] or rejects the
//! submission with a fixed user-facing message.
//!
//! The decision table is evaluated in a strict priority order, and that
//! order is load-bearing: a submission with both patient IDs filled but no
//! image file resolves to `Text` with the image-path ID silently ignored.
//! That behaviour is pinned by tests; do not reorder the arms.

use crate::constants::INTAKE_VALIDATION_MESSAGE;
use crate::error::{BcdError, BcdResult};
use bcd_types::{NonEmptyText, PatientId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Media types accepted by the mammogram upload picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMediaType {
    Jpeg,
    Png,
    Dicom,
}

impl ImageMediaType {
    /// Classifies a declared MIME type into an accepted media type.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageMediaType::Jpeg),
            "image/png" => Some(ImageMediaType::Png),
            "image/dicom" | "application/dicom" => Some(ImageMediaType::Dicom),
            _ => None,
        }
    }

    /// Best-effort content sniffing, used only when no MIME type was
    /// declared. Detection is not authoritative; file contents are otherwise
    /// not validated.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        let kind = infer::get(bytes)?;
        Self::from_mime(kind.mime_type())
    }

    /// Resolves the media type of an upload from its declared MIME type,
    /// falling back to content sniffing when none was declared.
    ///
    /// # Errors
    ///
    /// Returns `BcdError::UnsupportedMediaType` if the declared type is not
    /// one of the advertised types, or if nothing was declared and sniffing
    /// fails.
    pub fn resolve(declared: Option<&str>, bytes: &[u8]) -> BcdResult<Self> {
        match declared {
            Some(mime) => Self::from_mime(mime)
                .ok_or_else(|| BcdError::UnsupportedMediaType(mime.to_owned())),
            None => Self::sniff(bytes)
                .ok_or_else(|| BcdError::UnsupportedMediaType("undeclared".to_owned())),
        }
    }
}

/// A mammogram file selected by the user.
///
/// Owned exclusively by the intake form until submission, at which point
/// ownership moves into the [`IntakeSubmission`]. The bytes are never
/// cloned.
#[derive(Debug, PartialEq, Eq)]
pub struct UploadedImage {
    /// Display name of the selected file.
    pub file_name: NonEmptyText,
    /// Accepted media type (declared or sniffed, see [`ImageMediaType::resolve`]).
    pub media_type: ImageMediaType,
    /// Raw file content. Not validated beyond the media type.
    pub bytes: Vec<u8>,
}

/// Which analysis path(s) a submission represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    Text,
    Image,
    Both,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Text => "text",
            AnalysisMode::Image => "image",
            AnalysisMode::Both => "both",
        }
    }
}

/// The raw state of the two intake forms at submission time.
///
/// Patient IDs are carried as plain strings here because emptiness is part
/// of the decision input; they are promoted to [`PatientId`] only once a
/// mode has been chosen.
#[derive(Debug, Default)]
pub struct IntakeForm {
    /// Patient ID entered on the text-analysis form.
    pub text_patient_id: String,
    /// Patient ID entered on the image-analysis form.
    pub image_patient_id: String,
    /// Mammogram file selected on the image-analysis form, if any.
    pub image: Option<UploadedImage>,
}

/// A classified, accepted intake submission.
#[derive(Debug)]
pub struct IntakeSubmission {
    pub submission_id: Uuid,
    /// The effective patient identifier. When both paths are filled, the
    /// text-path ID wins.
    pub patient_id: PatientId,
    pub mode: AnalysisMode,
    /// Present if and only if `mode` is `Image` or `Both`.
    pub image: Option<UploadedImage>,
    pub received_at: DateTime<Utc>,
}

/// Classifies a pair of intake form states into exactly one analysis mode.
///
/// The rules are evaluated in priority order; the first match wins:
///
/// 1. text ID + image ID + file → `Both`, effective ID is the text-path ID
/// 2. image ID + file, no text ID → `Image`
/// 3. text ID, and either no image ID or no file → `Text` (an image-path ID
///    without a file is silently ignored)
/// 4. otherwise → rejected with the fixed validation message
///
/// Emptiness is judged after trimming: a whitespace-only ID counts as
/// absent.
///
/// # Errors
///
/// Returns `BcdError::Validation` when no rule matches (rule 4).
pub fn resolve_intake(form: IntakeForm) -> BcdResult<IntakeSubmission> {
    let text_id = PatientId::new(&form.text_patient_id).ok();
    let image_id = PatientId::new(&form.image_patient_id).ok();

    let (patient_id, mode, image) = match (text_id, image_id, form.image) {
        (Some(text_id), Some(_), Some(image)) => (text_id, AnalysisMode::Both, Some(image)),
        (None, Some(image_id), Some(image)) => (image_id, AnalysisMode::Image, Some(image)),
        (Some(text_id), image_id, _) => {
            if image_id.is_some() {
                tracing::debug!(
                    "image-path patient ID ignored: no image file accompanied it"
                );
            }
            (text_id, AnalysisMode::Text, None)
        }
        _ => return Err(BcdError::Validation(INTAKE_VALIDATION_MESSAGE.to_owned())),
    };

    Ok(IntakeSubmission {
        submission_id: Uuid::new_v4(),
        patient_id,
        mode,
        image,
        received_at: Utc::now(),
    })
}
