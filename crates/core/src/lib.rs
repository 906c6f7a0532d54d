//! # BCD Core
//!
//! Core domain logic for the BCD (Breast Cancer Detection) front end.
//!
//! This crate contains the pure pieces of the diagnosis intake → results
//! report pipeline:
//! - intake classification: which analysis mode a submission represents
//! - the diagnostic report data model
//! - deterministic rendering of the printable report document
//! - the print-path state machine (surface open → write → load → print)
//! - the seam to the external diagnostic capability
//!
//! **No API concerns**: HTTP endpoints, multipart parsing, and OpenAPI
//! documentation belong in `api-rest`.

pub mod config;
pub mod constants;
pub mod error;
pub mod intake;
pub mod print;
pub mod provider;
pub mod render;
pub mod report;

pub use bcd_types::{NonEmptyText, PatientId};
pub use config::CoreConfig;
pub use error::{BcdError, BcdResult};
pub use intake::{
    resolve_intake, AnalysisMode, ImageMediaType, IntakeForm, IntakeSubmission, UploadedImage,
};
pub use print::{present_preview, PresentationSurface, PrintJob, PrintState, SurfaceProvider};
pub use provider::{DiagnosisProvider, InMemoryProvider, PendingProvider};
pub use render::{escape_html, ReportRenderer, IMAGE_ANALYSIS_LABELS};
pub use report::{BreastSide, Diagnosis, DiagnosticReport, ImageAnalysisResult, TextAnalysisResult};
