//! Constants used throughout the BCD core crate.
//!
//! This module collects the fixed user-facing strings and defaults so they
//! stay consistent between the renderer, the resolver, and the HTTP layer.

/// Title line of the rendered report document.
pub const REPORT_TITLE: &str = "Breast Cancer Detection Report";

/// Fixed tagline printed in the report footer.
pub const REPORT_TAGLINE: &str = "Early Detection Saves Lives";

/// Default organisation name used in the report copyright line.
pub const DEFAULT_SYSTEM_NAME: &str = "Breast Cancer Detection System";

/// Fixed user-facing message shown when an intake submission cannot be
/// classified into any analysis mode.
pub const INTAKE_VALIDATION_MESSAGE: &str = "Please enter at least a Patient ID for text-based analysis or both Patient ID and image for image-based analysis.";

/// Destination the client is asked to navigate to after a successful intake.
pub const RESULTS_DESTINATION: &str = "/results";

/// Default listen address for the REST server.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";
