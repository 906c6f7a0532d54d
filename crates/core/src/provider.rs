//! Seam to the external diagnostic capability.
//!
//! The classification that produces "Benign"/"Malignant" and the associated
//! image-analysis fields is not implemented here; it is an external system
//! that this front end only displays. [`DiagnosisProvider`] is the boundary:
//! given a patient identifier, supply the current [`DiagnosticReport`]
//! snapshot for it.

use crate::error::BcdResult;
use crate::report::DiagnosticReport;
use bcd_types::PatientId;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

/// Source of diagnostic report snapshots.
pub trait DiagnosisProvider: Send + Sync {
    /// Returns a fresh report snapshot for the patient.
    ///
    /// # Errors
    ///
    /// Implementations may fail if the upstream capability is unreachable;
    /// the built-in providers never do.
    fn report_for(&self, patient_id: &PatientId) -> BcdResult<DiagnosticReport>;
}

/// Provider used before any diagnostic capability is wired in.
///
/// Always returns an all-unset report, which the results view shows as
/// pending. This mirrors the front end's behaviour when results have not
/// yet been produced.
#[derive(Debug, Default, Clone)]
pub struct PendingProvider;

impl DiagnosisProvider for PendingProvider {
    fn report_for(&self, patient_id: &PatientId) -> BcdResult<DiagnosticReport> {
        Ok(DiagnosticReport::pending(patient_id.clone(), Utc::now()))
    }
}

/// In-memory provider, for tests and local demonstration wiring.
///
/// Patients without a stored report fall back to a pending snapshot, the
/// same way the live front end renders before results arrive.
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    reports: RwLock<HashMap<PatientId, DiagnosticReport>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores (or replaces) the report snapshot for its patient.
    pub fn insert(&self, report: DiagnosticReport) {
        let mut reports = self.reports.write().expect("report map poisoned");
        reports.insert(report.patient_id.clone(), report);
    }
}

impl DiagnosisProvider for InMemoryProvider {
    fn report_for(&self, patient_id: &PatientId) -> BcdResult<DiagnosticReport> {
        let reports = self.reports.read().expect("report map poisoned");
        match reports.get(patient_id) {
            Some(report) => Ok(report.clone()),
            None => Ok(DiagnosticReport::pending(patient_id.clone(), Utc::now())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Diagnosis;

    #[test]
    fn pending_provider_returns_unset_report() {
        let id = PatientId::new("P1").unwrap();
        let report = PendingProvider.report_for(&id).unwrap();
        assert_eq!(report.patient_id, id);
        assert_eq!(report.text.diagnosis, Diagnosis::Unset);
    }

    #[test]
    fn in_memory_provider_returns_stored_report() {
        let id = PatientId::new("P1").unwrap();
        let provider = InMemoryProvider::new();

        let mut stored = DiagnosticReport::pending(id.clone(), Utc::now());
        stored.text.diagnosis = Diagnosis::Benign;
        provider.insert(stored.clone());

        assert_eq!(provider.report_for(&id).unwrap(), stored);

        let other = PatientId::new("P2").unwrap();
        let fallback = provider.report_for(&other).unwrap();
        assert_eq!(fallback.text.diagnosis, Diagnosis::Unset);
    }
}
