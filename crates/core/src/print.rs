//! Print-path control flow.
//!
//! The print action follows a fixed sequence: open a presentation surface,
//! write the rendered document into it, wait for the surface's one-shot
//! load-completion signal, then invoke the print action. This module makes
//! that sequence an explicit state machine with the surface injected behind
//! a trait, so the sequencing (and its failure modes) can be tested without
//! a real windowing environment.
//!
//! Failure modes:
//! - the surface cannot be opened (popup blocked): the job silently ends in
//!   [`PrintState::Aborted`] and no partial document is written;
//! - the load signal never fires: with no deadline configured the job waits
//!   in [`PrintState::Loaded`] indefinitely (the original behaviour); with a
//!   deadline configured, [`PrintJob::expire_if_overdue`] abandons it;
//! - the load signal fires twice: the second signal is an invalid
//!   transition.

use crate::error::{BcdError, BcdResult};
use chrono::{DateTime, Duration, Utc};

/// A windowing/display capability that can show and print a document.
///
/// Implementations are injected; the core never talks to a real window.
pub trait PresentationSurface {
    /// Writes the complete document into the surface.
    fn write_document(&mut self, document: &str);

    /// Invokes the surface's print action.
    fn invoke_print(&mut self);
}

/// Opens presentation surfaces on demand.
///
/// Returning `None` models the hosting environment refusing to provide a
/// surface (for example a blocked popup); callers must treat that as a
/// silent abort, not an error.
pub trait SurfaceProvider {
    fn open(&self) -> Option<Box<dyn PresentationSurface>>;
}

/// States of the print path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintState {
    Idle,
    SurfaceOpened,
    ContentWritten,
    /// Document fully handed to the surface; waiting for the one-shot
    /// load-completion signal.
    Loaded,
    PrintInvoked,
    /// Terminal state for a silently abandoned job (no surface, or load
    /// deadline passed). Nothing was printed.
    Aborted,
}

/// A single print invocation, driven to completion by the surface's load
/// signal.
pub struct PrintJob {
    state: PrintState,
    surface: Option<Box<dyn PresentationSurface>>,
    deadline: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for PrintJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrintJob")
            .field("state", &self.state)
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl PrintJob {
    /// Opens a surface and writes the document into it, leaving the job in
    /// [`PrintState::Loaded`], waiting for the load signal.
    ///
    /// If no surface can be opened the job ends in [`PrintState::Aborted`]
    /// without writing anything; this is not an error from the caller's
    /// perspective.
    ///
    /// `load_deadline`, when set, bounds how long the job may wait for the
    /// load signal (checked by [`expire_if_overdue`](Self::expire_if_overdue)).
    pub fn start(
        provider: &dyn SurfaceProvider,
        document: &str,
        load_deadline: Option<Duration>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut surface = match provider.open() {
            Some(surface) => surface,
            None => {
                tracing::warn!("print abandoned: no presentation surface available");
                return Self {
                    state: PrintState::Aborted,
                    surface: None,
                    deadline: None,
                };
            }
        };
        // SurfaceOpened and ContentWritten are passed through synchronously;
        // the job only ever rests in Loaded, PrintInvoked, or Aborted.
        surface.write_document(document);

        Self {
            state: PrintState::Loaded,
            surface: Some(surface),
            deadline: load_deadline.map(|d| now + d),
        }
    }

    pub fn state(&self) -> PrintState {
        self.state
    }

    /// Delivers the surface's one-shot load-completion signal, invoking the
    /// print action.
    ///
    /// A signal arriving after the job was abandoned is silently ignored.
    ///
    /// # Errors
    ///
    /// Returns `BcdError::InvalidPrintTransition` if the signal fires more
    /// than once per invocation.
    pub fn notify_loaded(&mut self, now: DateTime<Utc>) -> BcdResult<()> {
        if self.expire_if_overdue(now) {
            return Ok(());
        }
        match self.state {
            PrintState::Loaded => {
                if let Some(surface) = self.surface.as_mut() {
                    surface.invoke_print();
                }
                self.state = PrintState::PrintInvoked;
                Ok(())
            }
            PrintState::Aborted => Ok(()),
            from => Err(BcdError::InvalidPrintTransition {
                from: format!("{:?}", from),
                event: "load-completion".to_owned(),
            }),
        }
    }

    /// Abandons the job if it is still waiting for the load signal past its
    /// deadline. Returns whether the job was abandoned by this call.
    ///
    /// Jobs without a configured deadline wait indefinitely.
    pub fn expire_if_overdue(&mut self, now: DateTime<Utc>) -> bool {
        let overdue = matches!(self.state, PrintState::Loaded)
            && self.deadline.is_some_and(|deadline| now > deadline);
        if overdue {
            tracing::warn!("print abandoned: load signal did not arrive before the deadline");
            self.state = PrintState::Aborted;
            self.surface = None;
        }
        overdue
    }
}

/// Opens a surface and presents the preview document in it.
///
/// The surface is left idle for manual interaction: the preview document
/// carries its own print trigger. Returns whether a surface was available;
/// `false` is the silent popup-blocked abort, not an error.
pub fn present_preview(provider: &dyn SurfaceProvider, document: &str) -> bool {
    match provider.open() {
        Some(mut surface) => {
            surface.write_document(document);
            true
        }
        None => {
            tracing::warn!("preview abandoned: no presentation surface available");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct SurfaceLog {
        written: Vec<String>,
        prints: usize,
    }

    struct RecordingSurface(Arc<Mutex<SurfaceLog>>);

    impl PresentationSurface for RecordingSurface {
        fn write_document(&mut self, document: &str) {
            self.0.lock().unwrap().written.push(document.to_owned());
        }

        fn invoke_print(&mut self) {
            self.0.lock().unwrap().prints += 1;
        }
    }

    struct OpenProvider(Arc<Mutex<SurfaceLog>>);

    impl SurfaceProvider for OpenProvider {
        fn open(&self) -> Option<Box<dyn PresentationSurface>> {
            Some(Box::new(RecordingSurface(self.0.clone())))
        }
    }

    struct BlockedProvider;

    impl SurfaceProvider for BlockedProvider {
        fn open(&self) -> Option<Box<dyn PresentationSurface>> {
            None
        }
    }

    #[test]
    fn load_signal_drives_print() {
        let log = Arc::new(Mutex::new(SurfaceLog::default()));
        let provider = OpenProvider(log.clone());
        let now = Utc::now();

        let mut job = PrintJob::start(&provider, "<html></html>", None, now);
        assert_eq!(job.state(), PrintState::Loaded);
        assert_eq!(log.lock().unwrap().prints, 0);

        job.notify_loaded(now).unwrap();
        assert_eq!(job.state(), PrintState::PrintInvoked);

        let log = log.lock().unwrap();
        assert_eq!(log.written, vec!["<html></html>".to_owned()]);
        assert_eq!(log.prints, 1);
    }

    #[test]
    fn blocked_surface_aborts_silently() {
        let now = Utc::now();
        let mut job = PrintJob::start(&BlockedProvider, "<html></html>", None, now);
        assert_eq!(job.state(), PrintState::Aborted);

        // A stray load signal after the abort is ignored, not an error.
        job.notify_loaded(now).unwrap();
        assert_eq!(job.state(), PrintState::Aborted);
    }

    #[test]
    fn second_load_signal_is_rejected() {
        let log = Arc::new(Mutex::new(SurfaceLog::default()));
        let provider = OpenProvider(log.clone());
        let now = Utc::now();

        let mut job = PrintJob::start(&provider, "doc", None, now);
        job.notify_loaded(now).unwrap();

        let err = job.notify_loaded(now).unwrap_err();
        assert!(matches!(err, BcdError::InvalidPrintTransition { .. }));
        assert_eq!(log.lock().unwrap().prints, 1);
    }

    #[test]
    fn overdue_job_is_abandoned_without_printing() {
        let log = Arc::new(Mutex::new(SurfaceLog::default()));
        let provider = OpenProvider(log.clone());
        let now = Utc::now();

        let mut job = PrintJob::start(&provider, "doc", Some(Duration::seconds(30)), now);
        assert!(!job.expire_if_overdue(now + Duration::seconds(10)));
        assert!(job.expire_if_overdue(now + Duration::seconds(31)));
        assert_eq!(job.state(), PrintState::Aborted);

        // The late load signal no longer prints anything.
        job.notify_loaded(now + Duration::seconds(32)).unwrap();
        assert_eq!(log.lock().unwrap().prints, 0);
    }

    #[test]
    fn job_without_deadline_waits_indefinitely() {
        let log = Arc::new(Mutex::new(SurfaceLog::default()));
        let provider = OpenProvider(log.clone());
        let now = Utc::now();

        let mut job = PrintJob::start(&provider, "doc", None, now);
        assert!(!job.expire_if_overdue(now + Duration::days(365)));
        assert_eq!(job.state(), PrintState::Loaded);
    }

    #[test]
    fn preview_presents_without_printing() {
        let log = Arc::new(Mutex::new(SurfaceLog::default()));
        let provider = OpenProvider(log.clone());

        assert!(present_preview(&provider, "preview doc"));
        let log = log.lock().unwrap();
        assert_eq!(log.written, vec!["preview doc".to_owned()]);
        assert_eq!(log.prints, 0);
    }

    #[test]
    fn blocked_preview_returns_false() {
        assert!(!present_preview(&BlockedProvider, "preview doc"));
    }
}
