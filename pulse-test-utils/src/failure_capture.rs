// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::recorder::Recorder;
use pulse_core::PulseError;

/// Collects the failures a channel reports to its failure handler.
///
/// ```rust
/// use pulse_core::{FailureReporter, PulseError};
/// use pulse_test_utils::FailureCapture;
///
/// let capture = FailureCapture::new();
/// let reporter = FailureReporter::with_handler(capture.handler());
///
/// reporter.report(&PulseError::callback_panic("boom"));
/// assert_eq!(capture.messages(), vec!["User callback panicked: boom"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FailureCapture {
    errors: Recorder<PulseError>,
}

impl FailureCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler to pass to `with_failure_handler`.
    pub fn handler(&self) -> impl Fn(&PulseError) + Send + Sync + 'static {
        let errors = self.errors.clone();
        move |error: &PulseError| errors.push(error.clone())
    }

    pub fn errors(&self) -> Vec<PulseError> {
        self.errors.entries()
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors().iter().map(ToString::to_string).collect()
    }

    pub fn count(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}
