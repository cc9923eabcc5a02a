// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for Pulse event channels
//!
//! Subscribers are user code, so nearly every failure a channel sees originates in a
//! callback. [`PulseError`] records where it came from (an `Err` return, a panic, or
//! several of either during one concurrent dispatch) so the caller of an awaited
//! emission, or the unhandled-failure hook, can tell them apart.
//!
//! # Examples
//!
//! ```
//! use pulse_core::{PulseError, Result};
//!
//! fn handler_outcome() -> Result<()> {
//!     Err(PulseError::callback_panic("subscriber 3 panicked"))
//! }
//! ```

/// Root error type for all Pulse operations
#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    /// Custom error from user code
    ///
    /// A subscriber returned `Err`; the original error is kept as the source.
    #[error("User error: {0}")]
    UserError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// User-provided callback panicked
    ///
    /// The panic is caught at the dispatch boundary and converted to this variant
    /// so the remaining subscribers still run.
    #[error("User callback panicked: {context}")]
    CallbackPanic {
        /// The panic payload, rendered as text
        context: String,
    },

    /// Multiple errors occurred
    ///
    /// A concurrent dispatch settles every handler before reporting, so more than
    /// one of them can fail within a single emission.
    #[error("Multiple errors occurred: {count} errors")]
    MultipleErrors {
        /// Number of errors that occurred
        count: usize,
        /// The individual errors, in subscription order
        errors: Vec<PulseError>,
    },

    /// Every handle to the channel was dropped before the awaited event arrived
    #[error("Channel dropped before the next event was emitted")]
    ChannelDropped,

    /// Context added on top of another error
    #[error("{context}: {source}")]
    WithContext {
        /// What was being done when the error happened
        context: String,
        /// The underlying error
        #[source]
        source: Box<PulseError>,
    },
}

impl PulseError {
    /// Wrap a user error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }

    /// Create a callback panic error with the given context
    pub fn callback_panic(context: impl Into<String>) -> Self {
        Self::CallbackPanic {
            context: context.into(),
        }
    }

    /// Fold the failures of one dispatch into a single error.
    ///
    /// Returns `None` for an empty list, the error itself for a single failure and
    /// `MultipleErrors` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use pulse_core::PulseError;
    ///
    /// let single = PulseError::aggregate(vec![PulseError::callback_panic("a")]);
    /// assert!(matches!(single, Some(PulseError::CallbackPanic { .. })));
    ///
    /// let many = PulseError::aggregate(vec![
    ///     PulseError::callback_panic("a"),
    ///     PulseError::callback_panic("b"),
    /// ]);
    /// assert!(matches!(many, Some(PulseError::MultipleErrors { count: 2, .. })));
    /// ```
    #[must_use]
    pub fn aggregate(mut errors: Vec<PulseError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            count => Some(Self::MultipleErrors { count, errors }),
        }
    }

    /// Check if the failure came from subscriber code
    #[must_use]
    pub fn is_subscriber_failure(&self) -> bool {
        match self {
            Self::UserError(_) | Self::CallbackPanic { .. } => true,
            Self::MultipleErrors { errors, .. } => errors.iter().all(Self::is_subscriber_failure),
            Self::WithContext { source, .. } => source.is_subscriber_failure(),
            Self::ChannelDropped => false,
        }
    }

    /// Number of underlying failures this error stands for
    #[must_use]
    pub fn failure_count(&self) -> usize {
        match self {
            Self::MultipleErrors { errors, .. } => errors.iter().map(Self::failure_count).sum(),
            Self::WithContext { source, .. } => source.failure_count(),
            _ => 1,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
struct ClonedUserError {
    message: String,
}

/// Specialized Result type for Pulse operations
pub type Result<T> = std::result::Result<T, PulseError>;

/// Extension trait for converting errors into `PulseError`
///
/// Implemented for every `std::error::Error + Send + Sync + 'static`, which is what
/// lets async subscribers return their own error types.
pub trait IntoPulseError {
    /// Convert this error into a `PulseError` with additional context
    fn into_pulse_error(self, context: &str) -> PulseError;

    /// Convert this error into a `PulseError` without additional context
    fn into_pulse(self) -> PulseError
    where
        Self: Sized;
}

impl<E: std::error::Error + Send + Sync + 'static> IntoPulseError for E {
    fn into_pulse_error(self, context: &str) -> PulseError {
        PulseError::user_error(self).context(context)
    }

    fn into_pulse(self) -> PulseError {
        PulseError::user_error(self)
    }
}

impl PulseError {
    fn context(self, context: &str) -> Self {
        if context.is_empty() {
            return self;
        }
        Self::WithContext {
            context: context.to_string(),
            source: Box::new(self),
        }
    }
}

/// Helper trait for adding context to `Result`s
pub trait ResultExt<T> {
    /// Add context to an error
    ///
    /// # Errors
    /// Returns `Err(PulseError)` if the underlying result is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context to an error using a closure (lazy evaluation)
    ///
    /// # Errors
    /// Returns `Err(PulseError)` if the underlying result is `Err`.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let context: String = context.into();
            e.context(&context)
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.context(&f()))
    }
}

impl Clone for PulseError {
    fn clone(&self) -> Self {
        match self {
            // The boxed user error cannot be cloned, keep its message
            Self::UserError(e) => Self::UserError(Box::new(ClonedUserError {
                message: e.to_string(),
            })),
            Self::CallbackPanic { context } => Self::CallbackPanic {
                context: context.clone(),
            },
            Self::MultipleErrors { count, errors } => Self::MultipleErrors {
                count: *count,
                errors: errors.clone(),
            },
            Self::ChannelDropped => Self::ChannelDropped,
            Self::WithContext { context, source } => Self::WithContext {
                context: context.clone(),
                source: source.clone(),
            },
        }
    }
}
