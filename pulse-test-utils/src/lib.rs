// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the Pulse event channel crates.
//!
//! This crate provides payload fixtures, shared logs and ready-made subscribers for
//! testing dispatch order and failure reporting. It is designed for use in
//! development and testing only, not for production code.
//!
//! # Key Types
//!
//! - [`Recorder`]: a cloneable, ordered log subscribers append to
//! - [`FailureCapture`]: a failure handler that keeps what it receives
//! - [`handlers`]: async subscribers with artificial delays
//! - [`TestData`]: person / animal / plant payload fixtures
//!
//! # Examples
//!
//! ```rust
//! use pulse_test_utils::Recorder;
//!
//! let log = Recorder::<String>::new();
//! let callback = log.labelled::<u32>("a");
//!
//! callback(5);
//! callback(6);
//!
//! assert_eq!(log.entries(), vec!["a:5", "a:6"]);
//! ```

pub mod failure_capture;
pub mod handlers;
pub mod recorder;
pub mod test_data;
pub mod test_error;

pub use failure_capture::FailureCapture;
pub use recorder::Recorder;
pub use test_data::TestData;
pub use test_error::TestError;
