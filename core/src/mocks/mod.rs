//! Mock collaborators for testing.
//!
//! Available under the default-on `test-utils` feature so integration
//! tests and downstream crates can exercise the pipeline without SMTP or a
//! live clock.

mod clock;
mod email;

pub use clock::MockClock;
pub use email::{MockEmailProvider, SentCode};
