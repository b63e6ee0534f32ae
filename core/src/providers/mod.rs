//! External collaborator bindings.
//!
//! The only genuinely suspending collaborator is email delivery, abstracted
//! behind [`EmailProvider`] so the identity gate can dispatch codes
//! fire-and-forget.

mod console_email;
mod email;
mod smtp_email;

pub use console_email::ConsoleEmailProvider;
pub use email::{EmailDispatcher, EmailProvider};
pub use smtp_email::SmtpEmailProvider;
