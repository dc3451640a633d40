//! `rota-report`: shareable text for records and hand-off to a messaging app.

pub mod format;
pub mod share;

pub use format::{render_history, render_month, render_range, render_record};
pub use share::{compose_link, DesktopSharer, Result, ShareError, ShareProvider};
