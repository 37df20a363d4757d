//! Dialog components for TUI

mod base;
mod submitting_dialog;

pub use submitting_dialog::render_submitting_dialog;
