//! Application state module

mod announcer;
mod app_state;
mod combobox;
mod focus;
mod forms;
mod navigation;
mod progress;
mod review;
pub mod scheduler;
pub mod snapshot;
pub mod validation;

pub use announcer::*;
pub use app_state::*;
pub use combobox::*;
pub use focus::*;
pub use forms::*;
pub use navigation::*;
pub use progress::*;
pub use review::*;
pub use snapshot::{PersistedSnapshot, UiPreferences};
