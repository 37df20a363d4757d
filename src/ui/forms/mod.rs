//! Form rendering module
//!
//! - `field_renderer`: bordered input rendering
//! - `step_form`: the content block of each step

mod field_renderer;
mod step_form;

pub use step_form::draw_step;
