//! Presentation: pure derivations from session state, and their text form.

pub mod presenter;
pub mod render;
