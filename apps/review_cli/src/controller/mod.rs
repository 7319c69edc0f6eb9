//! Controller layer: editable review form and the session state machine.

pub mod form;
pub mod session;
