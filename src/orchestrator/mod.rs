//! Application-level orchestration.
//!
//! This module owns the draw lifecycle: the single task that holds the audience and the
//! draw state, applies UI commands and fires the delayed transitions. UI/CLI layers talk to
//! it only through channels.

mod controller;

pub(crate) use controller::{run_controller, UiCommand};
