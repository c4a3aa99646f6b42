//! Page surface port
//!
//! The host page owns the DOM; the renderer talks to it only through this
//! trait. It holds exactly one results container and one error slot.

use crate::domain::{ControlAction, ControlId, ResultsMarkup};

pub trait ResultsView: Send {
    /// Replace the container contents and the full binding table
    ///
    /// Previous bindings are dropped, so each control ends up bound once.
    fn replace_results(&mut self, markup: &ResultsMarkup);

    /// Empty the container and drop every binding
    fn clear_results(&mut self);

    /// Put a message in the error slot, replacing any previous one
    fn show_error(&mut self, text: &str);

    /// Empty the error slot
    fn clear_error(&mut self);

    /// Current error message, if any
    fn error(&self) -> Option<&str>;

    /// The action bound to a control, if it is bound
    fn binding(&self, control: &ControlId) -> Option<ControlAction>;

    /// Leave the page for another path
    fn redirect(&mut self, path: &str);
}
