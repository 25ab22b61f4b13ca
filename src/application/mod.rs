//! Application layer.
//!
//! Orchestrates the store, the lock registry and the notification channel
//! for operations that outlive a single request.

pub mod toggle_complete;

pub use toggle_complete::{
    ToggleAccepted, ToggleCompleteService, ToggleError, ToggleOutcome, ToggleReport, ToggleTask,
};
