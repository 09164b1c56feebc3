//! Manual editing form: step blocks, image preview, search box, submit check.
//!
//! [`model`] holds the step bookkeeping against the [`model::StepSurface`]
//! abstraction; [`dom`] is the web-sys adapter and event wiring.

pub mod dom;
pub mod model;
pub mod preview;
pub mod search;

pub use model::{validate_manual_form, FormError, StepForm, StepSurface};
