//! Multi-step input wizards.
//!
//! A [`Wizard`] owns one session's field values, validation errors, visited
//! steps and results. What the steps are, how they branch and what gets
//! computed at the end comes from a [`WizardFlow`]:
//!
//! - [`AwwFlow`] collects the date of injury and quarterly wages and
//!   produces an [`AwwOutcome`](crate::models::AwwOutcome).
//! - [`CommutedValueFlow`] collects the year, rate and credited weeks and
//!   produces a [`CommutedValueResult`](crate::models::CommutedValueResult).
//!
//! Wizards share nothing but the rate table, so each session gets its own.

pub mod aww_flow;
pub mod commuted_flow;
mod machine;
mod step;
pub mod validators;

pub use aww_flow::{AwwFlow, AwwStep};
pub use commuted_flow::{CommutedStep, CommutedValueFlow};
pub use machine::{Advance, Wizard, WizardError, WizardState};
pub use step::{ErrorMap, FieldMap, StepSpec, Transition, WizardFlow, no_errors};
