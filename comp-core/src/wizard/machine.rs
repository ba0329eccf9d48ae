use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::calculations::{AwwError, CommutedValueError};
use crate::wizard::step::{ErrorMap, FieldMap, StepSpec, WizardFlow};

/// Contract violations between a flow and the wizard.
///
/// Bad user input is never reported here; it lands in the wizard's
/// [`ErrorMap`] instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("field '{0}' is not part of this wizard")]
    UnknownField(String),

    #[error("step {0} is missing from the step table")]
    UnknownStep(String),

    #[error("no branch from step {step} for {field} = '{value}'")]
    NoBranch {
        step: String,
        field: &'static str,
        value: String,
    },

    #[error("field '{field}' holds '{value}', which did not pass validation")]
    InvalidField { field: &'static str, value: String },

    #[error(transparent)]
    Aww(#[from] AwwError),

    #[error(transparent)]
    CommutedValue(#[from] CommutedValueError),
}

/// What happened when the user pressed "next".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Advance<S> {
    /// Moved to another input step.
    Moved(S),

    /// Validation failed; the errors are in [`WizardState::errors`].
    Blocked,

    /// Reached the results step and stored fresh results.
    Completed(S),
}

/// Per-session wizard state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardState<S, O> {
    pub current_step: S,
    pub fields: FieldMap,
    pub errors: ErrorMap,
    pub results: Option<O>,
    /// Steps visited before the current one, oldest first.
    pub history: Vec<S>,
}

/// Drives a [`WizardFlow`] through its steps for one user session.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use chrono::NaiveDate;
/// use comp_core::rates::RateTable;
/// use comp_core::wizard::{Advance, AwwFlow, AwwStep, Wizard};
///
/// let today = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
/// let mut wizard = Wizard::new(AwwFlow::new(Arc::new(RateTable::default()), today));
///
/// wizard.set_field("date_of_injury", "2025-05-10").unwrap();
/// assert_eq!(wizard.next().unwrap(), Advance::Moved(AwwStep::SpecialCase));
///
/// assert!(wizard.back());
/// assert_eq!(wizard.current_step(), AwwStep::DateOfInjury);
/// ```
#[derive(Debug)]
pub struct Wizard<F: WizardFlow> {
    flow: F,
    state: WizardState<F::Step, F::Outcome>,
}

impl<F: WizardFlow> Wizard<F> {
    pub fn new(flow: F) -> Self {
        let state = WizardState {
            current_step: flow.initial_step(),
            fields: flow.seed_fields(),
            errors: ErrorMap::new(),
            results: None,
            history: Vec::new(),
        };
        Self { flow, state }
    }

    pub fn flow(&self) -> &F {
        &self.flow
    }

    pub fn state(&self) -> &WizardState<F::Step, F::Outcome> {
        &self.state
    }

    pub fn current_step(&self) -> F::Step {
        self.state.current_step
    }

    pub fn current_spec(&self) -> Result<&'static StepSpec<F>, WizardError> {
        self.spec_for(self.state.current_step)
    }

    pub fn field(
        &self,
        name: &str,
    ) -> Option<&str> {
        self.state.fields.get(name).map(String::as_str)
    }

    pub fn fields(&self) -> &FieldMap {
        &self.state.fields
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.state.errors
    }

    pub fn results(&self) -> Option<&F::Outcome> {
        self.state.results.as_ref()
    }

    pub fn history(&self) -> &[F::Step] {
        &self.state.history
    }

    pub fn is_terminal(&self) -> bool {
        self.current_spec().is_ok_and(StepSpec::is_terminal)
    }

    /// Stores a field value, clearing its error and any computed results.
    pub fn set_field(
        &mut self,
        name: &str,
        value: &str,
    ) -> Result<(), WizardError> {
        let known = self
            .flow
            .steps()
            .iter()
            .any(|spec| spec.fields.iter().any(|field| *field == name));
        if !known {
            return Err(WizardError::UnknownField(name.to_string()));
        }

        self.state.fields.insert(name.to_string(), value.to_string());
        self.state.errors.remove(name);
        self.state.results = None;
        Ok(())
    }

    /// Validates the current step and moves forward.
    ///
    /// Before entering the results step every visited step is validated
    /// again, since fields may have been edited after leaving them. On the
    /// results step itself this recomputes the results in place.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError`] when the step table is inconsistent with the
    /// field values or the calculation rejects validated input.
    pub fn next(&mut self) -> Result<Advance<F::Step>, WizardError> {
        let spec = self.current_spec()?;
        let from = spec.step;

        let errors = (spec.validate)(&self.flow, &self.state.fields);
        if !errors.is_empty() {
            debug!(flow = self.flow.name(), step = ?from, ?errors, "step blocked");
            self.state.errors = errors;
            return Ok(Advance::Blocked);
        }

        let Some(target) = spec.transition.resolve(from, &self.state.fields)? else {
            return self.compute_results();
        };

        let entering_results = self.spec_for(target)?.is_terminal();
        if entering_results {
            let errors = self.visited_errors()?;
            if !errors.is_empty() {
                debug!(flow = self.flow.name(), ?errors, "visited steps no longer validate");
                self.state.errors = errors;
                return Ok(Advance::Blocked);
            }
        }

        self.state.history.push(from);
        self.state.current_step = target;
        self.state.errors.clear();
        debug!(flow = self.flow.name(), from = ?from, to = ?target, "step advanced");

        if entering_results {
            return self.compute_results();
        }
        Ok(Advance::Moved(target))
    }

    /// Returns to the previously visited step. Always allowed.
    ///
    /// Returns `false` on the first step.
    pub fn back(&mut self) -> bool {
        let Some(previous) = self.state.history.pop() else {
            return false;
        };
        debug!(flow = self.flow.name(), from = ?self.state.current_step, to = ?previous, "step back");
        self.state.current_step = previous;
        self.state.errors.clear();
        self.state.results = None;
        true
    }

    /// Restores the seed values and returns to the first step.
    pub fn reset(&mut self) {
        debug!(flow = self.flow.name(), "wizard reset");
        self.state = WizardState {
            current_step: self.flow.initial_step(),
            fields: self.flow.seed_fields(),
            errors: ErrorMap::new(),
            results: None,
            history: Vec::new(),
        };
    }

    /// Errors from every visited step plus the current one.
    fn visited_errors(&self) -> Result<ErrorMap, WizardError> {
        let mut errors = ErrorMap::new();
        let path = self
            .state
            .history
            .iter()
            .copied()
            .chain(std::iter::once(self.state.current_step));
        for step in path {
            let spec = self.spec_for(step)?;
            errors.extend((spec.validate)(&self.flow, &self.state.fields));
        }
        Ok(errors)
    }

    fn compute_results(&mut self) -> Result<Advance<F::Step>, WizardError> {
        let errors = self.visited_errors()?;
        if !errors.is_empty() {
            self.state.errors = errors;
            return Ok(Advance::Blocked);
        }

        let outcome = self.flow.compute(&self.state.fields)?;
        info!(flow = self.flow.name(), "results computed");
        self.state.results = Some(outcome);
        Ok(Advance::Completed(self.state.current_step))
    }

    fn spec_for(
        &self,
        step: F::Step,
    ) -> Result<&'static StepSpec<F>, WizardError> {
        self.flow
            .steps()
            .iter()
            .find(|spec| spec.step == step)
            .ok_or_else(|| WizardError::UnknownStep(format!("{step:?}")))
    }
}
