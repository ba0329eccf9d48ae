use std::collections::BTreeMap;
use std::fmt;

use crate::wizard::WizardError;

/// Form values keyed by field name, exactly as entered.
pub type FieldMap = BTreeMap<String, String>;

/// Validation messages keyed by field name.
pub type ErrorMap = BTreeMap<String, String>;

/// Where a step goes when the user advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<S: 'static> {
    /// Always the same next step.
    Always(S),

    /// Chosen by the value of `field`. Each arm pairs a field value with
    /// the step it leads to.
    Branch {
        field: &'static str,
        arms: &'static [(&'static str, S)],
    },

    /// The results step. Reaching it runs the calculation.
    Terminal,
}

impl<S: Copy + fmt::Debug> Transition<S> {
    /// Resolves the next step for the current field values.
    ///
    /// Returns `Ok(None)` for a terminal step.
    pub fn resolve(
        &self,
        from: S,
        fields: &FieldMap,
    ) -> Result<Option<S>, WizardError> {
        match self {
            Self::Always(next) => Ok(Some(*next)),
            Self::Branch { field, arms } => {
                let value = fields.get(*field).map(|v| v.trim()).unwrap_or_default();
                arms.iter()
                    .find(|(arm, _)| *arm == value)
                    .map(|(_, next)| Some(*next))
                    .ok_or_else(|| WizardError::NoBranch {
                        step: format!("{from:?}"),
                        field: *field,
                        value: value.to_string(),
                    })
            }
            Self::Terminal => Ok(None),
        }
    }
}

/// One row of a flow's step table.
pub struct StepSpec<F: WizardFlow + 'static> {
    pub step: F::Step,
    pub title: &'static str,
    /// Explanatory text shown with the step; empty when there is none.
    pub note: &'static str,
    /// Fields edited on this step.
    pub fields: &'static [&'static str],
    pub validate: fn(&F, &FieldMap) -> ErrorMap,
    pub transition: Transition<F::Step>,
}

impl<F: WizardFlow> StepSpec<F> {
    pub fn is_terminal(&self) -> bool {
        matches!(self.transition, Transition::Terminal)
    }
}

/// A concrete wizard: its step table, seed values, and calculation.
pub trait WizardFlow: Sized + 'static {
    type Step: Copy + Eq + fmt::Debug + 'static;
    type Outcome: Clone + fmt::Debug;

    fn name(&self) -> &'static str;

    fn steps(&self) -> &'static [StepSpec<Self>];

    fn initial_step(&self) -> Self::Step;

    /// Field values a fresh or reset wizard starts with.
    fn seed_fields(&self) -> FieldMap;

    /// Runs the calculation. Only called once every visited step validates.
    fn compute(
        &self,
        fields: &FieldMap,
    ) -> Result<Self::Outcome, WizardError>;
}

/// Validator for steps with nothing to check.
pub fn no_errors<F>(
    _flow: &F,
    _fields: &FieldMap,
) -> ErrorMap {
    ErrorMap::new()
}
