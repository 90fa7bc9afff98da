//! Plan steps as dispatched by the executor.

use super::{BehaviorKind, PlanStepError};
use std::fmt;

/// One action of a plan: the behavior to run and its ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanStep {
    kind: BehaviorKind,
    arguments: Vec<String>,
}

impl PlanStep {
    /// Creates a plan step.
    #[must_use]
    pub fn new(kind: BehaviorKind, arguments: impl IntoIterator<Item = String>) -> Self {
        Self {
            kind,
            arguments: arguments.into_iter().collect(),
        }
    }

    /// Parses a whitespace-separated step such as `(move robot wp0 wp1)`.
    ///
    /// Surrounding parentheses are optional. The first token names the
    /// action and the remaining tokens become the argument list.
    ///
    /// # Errors
    ///
    /// Returns [`PlanStepError::Empty`] for blank input and
    /// [`PlanStepError::UnknownAction`] when the action is not recognised.
    pub fn parse(text: &str) -> Result<Self, PlanStepError> {
        let trimmed = text
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')');
        let mut tokens = trimmed.split_whitespace();
        let action = tokens.next().ok_or(PlanStepError::Empty)?;
        let kind = BehaviorKind::try_from(action)?;
        Ok(Self::new(kind, tokens.map(str::to_owned)))
    }

    /// Returns the behavior kind.
    #[must_use]
    pub const fn kind(&self) -> BehaviorKind {
        self.kind
    }

    /// Returns the ordered argument list.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }
}

impl fmt::Display for PlanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.kind)?;
        for argument in &self.arguments {
            write!(f, " {argument}")?;
        }
        f.write_str(")")
    }
}
