//! Cardinality constraints.
//!
//! The only constraint vocabulary is "at most `limit` of these variables are
//! simultaneously selected". Selection follows [`crate::Value::is_selected`].

use crate::model::ScopeId;
use crate::variable::VariableId;

/// Stable index of a constraint in a model's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(pub(crate) usize);

impl ConstraintId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// At most `limit` of `variables` may be selected at the same time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub(crate) id: ConstraintId,
    pub(crate) scope: ScopeId,
    pub(crate) limit: usize,
    pub(crate) variables: Vec<VariableId>,
}

impl Constraint {
    pub fn id(&self) -> ConstraintId {
        self.id
    }

    /// Scope that declares the constraint.
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Referenced variables, deduplicated, in declaration order.
    pub fn variables(&self) -> &[VariableId] {
        &self.variables
    }

    /// Counts referenced variables for which `is_selected` holds.
    pub fn selected_count(&self, is_selected: impl Fn(VariableId) -> bool) -> usize {
        self.variables.iter().filter(|&&v| is_selected(v)).count()
    }

    /// Number of selected variables above the limit.
    pub fn violation(&self, is_selected: impl Fn(VariableId) -> bool) -> usize {
        self.selected_count(is_selected).saturating_sub(self.limit)
    }

    pub fn is_satisfied(&self, is_selected: impl Fn(VariableId) -> bool) -> bool {
        self.violation(is_selected) == 0
    }
}
