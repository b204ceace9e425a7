//! Working state of one solve attempt.

use smallvec::SmallVec;

use comboforge_core::{ConstraintId, Context, Model, Value, VariableId, VariableKind};

/// Values under repair together with incremental constraint counts.
///
/// Every variable holds a value. `counts[c]` is the number of selected
/// variables referenced by constraint `c`.
pub(crate) struct SearchScope<'a> {
    model: &'a Model,
    context: &'a Context,
    values: Vec<Value>,
    selected: Vec<bool>,
    counts: Vec<usize>,
    step_count: u64,
}

impl<'a> SearchScope<'a> {
    pub(crate) fn new(model: &'a Model, context: &'a Context, values: Vec<Value>) -> Self {
        let selected: Vec<bool> = model
            .variables()
            .iter()
            .zip(&values)
            .map(|(variable, value)| match variable.kind() {
                VariableKind::Constant(_) => true,
                _ => value.is_selected(),
            })
            .collect();
        let counts = model
            .constraints()
            .iter()
            .map(|c| c.selected_count(|v| selected[v.index()]))
            .collect();
        Self {
            model,
            context,
            values,
            selected,
            counts,
            step_count: 0,
        }
    }

    pub(crate) fn step_count(&self) -> u64 {
        self.step_count
    }

    pub(crate) fn is_selected(&self, variable: VariableId) -> bool {
        self.selected[variable.index()]
    }

    /// A selected variable the search may switch off.
    pub(crate) fn is_flippable(&self, variable: VariableId) -> bool {
        self.is_selected(variable)
            && !self.context.contains(variable)
            && self.model.variable(variable).kind().unselected_value().is_some()
    }

    /// Constraints whose selected count exceeds their limit, in id order.
    pub(crate) fn violated_constraints(&self) -> SmallVec<[ConstraintId; 8]> {
        self.model
            .constraints()
            .iter()
            .filter(|c| self.counts[c.id().index()] > c.limit())
            .map(|c| c.id())
            .collect()
    }

    /// Switches a flippable variable off and updates the counts.
    pub(crate) fn flip(&mut self, variable: VariableId) {
        let Some(unselected) = self.model.variable(variable).kind().unselected_value() else {
            return;
        };
        self.values[variable.index()] = unselected;
        self.selected[variable.index()] = false;
        for &c in self.model.constraints_on(variable) {
            self.counts[c.index()] -= 1;
        }
        self.step_count += 1;
    }

    pub(crate) fn into_values(self) -> Vec<Option<Value>> {
        self.values.into_iter().map(Some).collect()
    }
}
