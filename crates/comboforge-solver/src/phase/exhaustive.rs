//! Depth-first enumeration of small models.

use comboforge_core::{Context, Model, Value, Variable, VariableKind};

/// Largest value count a model may have to be enumerated.
///
/// A boolean counts one value, a nominal or multi-select one per domain
/// element and a constant none.
pub const EXHAUSTIVE_VALUE_LIMIT: usize = 20;

/// Number of values spanned by the variables of `model`.
pub fn value_count(model: &Model) -> usize {
    model
        .variables()
        .iter()
        .map(|variable| match variable.kind() {
            VariableKind::Boolean => 1,
            VariableKind::Constant(_) => 0,
            VariableKind::Nominal(domain) => domain.len(),
            VariableKind::MultiSelect { domain, .. } => domain.len(),
        })
        .sum()
}

/// Visits complete assignments in variable order, pruning a branch as soon
/// as a selection would exceed an AtMost limit.
///
/// Booleans try `false` first, nominals follow their domain order and
/// multi-selects go through their subsets by bit mask.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExhaustiveSearch;

impl ExhaustiveSearch {
    pub fn new() -> Self {
        Self
    }

    /// Up to `limit` feasible value vectors agreeing with `context`.
    ///
    /// The caller validates the context and bounds the model size with
    /// [`EXHAUSTIVE_VALUE_LIMIT`].
    pub fn solve(&self, model: &Model, context: &Context, limit: usize) -> Vec<Vec<Value>> {
        let choices: Vec<Vec<Value>> = model
            .variables()
            .iter()
            .map(|variable| match context.get(variable.id()) {
                Some(fixed) => vec![fixed.clone()],
                None => candidates(variable),
            })
            .collect();
        let mut walk = Walk {
            model,
            choices: &choices,
            counts: vec![0; model.constraints().len()],
            current: Vec::with_capacity(choices.len()),
            found: Vec::new(),
            limit,
        };
        if limit > 0 {
            walk.descend();
        }
        walk.found
    }
}

struct Walk<'a> {
    model: &'a Model,
    choices: &'a [Vec<Value>],
    counts: Vec<usize>,
    current: Vec<Value>,
    found: Vec<Vec<Value>>,
    limit: usize,
}

impl Walk<'_> {
    fn descend(&mut self) {
        let depth = self.current.len();
        if depth == self.choices.len() {
            self.found.push(self.current.clone());
            return;
        }

        let model = self.model;
        let choices = self.choices;
        let variable = &model.variables()[depth];
        let touched = model.constraints_on(variable.id());
        for value in &choices[depth] {
            if self.found.len() == self.limit {
                return;
            }
            let selected = match variable.kind() {
                VariableKind::Constant(_) => true,
                _ => value.is_selected(),
            };
            if selected {
                let full = touched
                    .iter()
                    .any(|&c| self.counts[c.index()] >= model.constraint(c).limit());
                if full {
                    continue;
                }
                for &c in touched {
                    self.counts[c.index()] += 1;
                }
            }

            self.current.push(value.clone());
            self.descend();
            self.current.pop();

            if selected {
                for &c in touched {
                    self.counts[c.index()] -= 1;
                }
            }
        }
    }
}

fn candidates(variable: &Variable) -> Vec<Value> {
    match variable.kind() {
        VariableKind::Boolean => vec![Value::Bool(false), Value::Bool(true)],
        VariableKind::Constant(value) => vec![value.clone()],
        VariableKind::Nominal(domain) => domain.clone(),
        VariableKind::MultiSelect { domain, min, max } => (0u64..1 << domain.len())
            .filter(|mask| (*min..=*max).contains(&(mask.count_ones() as usize)))
            .map(|mask| {
                Value::Selection(
                    domain
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| mask & (1 << i) != 0)
                        .map(|(_, v)| v.clone())
                        .collect(),
                )
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comboforge_core::ModelBuilder;

    #[test]
    fn test_multi_select_subsets_within_bounds() {
        let model = ModelBuilder::new("R")
            .multi_select("m", ["a", "b", "c", "d"], 1, 2)
            .build()
            .unwrap();
        let found = ExhaustiveSearch::new().solve(&model, &Context::new(), 100);
        // 4 singletons and 6 pairs.
        assert_eq!(found.len(), 10);
        assert!(found
            .iter()
            .all(|values| model.variables()[0].validate(values[0].clone()).is_ok()));
        assert_eq!(value_count(&model), 4);
    }

    #[test]
    fn test_limits_prune_and_cap() {
        let model = ModelBuilder::new("R")
            .boolean("a")
            .boolean("b")
            .boolean("c")
            .at_most(1, ["a", "b", "c"])
            .build()
            .unwrap();
        let search = ExhaustiveSearch::new();
        let all = search.solve(&model, &Context::new(), 100);
        assert_eq!(all.len(), 4);
        assert_eq!(all[0], vec![Value::Bool(false); 3]);
        assert_eq!(search.solve(&model, &Context::new(), 2).len(), 2);
        assert!(search.solve(&model, &Context::new(), 0).is_empty());

        let context = Context::from(model.fixed("b", true).unwrap());
        let forced = search.solve(&model, &context, 100);
        assert_eq!(
            forced,
            vec![vec![Value::Bool(false), Value::Bool(true), Value::Bool(false)]]
        );
    }
}
