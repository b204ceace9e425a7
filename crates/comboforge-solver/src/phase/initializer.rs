//! Random initialization of an attempt.

use rand::Rng;

use comboforge_core::{Context, Model, Value, Variable, VariableKind};

/// Gives every variable a starting value.
///
/// Constants take their value, context variables their fixed value and every
/// other variable a uniformly random one. Multi-selects include each element
/// with probability one half and are then resized into their bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomInitializer;

impl RandomInitializer {
    pub fn new() -> Self {
        Self
    }

    pub fn initialize<R: Rng + ?Sized>(
        &self,
        model: &Model,
        context: &Context,
        rng: &mut R,
    ) -> Vec<Value> {
        model
            .variables()
            .iter()
            .map(|variable| match context.get(variable.id()) {
                Some(fixed) => fixed.clone(),
                None => random_value(variable, rng),
            })
            .collect()
    }
}

fn random_value<R: Rng + ?Sized>(variable: &Variable, rng: &mut R) -> Value {
    match variable.kind() {
        VariableKind::Boolean => Value::Bool(rng.random_bool(0.5)),
        VariableKind::Constant(value) => value.clone(),
        VariableKind::Nominal(domain) => domain[rng.random_range(0..domain.len())].clone(),
        VariableKind::MultiSelect { domain, min, max } => {
            let mut included: Vec<bool> = domain.iter().map(|_| rng.random_bool(0.5)).collect();
            let mut size = included.iter().filter(|&&b| b).count();
            while size < *min {
                let pick = nth_where(&included, false, rng.random_range(0..domain.len() - size));
                included[pick] = true;
                size += 1;
            }
            while size > *max {
                let pick = nth_where(&included, true, rng.random_range(0..size));
                included[pick] = false;
                size -= 1;
            }
            Value::Selection(
                domain
                    .iter()
                    .zip(&included)
                    .filter(|(_, &inc)| inc)
                    .map(|(v, _)| v.clone())
                    .collect(),
            )
        }
    }
}

/// Position of the `n`th entry equal to `flag`.
fn nth_where(flags: &[bool], flag: bool, n: usize) -> usize {
    flags
        .iter()
        .enumerate()
        .filter(|(_, &f)| f == flag)
        .nth(n)
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use comboforge_core::ModelBuilder;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_multi_select_respects_bounds() {
        let model = ModelBuilder::new("R")
            .multi_select("m", ["a", "b", "c", "d", "e"], 2, 3)
            .build()
            .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let values = RandomInitializer::new().initialize(&model, &Context::new(), &mut rng);
            let size = values[0].as_selection().unwrap().len();
            assert!((2..=3).contains(&size), "size {}", size);
            assert!(model.variables()[0].validate(values[0].clone()).is_ok());
        }
    }

    #[test]
    fn test_context_and_constants_kept() {
        let model = ModelBuilder::new("R")
            .constant("k", "fixed")
            .nominal("n", [1, 2, 3])
            .build()
            .unwrap();
        let context = Context::from(model.fixed("n", 2).unwrap());
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..20 {
            let values = RandomInitializer::new().initialize(&model, &context, &mut rng);
            assert_eq!(values, vec![Value::from("fixed"), Value::Int(2)]);
        }
    }
}
