//! Partial assignments of fixed values.

use std::collections::BTreeMap;

use crate::error::{ComboError, Result};
use crate::model::Model;
use crate::value::Value;
use crate::variable::VariableId;

/// A single validated "variable = value" fact.
///
/// Created through [`Model::fixed`], which resolves the name and checks the
/// value against the variable's domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixedValue {
    pub(crate) variable: VariableId,
    pub(crate) value: Value,
}

impl FixedValue {
    pub fn variable(&self) -> VariableId {
        self.variable
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// A partial assignment that solutions and bandit choices must agree with.
///
/// Later facts for the same variable replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    values: BTreeMap<VariableId, Value>,
}

impl Context {
    /// The empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a context by resolving `(reference, value)` pairs from the root.
    pub fn from_pairs<S, V>(model: &Model, pairs: impl IntoIterator<Item = (S, V)>) -> Result<Self>
    where
        S: AsRef<str>,
        V: Into<Value>,
    {
        let mut context = Self::new();
        for (reference, value) in pairs {
            context.insert(model.fixed(reference.as_ref(), value)?);
        }
        Ok(context)
    }

    pub fn insert(&mut self, fact: FixedValue) {
        self.values.insert(fact.variable, fact.value);
    }

    pub fn with(mut self, fact: FixedValue) -> Self {
        self.insert(fact);
        self
    }

    pub fn get(&self, variable: VariableId) -> Option<&Value> {
        self.values.get(&variable)
    }

    pub fn contains(&self, variable: VariableId) -> bool {
        self.values.contains_key(&variable)
    }

    /// Fixed values in variable id order.
    pub fn iter(&self) -> impl Iterator<Item = (VariableId, &Value)> {
        self.values.iter().map(|(&k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Re-checks every fact against `model`.
    ///
    /// Facts built for one model and used with another are rejected with
    /// `InvalidValue` (or `NotFound` when the id does not exist).
    pub fn validate(&self, model: &Model) -> Result<()> {
        for (&id, value) in &self.values {
            let variable = model.variables().get(id.0).ok_or_else(|| {
                ComboError::NotFound(format!("variable #{}", id.0))
            })?;
            let canonical = variable.validate(value.clone())?;
            if canonical != *value {
                return Err(ComboError::invalid_value(
                    variable.path(),
                    format!("{} is not in canonical domain order", value),
                ));
            }
        }
        Ok(())
    }
}

impl From<FixedValue> for Context {
    fn from(fact: FixedValue) -> Self {
        Context::new().with(fact)
    }
}

impl FromIterator<FixedValue> for Context {
    fn from_iter<I: IntoIterator<Item = FixedValue>>(iter: I) -> Self {
        let mut context = Context::new();
        for fact in iter {
            context.insert(fact);
        }
        context
    }
}

impl Extend<FixedValue> for Context {
    fn extend<I: IntoIterator<Item = FixedValue>>(&mut self, iter: I) {
        for fact in iter {
            self.insert(fact);
        }
    }
}
