//! Immutable assignments of values to model variables.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::context::Context;
use crate::error::{ComboError, Result};
use crate::model::{Model, ScopeId, ScopeNode, PATH_SEPARATOR};
use crate::value::{FromValue, Value};
use crate::variable::{VariableId, VariableKind};

/// Values for the variables of a model, viewed from one scope.
///
/// The value array is shared: [`Assignment::sub_assignment`] returns a view
/// of the same data rooted at a child scope, so name lookups inside the
/// child resolve exactly as qualified lookups from the parent do.
///
/// Equality and hashing use the scope and the values only.
#[derive(Clone)]
pub struct Assignment {
    model: Arc<Model>,
    scope: ScopeId,
    values: Arc<[Option<Value>]>,
}

impl Assignment {
    /// Creates a root assignment from one slot per variable.
    ///
    /// Constants with no value are filled in; every present value is checked
    /// against its domain and stored in canonical form.
    ///
    /// # Errors
    ///
    /// [`ComboError::InvalidValue`] for a wrong slot count or a value outside
    /// its domain.
    pub fn new(model: Arc<Model>, values: Vec<Option<Value>>) -> Result<Self> {
        if values.len() != model.variable_count() {
            return Err(ComboError::InvalidValue {
                name: model.name().to_string(),
                reason: format!(
                    "expected {} values, got {}",
                    model.variable_count(),
                    values.len()
                ),
            });
        }
        let mut checked = Vec::with_capacity(values.len());
        for (variable, value) in model.variables().iter().zip(values) {
            let value = match (value, variable.kind()) {
                (Some(v), _) => Some(variable.validate(v)?),
                (None, VariableKind::Constant(c)) => Some(c.clone()),
                (None, _) => None,
            };
            checked.push(value);
        }
        Ok(Self {
            model,
            scope: ScopeId::ROOT,
            values: checked.into(),
        })
    }

    /// Builds an assignment from full paths, as produced by
    /// [`Assignment::to_map`] on a root assignment.
    ///
    /// Keys are always read as paths from the root, so a root variable
    /// named like a nested one is never ambiguous.
    pub fn from_map(model: Arc<Model>, map: &BTreeMap<String, Value>) -> Result<Self> {
        let mut values = vec![None; model.variable_count()];
        for (path, value) in map {
            let anchored = format!("{}{}", PATH_SEPARATOR, path);
            let fixed = model.fixed(&anchored, value.clone())?;
            values[fixed.variable().index()] = Some(fixed.value().clone());
        }
        Self::new(model, values)
    }

    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    fn node(&self) -> &ScopeNode {
        self.model.scope(self.scope)
    }

    /// The value of a variable by id, regardless of the view's scope.
    pub fn value(&self, variable: VariableId) -> Option<&Value> {
        self.values.get(variable.index()).and_then(Option::as_ref)
    }

    /// Every slot of the underlying root assignment.
    pub fn values(&self) -> &[Option<Value>] {
        &self.values
    }

    /// Whether the variable counts toward AtMost constraints.
    ///
    /// Constants always count; other variables count when their value is
    /// selected.
    pub fn is_selected(&self, variable: VariableId) -> bool {
        match self.model.variable(variable).kind() {
            VariableKind::Constant(_) => true,
            _ => self.value(variable).is_some_and(Value::is_selected),
        }
    }

    /// Resolves `name` relative to this view and returns its value.
    ///
    /// # Errors
    ///
    /// `NotFound` when the name does not resolve or the variable has no
    /// value; `AmbiguousName` when an unqualified name matches several.
    pub fn get(&self, name: &str) -> Result<&Value> {
        let id = self.model.resolve_in(self.scope, name)?;
        self.value(id).ok_or_else(|| {
            ComboError::NotFound(format!(
                "value for '{}'",
                self.model.variable(id).path()
            ))
        })
    }

    /// Resolves `name` and converts its value to `T`.
    pub fn get_as<T: FromValue>(&self, name: &str) -> Result<T> {
        let value = self.get(name)?;
        T::from_value(name, value)
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        let value = self.get(name)?;
        value.as_bool().ok_or_else(|| mismatch(name, "bool", value))
    }

    pub fn get_int(&self, name: &str) -> Result<i64> {
        let value = self.get(name)?;
        value.as_int().ok_or_else(|| mismatch(name, "int", value))
    }

    pub fn get_text(&self, name: &str) -> Result<&str> {
        let value = self.get(name)?;
        value.as_text().ok_or_else(|| mismatch(name, "text", value))
    }

    pub fn get_selection(&self, name: &str) -> Result<&[Value]> {
        let value = self.get(name)?;
        value
            .as_selection()
            .ok_or_else(|| mismatch(name, "selection", value))
    }

    /// A view of the same values rooted at the child scope `name`.
    pub fn sub_assignment(&self, name: &str) -> Result<Assignment> {
        let scope = self.model.child(self.scope, name)?;
        Ok(Self {
            model: Arc::clone(&self.model),
            scope,
            values: Arc::clone(&self.values),
        })
    }

    /// Returns true if every variable in this view's subtree has a value.
    pub fn is_complete(&self) -> bool {
        self.node()
            .subtree_variables()
            .all(|v| self.values[v.index()].is_some())
    }

    /// Returns true if every fixed value of `context` is held by this
    /// assignment.
    pub fn satisfies(&self, context: &Context) -> bool {
        context
            .iter()
            .all(|(id, value)| self.value(id) == Some(value))
    }

    /// Returns true if every constraint of the model holds.
    pub fn is_feasible(&self) -> bool {
        self.model
            .constraints()
            .iter()
            .all(|c| c.is_satisfied(|v| self.is_selected(v)))
    }

    /// `(path, value)` pairs for the subtree, paths relative to this view.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        let prefix_len = match self.node().path() {
            "" => 0,
            p => p.len() + PATH_SEPARATOR.len_utf8(),
        };
        self.node().subtree_variables().filter_map(move |id| {
            let path = self.model.variable(id).path();
            self.value(id).map(|v| (&path[prefix_len..], v))
        })
    }

    /// Relative path to value, for the subtree of this view.
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        self.iter()
            .map(|(path, value)| (path.to_string(), value.clone()))
            .collect()
    }
}

fn mismatch(name: &str, expected: &'static str, found: &Value) -> ComboError {
    ComboError::TypeMismatch {
        name: name.to_string(),
        expected,
        found: found.type_name(),
    }
}

impl PartialEq for Assignment {
    fn eq(&self, other: &Self) -> bool {
        self.scope == other.scope && self.values == other.values
    }
}

impl Eq for Assignment {}

impl Hash for Assignment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.scope.hash(state);
        self.values.hash(state);
    }
}

impl fmt::Debug for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assignment")
            .field("model", &self.model.name())
            .field("scope", &self.node().name())
            .field("values", &self.values)
            .finish()
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (path, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", path, value)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests;
