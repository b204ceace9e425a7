//! Variable type definitions

use crate::error::{ComboError, Result};
use crate::model::ScopeId;
use crate::value::Value;

/// Stable index of a variable in a model's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(pub(crate) usize);

impl VariableId {
    /// Position in [`crate::Model::variables`].
    pub fn index(self) -> usize {
        self.0
    }
}

/// The kind of a decision variable together with its domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableKind {
    /// Either true or false.
    Boolean,
    /// A fixed value that is always present and always selected.
    Constant(Value),
    /// Exactly one element of a non-empty, ordered domain.
    Nominal(Vec<Value>),
    /// A subset of a non-empty domain with `min <= |subset| <= max`.
    MultiSelect {
        domain: Vec<Value>,
        min: usize,
        max: usize,
    },
}

impl VariableKind {
    /// Returns true if the solver chooses a value for this variable.
    pub fn is_searchable(&self) -> bool {
        !matches!(self, VariableKind::Constant(_))
    }

    /// Returns true if the variable is selected in every assignment.
    ///
    /// Constants and nominals always hold a value; a multi-select with a
    /// positive minimum can never be empty.
    pub fn is_always_selected(&self) -> bool {
        match self {
            VariableKind::Boolean => false,
            VariableKind::Constant(_) | VariableKind::Nominal(_) => true,
            VariableKind::MultiSelect { min, .. } => *min > 0,
        }
    }

    /// The value a repair step flips a selected variable to, if any.
    pub fn unselected_value(&self) -> Option<Value> {
        match self {
            VariableKind::Boolean => Some(Value::Bool(false)),
            VariableKind::MultiSelect { min: 0, .. } => Some(Value::Selection(Vec::new())),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            VariableKind::Boolean => "boolean",
            VariableKind::Constant(_) => "constant",
            VariableKind::Nominal(_) => "nominal",
            VariableKind::MultiSelect { .. } => "multi-select",
        }
    }
}

/// A decision variable declared in one scope of a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub(crate) id: VariableId,
    pub(crate) scope: ScopeId,
    pub(crate) name: String,
    pub(crate) path: String,
    pub(crate) kind: VariableKind,
}

impl Variable {
    pub fn id(&self) -> VariableId {
        self.id
    }

    /// Scope that declares the variable.
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// Local name within the declaring scope.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Qualified path from the root, scope names joined with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> &VariableKind {
        &self.kind
    }

    /// Checks `value` against the domain and returns its canonical form.
    ///
    /// Selections are reordered to domain order so that equal subsets
    /// compare equal.
    ///
    /// # Errors
    ///
    /// Returns [`ComboError::InvalidValue`] when the value is outside the domain.
    pub fn validate(&self, value: Value) -> Result<Value> {
        match (&self.kind, value) {
            (VariableKind::Boolean, v @ Value::Bool(_)) => Ok(v),
            (VariableKind::Constant(c), v) => {
                if *c == v {
                    Ok(v)
                } else {
                    Err(ComboError::invalid_value(
                        &self.path,
                        format!("constant can only be {}, got {}", c, v),
                    ))
                }
            }
            (VariableKind::Nominal(domain), v) => {
                if domain.contains(&v) {
                    Ok(v)
                } else {
                    Err(ComboError::invalid_value(
                        &self.path,
                        format!("{} is not in the domain", v),
                    ))
                }
            }
            (VariableKind::MultiSelect { domain, min, max }, Value::Selection(items)) => {
                let mut positions = Vec::with_capacity(items.len());
                for item in &items {
                    let pos = domain.iter().position(|d| d == item).ok_or_else(|| {
                        ComboError::invalid_value(
                            &self.path,
                            format!("{} is not in the domain", item),
                        )
                    })?;
                    if positions.contains(&pos) {
                        return Err(ComboError::invalid_value(
                            &self.path,
                            format!("{} selected more than once", item),
                        ));
                    }
                    positions.push(pos);
                }
                if positions.len() < *min || positions.len() > *max {
                    return Err(ComboError::invalid_value(
                        &self.path,
                        format!(
                            "{} elements selected, allowed {}..={}",
                            positions.len(),
                            min,
                            max
                        ),
                    ));
                }
                positions.sort_unstable();
                Ok(Value::Selection(
                    positions.into_iter().map(|p| domain[p].clone()).collect(),
                ))
            }
            (kind, v) => Err(ComboError::invalid_value(
                &self.path,
                format!("{} variable cannot hold a {} value", kind.type_name(), v.type_name()),
            )),
        }
    }
}
