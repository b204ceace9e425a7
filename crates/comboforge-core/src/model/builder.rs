//! Validating model builder.

use std::collections::{HashMap, HashSet};

use super::{Model, ScopeId, ScopeNode, PATH_SEPARATOR};
use crate::constraint::{Constraint, ConstraintId};
use crate::error::{ComboError, Result};
use crate::value::Value;
use crate::variable::{Variable, VariableId, VariableKind};

/// Declares one scope of a model, its variables, constraints and children.
///
/// Constraint references are resolved relative to the declaring scope when
/// [`ModelBuilder::build`] runs, using the same rules as
/// [`Model::resolve_in`].
///
/// # Example
///
/// ```
/// use comboforge_core::ModelBuilder;
///
/// let model = ModelBuilder::new("Root")
///     .boolean("boolean variable")
///     .constant("wrapper around constant", 10)
///     .nominal("only one of", [1, 2, 3, 4, 5])
///     .optional_multiple("any number of", ["a", "b", "c"])
///     .at_most(1, ["boolean variable", "any number of"])
///     .child(ModelBuilder::new("Child model").boolean("Child model variable"))
///     .build()
///     .unwrap();
///
/// assert_eq!(model.variable_count(), 5);
/// assert_eq!(model.constraints().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    name: String,
    variables: Vec<(String, VariableKind)>,
    constraints: Vec<(usize, Vec<String>)>,
    children: Vec<ModelBuilder>,
}

struct PendingConstraint {
    scope: ScopeId,
    limit: usize,
    references: Vec<String>,
}

impl ModelBuilder {
    /// Creates a builder for a scope called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            constraints: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Adds a variable of any kind.
    pub fn variable(mut self, name: impl Into<String>, kind: VariableKind) -> Self {
        self.variables.push((name.into(), kind));
        self
    }

    pub fn boolean(self, name: impl Into<String>) -> Self {
        self.variable(name, VariableKind::Boolean)
    }

    pub fn constant(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variable(name, VariableKind::Constant(value.into()))
    }

    /// Adds a mandatory single choice.
    pub fn nominal<V: Into<Value>>(
        self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let domain = values.into_iter().map(Into::into).collect();
        self.variable(name, VariableKind::Nominal(domain))
    }

    /// Adds a subset choice with explicit cardinality bounds.
    pub fn multi_select<V: Into<Value>>(
        self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
        min: usize,
        max: usize,
    ) -> Self {
        let domain = values.into_iter().map(Into::into).collect();
        self.variable(name, VariableKind::MultiSelect { domain, min, max })
    }

    /// Adds a subset choice that may be empty.
    pub fn optional_multiple<V: Into<Value>>(
        self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let domain: Vec<Value> = values.into_iter().map(Into::into).collect();
        let max = domain.len();
        self.variable(name, VariableKind::MultiSelect { domain, min: 0, max })
    }

    /// Adds a subset choice with at least one element selected.
    pub fn multiple<V: Into<Value>>(
        self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let domain: Vec<Value> = values.into_iter().map(Into::into).collect();
        let max = domain.len();
        self.variable(name, VariableKind::MultiSelect { domain, min: 1, max })
    }

    /// Allows at most `limit` of the referenced variables to be selected.
    pub fn at_most<S: Into<String>>(
        mut self,
        limit: usize,
        references: impl IntoIterator<Item = S>,
    ) -> Self {
        self.constraints
            .push((limit, references.into_iter().map(Into::into).collect()));
        self
    }

    /// Nests a sub-model.
    pub fn child(mut self, child: ModelBuilder) -> Self {
        self.children.push(child);
        self
    }

    /// Validates the declarations and freezes them into a [`Model`].
    ///
    /// # Errors
    ///
    /// Returns [`ComboError::InvalidModel`] for duplicate or malformed names,
    /// empty or inconsistent domains, unresolvable constraint references and
    /// limits above the number of referenced variables.
    pub fn build(self) -> Result<Model> {
        let mut model = Model {
            scopes: Vec::new(),
            variables: Vec::new(),
            constraints: Vec::new(),
            by_name: HashMap::new(),
            by_path: HashMap::new(),
            constraints_by_variable: Vec::new(),
        };
        let mut pending = Vec::new();
        flatten(self, None, &mut model, &mut pending)?;

        for variable in &model.variables {
            model
                .by_name
                .entry(variable.name.clone())
                .or_default()
                .push(variable.id);
            model.by_path.insert(variable.path.clone(), variable.id);
        }
        model.constraints_by_variable = vec![Vec::new(); model.variables.len()];

        for p in pending {
            let id = ConstraintId(model.constraints.len());
            let mut variables: Vec<VariableId> = Vec::with_capacity(p.references.len());
            for reference in &p.references {
                let v = model.resolve_in(p.scope, reference).map_err(|e| {
                    ComboError::InvalidModel(format!(
                        "constraint in scope '{}': {}",
                        model.scope(p.scope).name,
                        e
                    ))
                })?;
                if !variables.contains(&v) {
                    variables.push(v);
                }
            }
            if variables.is_empty() {
                return Err(ComboError::InvalidModel(format!(
                    "constraint in scope '{}' references no variables",
                    model.scope(p.scope).name
                )));
            }
            if p.limit > variables.len() {
                return Err(ComboError::InvalidModel(format!(
                    "at-most limit {} exceeds the {} referenced variables",
                    p.limit,
                    variables.len()
                )));
            }
            for &v in &variables {
                model.constraints_by_variable[v.0].push(id);
            }
            model.scopes[p.scope.0].constraints.push(id);
            model.constraints.push(Constraint {
                id,
                scope: p.scope,
                limit: p.limit,
                variables,
            });
        }

        Ok(model)
    }
}

fn flatten(
    builder: ModelBuilder,
    parent: Option<ScopeId>,
    model: &mut Model,
    pending: &mut Vec<PendingConstraint>,
) -> Result<ScopeId> {
    check_name(&builder.name, "scope")?;
    let id = ScopeId(model.scopes.len());
    let path = match parent {
        None => String::new(),
        Some(p) => join(&model.scopes[p.0].path, &builder.name),
    };

    let first = model.variables.len();
    let mut seen = HashSet::new();
    let mut local = Vec::with_capacity(builder.variables.len());
    for (name, kind) in builder.variables {
        check_name(&name, "variable")?;
        if !seen.insert(name.clone()) {
            return Err(ComboError::InvalidModel(format!(
                "duplicate variable '{}' in scope '{}'",
                name, builder.name
            )));
        }
        let var_path = join(&path, &name);
        check_kind(&var_path, &kind)?;
        let var_id = VariableId(model.variables.len());
        model.variables.push(Variable {
            id: var_id,
            scope: id,
            name,
            path: var_path,
            kind,
        });
        local.push(var_id);
    }

    model.scopes.push(ScopeNode {
        id,
        name: builder.name,
        path,
        parent,
        children: Vec::new(),
        variables: local,
        constraints: Vec::new(),
        subtree: first..first,
    });

    for (limit, references) in builder.constraints {
        pending.push(PendingConstraint {
            scope: id,
            limit,
            references,
        });
    }

    let mut child_names = HashSet::new();
    for child in builder.children {
        if !child_names.insert(child.name.clone()) {
            return Err(ComboError::InvalidModel(format!(
                "duplicate child scope '{}' in scope '{}'",
                child.name, model.scopes[id.0].name
            )));
        }
        let child_id = flatten(child, Some(id), model, pending)?;
        model.scopes[id.0].children.push(child_id);
    }

    model.scopes[id.0].subtree = first..model.variables.len();
    Ok(id)
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}{}{}", prefix, PATH_SEPARATOR, name)
    }
}

fn check_name(name: &str, what: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ComboError::InvalidModel(format!("empty {} name", what)));
    }
    if name.contains(PATH_SEPARATOR) {
        return Err(ComboError::InvalidModel(format!(
            "{} name '{}' contains '{}'",
            what, name, PATH_SEPARATOR
        )));
    }
    Ok(())
}

fn check_kind(path: &str, kind: &VariableKind) -> Result<()> {
    let invalid = |reason: String| ComboError::InvalidModel(format!("variable '{}': {}", path, reason));
    match kind {
        VariableKind::Boolean => Ok(()),
        VariableKind::Constant(value) => match value {
            Value::Selection(_) => Err(invalid("constant cannot be a selection".into())),
            _ => Ok(()),
        },
        VariableKind::Nominal(domain) => check_domain(domain).map_err(invalid),
        VariableKind::MultiSelect { domain, min, max } => {
            check_domain(domain).map_err(invalid)?;
            if min > max || *max > domain.len() {
                return Err(invalid(format!(
                    "bounds {}..={} do not fit a domain of {}",
                    min,
                    max,
                    domain.len()
                )));
            }
            Ok(())
        }
    }
}

fn check_domain(domain: &[Value]) -> std::result::Result<(), String> {
    if domain.is_empty() {
        return Err("empty domain".to_string());
    }
    let mut seen = HashSet::new();
    for value in domain {
        if matches!(value, Value::Selection(_)) {
            return Err("domain values cannot be selections".to_string());
        }
        if !seen.insert(value) {
            return Err(format!("duplicate domain value {}", value));
        }
    }
    Ok(())
}
