//! Immutable model tree stored as a flat arena.
//!
//! Scopes, variables and constraints are addressed by stable integer ids.
//! Variables are numbered in depth-first pre-order, so the variables of a
//! scope's whole subtree form one contiguous id range. Name and path
//! indexes are built once by [`ModelBuilder::build`].
//!
//! # Name resolution
//!
//! - `"x"`: unqualified; matches every variable named `x` in the subtree.
//!   Exactly one match resolves, none is `NotFound`, several are
//!   `AmbiguousName`.
//! - `"child/x"`: qualified path relative to the scope.
//! - `"/x"`: the variable `x` declared directly in the scope.

mod builder;

use std::collections::HashMap;
use std::ops::Range;

use crate::constraint::{Constraint, ConstraintId};
use crate::context::FixedValue;
use crate::error::{ComboError, Result};
use crate::value::Value;
use crate::variable::{Variable, VariableId};

pub use builder::ModelBuilder;

/// Separator between scope names in qualified paths.
pub const PATH_SEPARATOR: char = '/';

/// Stable index of a scope (model node) in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub(crate) usize);

impl ScopeId {
    /// The root scope of every model.
    pub const ROOT: ScopeId = ScopeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// One node of the model tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeNode {
    pub(crate) id: ScopeId,
    pub(crate) name: String,
    pub(crate) path: String,
    pub(crate) parent: Option<ScopeId>,
    pub(crate) children: Vec<ScopeId>,
    pub(crate) variables: Vec<VariableId>,
    pub(crate) constraints: Vec<ConstraintId>,
    pub(crate) subtree: Range<usize>,
}

impl ScopeNode {
    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Qualified path of the scope; empty for the root.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Child scopes in declaration order.
    pub fn children(&self) -> &[ScopeId] {
        &self.children
    }

    /// Variables declared directly in this scope.
    pub fn variables(&self) -> &[VariableId] {
        &self.variables
    }

    /// Constraints declared directly in this scope.
    pub fn constraints(&self) -> &[ConstraintId] {
        &self.constraints
    }

    /// Returns true if `variable` is declared in this scope or below it.
    pub fn contains(&self, variable: VariableId) -> bool {
        self.subtree.contains(&variable.0)
    }

    /// Ids of all variables in this scope's subtree.
    pub fn subtree_variables(&self) -> impl Iterator<Item = VariableId> {
        self.subtree.clone().map(VariableId)
    }
}

/// A finished, validated and immutable model.
///
/// # Example
///
/// ```
/// use comboforge_core::{ModelBuilder, ComboError};
///
/// let model = ModelBuilder::new("Root")
///     .boolean("enabled")
///     .nominal("size", [1, 2, 3])
///     .child(ModelBuilder::new("Child").boolean("enabled"))
///     .build()
///     .unwrap();
///
/// assert_eq!(model.resolve("size").unwrap().index(), 1);
/// assert!(matches!(model.resolve("enabled"), Err(ComboError::AmbiguousName { .. })));
/// assert!(model.resolve("Child/enabled").is_ok());
/// assert!(model.resolve("/enabled").is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Model {
    scopes: Vec<ScopeNode>,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    by_name: HashMap<String, Vec<VariableId>>,
    by_path: HashMap<String, VariableId>,
    constraints_by_variable: Vec<Vec<ConstraintId>>,
}

impl Model {
    /// Name of the root scope.
    pub fn name(&self) -> &str {
        &self.scopes[0].name
    }

    pub fn root(&self) -> &ScopeNode {
        &self.scopes[0]
    }

    pub fn scope(&self, id: ScopeId) -> &ScopeNode {
        &self.scopes[id.0]
    }

    /// All scopes in depth-first pre-order, root first.
    pub fn scopes(&self) -> &[ScopeNode] {
        &self.scopes
    }

    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.0]
    }

    /// All variables at every depth, in depth-first pre-order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Variables of `scope` and every scope below it.
    pub fn variables_in(&self, scope: ScopeId) -> &[Variable] {
        &self.variables[self.scopes[scope.0].subtree.clone()]
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn constraint(&self, id: ConstraintId) -> &Constraint {
        &self.constraints[id.0]
    }

    /// All constraints at every depth.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Constraints that reference `variable`.
    pub fn constraints_on(&self, variable: VariableId) -> &[ConstraintId] {
        &self.constraints_by_variable[variable.0]
    }

    /// Resolves a variable reference from the root scope.
    pub fn resolve(&self, reference: &str) -> Result<VariableId> {
        self.resolve_in(ScopeId::ROOT, reference)
    }

    /// Resolves a variable reference relative to `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`ComboError::NotFound`] when nothing matches and
    /// [`ComboError::AmbiguousName`] when an unqualified name matches more
    /// than one variable in the subtree.
    pub fn resolve_in(&self, scope: ScopeId, reference: &str) -> Result<VariableId> {
        let node = self.scope(scope);
        if let Some(relative) = reference.strip_prefix(PATH_SEPARATOR) {
            return self.resolve_path(node, relative, reference);
        }
        if reference.contains(PATH_SEPARATOR) {
            return self.resolve_path(node, reference, reference);
        }

        let matches: Vec<VariableId> = self
            .by_name
            .get(reference)
            .map(|ids| ids.iter().copied().filter(|&v| node.contains(v)).collect())
            .unwrap_or_default();

        match matches.as_slice() {
            [] => Err(ComboError::NotFound(self.describe(node, reference))),
            [single] => Ok(*single),
            many => Err(ComboError::AmbiguousName {
                name: reference.to_string(),
                candidates: many
                    .iter()
                    .map(|&v| self.variable(v).path.clone())
                    .collect(),
            }),
        }
    }

    fn resolve_path(&self, node: &ScopeNode, relative: &str, reference: &str) -> Result<VariableId> {
        let full = if node.path.is_empty() {
            relative.to_string()
        } else {
            format!("{}{}{}", node.path, PATH_SEPARATOR, relative)
        };
        self.by_path
            .get(&full)
            .copied()
            .ok_or_else(|| ComboError::NotFound(self.describe(node, reference)))
    }

    fn describe(&self, node: &ScopeNode, reference: &str) -> String {
        format!("variable '{}' in scope '{}'", reference, node.name)
    }

    /// Looks up a direct child of `scope` by name.
    pub fn child(&self, scope: ScopeId, name: &str) -> Result<ScopeId> {
        let node = self.scope(scope);
        node.children
            .iter()
            .copied()
            .find(|&c| self.scopes[c.0].name == name)
            .ok_or_else(|| {
                ComboError::NotFound(format!("child scope '{}' of '{}'", name, node.name))
            })
    }

    /// Builds a validated "variable = value" fact, resolved from the root.
    ///
    /// # Errors
    ///
    /// Resolution errors as in [`Model::resolve`], or
    /// [`ComboError::InvalidValue`] if the value is outside the domain.
    pub fn fixed(&self, reference: &str, value: impl Into<Value>) -> Result<FixedValue> {
        self.fixed_in(ScopeId::ROOT, reference, value)
    }

    /// Like [`Model::fixed`], resolving relative to `scope`.
    pub fn fixed_in(
        &self,
        scope: ScopeId,
        reference: &str,
        value: impl Into<Value>,
    ) -> Result<FixedValue> {
        let id = self.resolve_in(scope, reference)?;
        let value = self.variable(id).validate(value.into())?;
        Ok(FixedValue {
            variable: id,
            value,
        })
    }
}
