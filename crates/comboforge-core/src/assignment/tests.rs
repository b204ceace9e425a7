//! Tests for assignments and sub-assignment projections.

use super::*;
use crate::model::ModelBuilder;

fn model() -> Arc<Model> {
    Arc::new(
        ModelBuilder::new("Root")
            .boolean("b")
            .constant("k", 10)
            .nominal("n", ["x", "y"])
            .optional_multiple("m", ["p", "q", "r"])
            .child(
                ModelBuilder::new("Child")
                    .boolean("cb")
                    .child(ModelBuilder::new("Grand").nominal("g", [7, 8])),
            )
            .build()
            .unwrap(),
    )
}

fn sample(model: &Arc<Model>) -> Assignment {
    Assignment::new(
        Arc::clone(model),
        vec![
            Some(Value::Bool(true)),
            None,
            Some(Value::from("y")),
            Some(Value::from(vec!["r", "p"])),
            Some(Value::Bool(false)),
            Some(Value::Int(8)),
        ],
    )
    .unwrap()
}

#[test]
fn test_typed_getters() {
    let model = model();
    let a = sample(&model);
    assert!(a.get_bool("b").unwrap());
    assert_eq!(a.get_int("k").unwrap(), 10);
    assert_eq!(a.get_text("n").unwrap(), "y");
    assert_eq!(
        a.get_selection("m").unwrap(),
        &[Value::from("p"), Value::from("r")]
    );
    assert_eq!(a.get_as::<i32>("g").unwrap(), 8);
    assert_eq!(
        a.get_as::<Vec<String>>("m").unwrap(),
        vec!["p".to_string(), "r".to_string()]
    );
}

#[test]
fn test_type_mismatch() {
    let model = model();
    let a = sample(&model);
    match a.get_int("b") {
        Err(ComboError::TypeMismatch {
            expected, found, ..
        }) => {
            assert_eq!(expected, "int");
            assert_eq!(found, "bool");
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(matches!(
        a.get_as::<bool>("n"),
        Err(ComboError::TypeMismatch { .. })
    ));
}

#[test]
fn test_missing_value_is_not_found() {
    let model = model();
    let a = Assignment::new(Arc::clone(&model), vec![None; 6]).unwrap();
    assert_eq!(a.get_int("k").unwrap(), 10);
    assert!(matches!(a.get("b"), Err(ComboError::NotFound(_))));
    assert!(!a.is_complete());
    assert!(sample(&model).is_complete());
}

#[test]
fn test_projection_consistency() {
    let model = model();
    let a = sample(&model);
    let child = a.sub_assignment("Child").unwrap();
    let grand = child.sub_assignment("Grand").unwrap();

    assert_eq!(child.get("cb").unwrap(), a.get("Child/cb").unwrap());
    assert_eq!(grand.get("g").unwrap(), a.get("Child/Grand/g").unwrap());
    assert_eq!(child.get("Grand/g").unwrap(), a.get("Child/Grand/g").unwrap());
    assert!(child.get("b").is_err());
    assert!(matches!(
        a.sub_assignment("Grand"),
        Err(ComboError::NotFound(_))
    ));
}

#[test]
fn test_sub_assignment_iterates_relative_paths() {
    let model = model();
    let child = sample(&model).sub_assignment("Child").unwrap();
    let map = child.to_map();
    assert_eq!(map.len(), 2);
    assert_eq!(map["cb"], Value::Bool(false));
    assert_eq!(map["Grand/g"], Value::Int(8));
}

#[test]
fn test_invalid_values_rejected() {
    let model = model();
    let mut values = vec![None; 6];
    values[2] = Some(Value::from("z"));
    assert!(matches!(
        Assignment::new(Arc::clone(&model), values),
        Err(ComboError::InvalidValue { .. })
    ));
    assert!(Assignment::new(Arc::clone(&model), vec![None; 2]).is_err());
}

#[test]
fn test_equality_ignores_selection_order() {
    let model = model();
    let a = sample(&model);
    let mut values: Vec<Option<Value>> = a.values().to_vec();
    values[3] = Some(Value::from(vec!["p", "r"]));
    let b = Assignment::new(Arc::clone(&model), values).unwrap();
    assert_eq!(a, b);

    use std::collections::HashSet;
    let set: HashSet<Assignment> = [a.clone(), b].into_iter().collect();
    assert_eq!(set.len(), 1);
    assert_ne!(a, a.sub_assignment("Child").unwrap());
}

#[test]
fn test_map_round_trip_and_satisfies() {
    let model = model();
    let a = sample(&model);
    let restored = Assignment::from_map(Arc::clone(&model), &a.to_map()).unwrap();
    assert_eq!(a, restored);

    let yes = Context::from(model.fixed("n", "y").unwrap());
    let no = Context::from(model.fixed("n", "x").unwrap());
    assert!(a.satisfies(&yes));
    assert!(!a.satisfies(&no));
    assert!(a.satisfies(&Context::new()));
}

#[test]
fn test_display_and_feasibility() {
    let model = Arc::new(
        ModelBuilder::new("R")
            .boolean("a")
            .boolean("b")
            .at_most(1, ["a", "b"])
            .build()
            .unwrap(),
    );
    let both = Assignment::new(
        Arc::clone(&model),
        vec![Some(true.into()), Some(true.into())],
    )
    .unwrap();
    assert!(!both.is_feasible());
    assert_eq!(both.to_string(), "{a=true, b=true}");

    let one = Assignment::new(model, vec![Some(true.into()), Some(false.into())]).unwrap();
    assert!(one.is_feasible());
}

#[test]
fn test_map_round_trip_with_shadowed_names() {
    let model = Arc::new(
        ModelBuilder::new("R")
            .boolean("flag")
            .child(ModelBuilder::new("Inner").boolean("flag"))
            .build()
            .unwrap(),
    );
    let a = Assignment::new(
        Arc::clone(&model),
        vec![Some(false.into()), Some(true.into())],
    )
    .unwrap();
    let map = a.to_map();
    assert_eq!(map.get("flag"), Some(&Value::Bool(false)));
    assert_eq!(map.get("Inner/flag"), Some(&Value::Bool(true)));
    assert_eq!(Assignment::from_map(model, &map).unwrap(), a);
}
