//! End-to-end tests for the sectioned-array surface: build a small
//! dataset through the public API, inspect the consolidated diff, and
//! replay the patch against the original tree.

use editscript::array2d::{Array2dElement, SectionedArray};
use editscript::op::Op;
use editscript::path::Path;

type Array = SectionedArray<&'static str, i32>;

fn items(array: &Array, section: usize) -> Vec<i32> {
    array
        .tree()
        .node(&Path::from(section))
        .map(|node| {
            node.children()
                .iter()
                .filter_map(|child| child.value.item().copied())
                .collect()
        })
        .unwrap_or_default()
}

fn replay(array: &Array) -> bool {
    let mut replayed = array.original().clone();
    for op in array.patch().unwrap() {
        if replayed.apply(op).is_err() {
            return false;
        }
    }
    &replayed == array.tree()
}

#[test]
fn cross_section_move_lands_in_target() {
    let mut array: Array = SectionedArray::new();
    array.append_section("A").unwrap();
    array.append_item(1, 0).unwrap();
    array.append_item(2, 0).unwrap();
    array.append_section("B").unwrap();
    array.move_item((0, 0), (1, 0)).unwrap();

    assert_eq!(array.section_count(), 2);
    assert_eq!(items(&array, 0), vec![2]);
    assert_eq!(items(&array, 1), vec![1]);
    assert!(replay(&array));
}

#[test]
fn diff_of_fresh_build_is_all_inserts() {
    let mut array: Array = SectionedArray::new();
    array.append_section("A").unwrap();
    array.append_item(1, 0).unwrap();
    array.append_item(2, 0).unwrap();

    let diff = array.diff().unwrap();
    assert!(diff.deletes.is_empty());
    assert!(diff.survivors.is_empty());
    assert_eq!(
        diff.inserts,
        vec![Path::from(0), Path::from((0, 0)), Path::from((0, 1))]
    );
}

#[test]
fn moving_an_item_into_its_own_section_reorders() {
    let mut array: Array = SectionedArray::new();
    array.append_section("A").unwrap();
    for value in 1..=4 {
        array.append_item(value, 0).unwrap();
    }
    array.move_item((0, 0), (0, 2)).unwrap();

    assert_eq!(items(&array, 0), vec![2, 3, 1, 4]);
    assert!(replay(&array));
}

#[test]
fn section_delete_takes_items_along() {
    let mut base: Array = SectionedArray::new();
    base.append_section("A").unwrap();
    base.append_item(1, 0).unwrap();
    base.append_section("B").unwrap();
    base.append_item(2, 1).unwrap();
    let mut array = Array::from_tree(base.tree().clone());

    array.remove_section(0).unwrap();

    let diff = array.diff().unwrap();
    assert_eq!(diff.deletes, vec![Path::from(0), Path::from((0, 0))]);

    // A single subtree delete replays the whole removal.
    let patch = array.patch().unwrap();
    assert_eq!(patch, vec![Op::Delete { at: Path::from(0) }]);
    assert!(replay(&array));
}

#[test]
fn escaping_a_deleted_section_survives_as_insert() {
    let mut base: Array = SectionedArray::new();
    base.append_section("A").unwrap();
    base.append_item(1, 0).unwrap();
    base.append_section("B").unwrap();
    let mut array = Array::from_tree(base.tree().clone());

    array.move_item((0, 0), (1, 0)).unwrap();
    array.remove_section(0).unwrap();

    assert_eq!(array.section_count(), 1);
    assert_eq!(items(&array, 0), vec![1]);
    assert!(replay(&array));
}

#[test]
fn clearing_items_keeps_sections_in_patch() {
    let mut base: Array = SectionedArray::new();
    base.append_section("A").unwrap();
    base.append_item(1, 0).unwrap();
    base.append_item(2, 0).unwrap();
    base.append_section("B").unwrap();
    base.append_item(3, 1).unwrap();
    let mut array = Array::from_tree(base.tree().clone());

    array.remove_all_items().unwrap();

    let patch = array.patch().unwrap();
    // Items only, deepest first within the descending order.
    assert_eq!(
        patch,
        vec![
            Op::Delete { at: Path::from((1, 0)) },
            Op::Delete { at: Path::from((0, 1)) },
            Op::Delete { at: Path::from((0, 0)) },
        ]
    );
    assert!(replay(&array));
    assert_eq!(array.section(0), Some(&"A"));
    assert_eq!(array.section(1), Some(&"B"));
}

#[test]
fn clearing_everything_is_all_section_deletes() {
    let mut base: Array = SectionedArray::new();
    base.append_section("A").unwrap();
    base.append_item(1, 0).unwrap();
    base.append_section("B").unwrap();
    let mut array = Array::from_tree(base.tree().clone());

    array.remove_all_items_and_sections().unwrap();

    let patch = array.patch().unwrap();
    assert_eq!(
        patch,
        vec![
            Op::Delete { at: Path::from(1) },
            Op::Delete { at: Path::from(0) },
        ]
    );
    assert!(replay(&array));
    assert!(array.tree().is_empty());
}

#[test]
fn mixed_edit_session_replays() {
    let mut base: Array = SectionedArray::new();
    base.append_section("news").unwrap();
    base.append_item(10, 0).unwrap();
    base.append_item(11, 0).unwrap();
    base.append_section("sports").unwrap();
    base.append_item(20, 1).unwrap();
    let mut array = Array::from_tree(base.tree().clone());

    array.set_section(1, "weather").unwrap();
    array.append_section("arts").unwrap();
    array.move_item((0, 1), (2, 0)).unwrap();
    array.move_section(2, 0).unwrap();
    array.set_item((0, 0), 99).unwrap();
    array.remove_item((1, 0)).unwrap();

    assert_eq!(array.section(0), Some(&"arts"));
    assert_eq!(array.section(1), Some(&"news"));
    assert_eq!(array.section(2), Some(&"weather"));
    assert_eq!(items(&array, 0), vec![99]);
    assert!(items(&array, 1).is_empty());
    assert_eq!(items(&array, 2), vec![20]);
    assert!(replay(&array));
}

#[test]
fn element_shape_is_driven_by_variant() {
    use editscript::tree::TreeValue;
    let section: Array2dElement<&str, i32> = Array2dElement::Section("A");
    let item: Array2dElement<&str, i32> = Array2dElement::Item(1);
    assert!(section.allows_children());
    assert!(!item.allows_children());
}
