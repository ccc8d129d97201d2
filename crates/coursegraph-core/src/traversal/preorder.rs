use crate::model::Item;
use crate::ops::Store;

/// Items of a course in pre-order
///
/// Roots first, each followed by its subtree, siblings ordered by sort order
/// then id.
pub fn preorder_items<'a>(store: &'a Store, course_id: &str) -> Vec<&'a Item> {
    let mut ordered = Vec::new();
    let mut stack: Vec<&str> = store.child_ids(course_id, None);
    stack.reverse();

    while let Some(id) = stack.pop() {
        let Some(item) = store.items.get(id) else {
            continue;
        };
        ordered.push(item);

        let mut children = store.child_ids(course_id, Some(id));
        children.reverse();
        stack.extend(children);
    }

    ordered
}

/// Leaf items of a course in pre-order
pub fn preorder_leaves<'a>(store: &'a Store, course_id: &str) -> Vec<&'a Item> {
    preorder_items(store, course_id)
        .into_iter()
        .filter(|i| i.is_leaf())
        .collect()
}
