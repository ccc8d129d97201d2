use coursegraph_core::ops::tree_ops;
use coursegraph_core::{ItemKind, Store};

pub const COURSE: &str = "course-1";

/// Store with one empty course registered
#[allow(dead_code)]
pub fn store_with_course() -> Store {
    let mut store = Store::new();
    tree_ops::create_course(&mut store, COURSE.to_string(), "Test Course".to_string()).unwrap();
    store
}

/// Create a folder and return its id
#[allow(dead_code)]
pub fn folder(store: &mut Store, name: &str, parent: Option<&str>) -> String {
    tree_ops::create_item(store, COURSE, name.to_string(), parent, ItemKind::Folder)
        .unwrap()
        .id
}

/// Create a leaf referencing `lo-<name>` and return its id
#[allow(dead_code)]
pub fn leaf(store: &mut Store, name: &str, parent: Option<&str>) -> String {
    let kind = ItemKind::leaf(format!("lo-{}", name.to_lowercase().replace(' ', "-")));
    tree_ops::create_item(store, COURSE, name.to_string(), parent, kind)
        .unwrap()
        .id
}

/// Chain of nested folders `depth` levels deep; returns ids from root down
#[allow(dead_code)]
pub fn folder_chain(store: &mut Store, levels: usize) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for level in 0..levels {
        let parent = ids.last().map(String::as_str);
        let id = folder(store, &format!("Level {}", level), parent);
        ids.push(id);
    }
    ids
}

/// Display names of the given item ids, in order
#[allow(dead_code)]
pub fn names(store: &Store, ids: &[&str]) -> Vec<String> {
    ids.iter()
        .map(|id| store.get_item(id).unwrap().name.clone())
        .collect()
}
