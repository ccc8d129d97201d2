use coursegraph_core::ops::{chain_ops, tree_ops};
use coursegraph_core::{ItemKind, Store};
use coursegraph_store::repo::SqliteRepo;
use coursegraph_store::{db, migrations, TenantScope};
use rusqlite::Connection;
use tempfile::TempDir;

pub const COURSE: &str = "course-1";

/// Migrated database in a temp dir; keep the `TempDir` alive for the test
#[allow(dead_code)]
pub fn setup_db() -> (TempDir, Connection) {
    let temp_dir = TempDir::new().unwrap();
    let mut conn = db::open(temp_dir.path().join("test.db")).unwrap();
    migrations::apply_migrations(&mut conn).unwrap();
    (temp_dir, conn)
}

#[allow(dead_code)]
pub fn tenant(name: &str) -> TenantScope {
    TenantScope::new(name).unwrap()
}

/// In-memory course: folder "Basics" holding leaves A, B, C chained A → B → C
///
/// Returns the store and the leaf ids in order.
#[allow(dead_code)]
pub fn sample_course() -> (Store, Vec<String>) {
    let mut store = Store::new();
    tree_ops::create_course(&mut store, COURSE.to_string(), "Sample".to_string()).unwrap();
    let basics =
        tree_ops::create_item(&mut store, COURSE, "Basics".to_string(), None, ItemKind::Folder)
            .unwrap()
            .id;

    let mut leaves = Vec::new();
    for name in ["A", "B", "C"] {
        let kind = ItemKind::leaf(format!("lo-{}", name.to_lowercase()));
        let parent = Some(basics.as_str());
        let id = tree_ops::create_item(&mut store, COURSE, name.to_string(), parent, kind)
            .unwrap()
            .id;
        leaves.push(id);
    }

    chain_ops::set_start(&mut store, COURSE, Some(leaves[0].as_str())).unwrap();
    chain_ops::connect(&mut store, &leaves[0], &leaves[1]).unwrap();
    chain_ops::connect(&mut store, &leaves[1], &leaves[2]).unwrap();

    (store, leaves)
}

/// Register the course row and write the store's graph for it
#[allow(dead_code)]
pub fn save_course(conn: &mut Connection, scope: &TenantScope, store: &Store) {
    let course = store.get_course(COURSE).unwrap().clone();
    if SqliteRepo::get_course(conn, scope, COURSE).unwrap().is_none() {
        SqliteRepo::create_course(conn, scope, &course).unwrap();
    }
    let tx = conn.transaction().unwrap();
    SqliteRepo::replace_course_graph(&tx, scope, store, COURSE).unwrap();
    tx.commit().unwrap();
}
