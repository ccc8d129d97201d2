use coursegraph_core::{Command, CommandResult, GraphConfig, ItemKind};
use coursegraph_core_types::RequestContext;
use coursegraph_engine::apply_course_command;
use coursegraph_store::{db, migrations, TenantScope};
use rusqlite::Connection;
use tempfile::TempDir;

pub const COURSE: &str = "course-1";

/// Migrated database file plus the tenant "acme"
#[allow(dead_code)]
pub fn setup() -> (TempDir, Connection, TenantScope) {
    let temp_dir = TempDir::new().unwrap();
    let mut conn = db::open(temp_dir.path().join("engine.db")).unwrap();
    migrations::apply_migrations(&mut conn).unwrap();
    (temp_dir, conn, TenantScope::new("acme").unwrap())
}

/// Run a command without a version guard, panicking on failure
#[allow(dead_code)]
pub fn run(conn: &mut Connection, scope: &TenantScope, cmd: Command) -> CommandResult {
    let config = GraphConfig::default();
    apply_course_command(conn, scope, &config, &RequestContext::new(), cmd, None).unwrap()
}

#[allow(dead_code)]
pub fn create_course(conn: &mut Connection, scope: &TenantScope, course_id: &str) {
    run(
        conn,
        scope,
        Command::CourseCreate {
            course_id: course_id.to_string(),
            title: format!("Course {}", course_id),
        },
    );
}

#[allow(dead_code)]
pub fn create_item(
    conn: &mut Connection,
    scope: &TenantScope,
    course_id: &str,
    name: &str,
    parent: Option<&str>,
    kind: ItemKind,
) -> String {
    match run(
        conn,
        scope,
        Command::ItemCreate {
            course_id: course_id.to_string(),
            name: name.to_string(),
            parent_id: parent.map(str::to_string),
            kind,
        },
    ) {
        CommandResult::ItemCreated(item) => item.id,
        other => panic!("unexpected result {:?}", other),
    }
}

/// Leaf referencing `lo-<name>`
#[allow(dead_code)]
pub fn leaf(
    conn: &mut Connection,
    scope: &TenantScope,
    course_id: &str,
    name: &str,
    parent: Option<&str>,
) -> String {
    let kind = ItemKind::leaf(format!("lo-{}", name.to_lowercase()));
    create_item(conn, scope, course_id, name, parent, kind)
}

#[allow(dead_code)]
pub fn folder(
    conn: &mut Connection,
    scope: &TenantScope,
    course_id: &str,
    name: &str,
    parent: Option<&str>,
) -> String {
    create_item(conn, scope, course_id, name, parent, ItemKind::Folder)
}

/// Folder "Unit" with leaves A, B, C, auto-ordered; returns the leaf ids
#[allow(dead_code)]
pub fn ordered_course(conn: &mut Connection, scope: &TenantScope) -> Vec<String> {
    create_course(conn, scope, COURSE);
    let unit = folder(conn, scope, COURSE, "Unit", None);
    let mut leaves = Vec::new();
    for name in ["A", "B", "C"] {
        leaves.push(leaf(conn, scope, COURSE, name, Some(unit.as_str())));
    }
    run(
        conn,
        scope,
        Command::ChainAutoGenerate {
            course_id: COURSE.to_string(),
        },
    );
    leaves
}
