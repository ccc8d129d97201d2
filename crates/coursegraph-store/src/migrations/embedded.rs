/// Migration metadata
pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

/// All embedded migrations in application order
pub fn get_migrations() -> Vec<Migration> {
    vec![
        Migration {
            id: "001_course_graph",
            sql: include_str!("../../migrations/001_course_graph.sql"),
        },
        Migration {
            id: "002_snapshots",
            sql: include_str!("../../migrations/002_snapshots.sql"),
        },
        Migration {
            id: "003_learning_objects",
            sql: include_str!("../../migrations/003_learning_objects.sql"),
        },
    ]
}
