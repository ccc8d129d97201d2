use coursegraph_core_types::RequestId;
use thiserror::Error;

/// Result type alias using CourseGraphError
pub type Result<T> = std::result::Result<T, CourseGraphError>;

// ========== Error Facility ==========

/// Coarse grouping of error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The edit would break the shape of the tree or chain
    Structural,
    /// The edit names something that does not exist or cannot be referenced
    Reference,
    /// The edit is not allowed in the current state of the graph
    State,
    /// Configuration, persistence and other plumbing failures
    Infrastructure,
}

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used in logs, tests and any outer
/// API surface built on top of this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural
    MaxDepthExceeded,
    CircularReference,
    InvalidParent,
    FolderCannotBeInLearningOrder,

    // Reference
    NotFound,
    TargetItemRequired,
    CannotReferenceSelf,
    DuplicateEdge,
    CourseMismatch,

    // State
    FolderNotEmpty,
    StartPointRequired,
    SnapshotImmutable,
    AlreadyExists,
    Concurrency,

    // Input
    InvalidInput,
    InvalidConfig,

    // Integration
    Io,
    Serialization,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::MaxDepthExceeded => "ERR_MAX_DEPTH_EXCEEDED",
            ExErrorKind::CircularReference => "ERR_CIRCULAR_REFERENCE",
            ExErrorKind::InvalidParent => "ERR_INVALID_PARENT",
            ExErrorKind::FolderCannotBeInLearningOrder => {
                "ERR_FOLDER_CANNOT_BE_IN_LEARNING_ORDER"
            }
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::TargetItemRequired => "ERR_TARGET_ITEM_REQUIRED",
            ExErrorKind::CannotReferenceSelf => "ERR_CANNOT_REFERENCE_SELF",
            ExErrorKind::DuplicateEdge => "ERR_DUPLICATE_EDGE",
            ExErrorKind::CourseMismatch => "ERR_COURSE_MISMATCH",
            ExErrorKind::FolderNotEmpty => "ERR_FOLDER_NOT_EMPTY",
            ExErrorKind::StartPointRequired => "ERR_START_POINT_REQUIRED",
            ExErrorKind::SnapshotImmutable => "ERR_SNAPSHOT_IMMUTABLE",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ExErrorKind::MaxDepthExceeded
            | ExErrorKind::CircularReference
            | ExErrorKind::InvalidParent
            | ExErrorKind::FolderCannotBeInLearningOrder => ErrorCategory::Structural,
            ExErrorKind::NotFound
            | ExErrorKind::TargetItemRequired
            | ExErrorKind::CannotReferenceSelf
            | ExErrorKind::DuplicateEdge
            | ExErrorKind::CourseMismatch => ErrorCategory::Reference,
            ExErrorKind::FolderNotEmpty
            | ExErrorKind::StartPointRequired
            | ExErrorKind::SnapshotImmutable
            | ExErrorKind::AlreadyExists
            | ExErrorKind::Concurrency => ErrorCategory::State,
            ExErrorKind::InvalidInput
            | ExErrorKind::InvalidConfig
            | ExErrorKind::Io
            | ExErrorKind::Serialization
            | ExErrorKind::Persistence
            | ExErrorKind::Internal => ErrorCategory::Infrastructure,
        }
    }
}

/// Canonical structured error type
///
/// Carries a kind for programmatic handling plus optional context for
/// debugging. Store and engine crates use this as their error type.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    course_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            course_id: None,
            request_id: None,
            message: String::new(),
        }
    }

    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn with_course_id(mut self, id: impl Into<String>) -> Self {
        self.course_id = Some(id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn course_id(&self) -> Option<&str> {
        self.course_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(course_id) = &self.course_id {
            write!(f, " (course_id: {})", course_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain errors raised by content tree, learning order and snapshot operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CourseGraphError {
    // ===== Structural =====
    /// Item would sit deeper than the configured maximum depth
    #[error("Depth {depth} exceeds maximum depth {max_depth}")]
    MaxDepthExceeded { depth: u32, max_depth: u32 },

    /// Reparenting or connecting would close a loop
    #[error("Circular reference: linking {item_id} to {target_id} would create a cycle")]
    CircularReference { item_id: String, target_id: String },

    /// Parent is missing, belongs to another course, or is a leaf
    #[error("Invalid parent {parent_id}: {reason}")]
    InvalidParent { parent_id: String, reason: String },

    /// Only leaves take part in the learning order
    #[error("Folder {item_id} cannot be part of the learning order")]
    FolderCannotBeInLearningOrder { item_id: String },

    // ===== Reference =====
    #[error("Item not found: {item_id}")]
    ItemNotFound { item_id: String },

    /// Start edge needs an existing leaf of the course as its target
    #[error("Start of learning order in course {course_id} requires a target leaf: {reason}")]
    TargetItemRequired { course_id: String, reason: String },

    #[error("Item {item_id} cannot reference itself")]
    CannotReferenceSelf { item_id: String },

    /// Item already has an edge on the given side ("outgoing" or "incoming")
    #[error("Item {item_id} already has an {side} edge")]
    DuplicateEdge { item_id: String, side: String },

    /// Two items of different courses were named in one edit
    #[error("Item {item_id} belongs to course {actual_course_id}, expected {expected_course_id}")]
    CourseMismatch {
        item_id: String,
        expected_course_id: String,
        actual_course_id: String,
    },

    // ===== State =====
    #[error("Cannot delete folder {item_id}: has {child_count} children")]
    FolderNotEmpty { item_id: String, child_count: usize },

    /// The chain has no start edge, so there is nothing to traverse
    #[error("No start point defined for {owner_id}")]
    StartPointRequired { owner_id: String },

    /// Snapshot entities are write-once
    #[error("Snapshot entity {entity_id} is immutable")]
    SnapshotImmutable { entity_id: String },

    #[error("Course not found: {course_id}")]
    CourseNotFound { course_id: String },

    #[error("Snapshot not found: {snapshot_id}")]
    SnapshotNotFound { snapshot_id: String },

    #[error("Course already exists: {course_id}")]
    CourseAlreadyExists { course_id: String },

    /// Course changed since the caller last read it
    #[error("Course {course_id} is at version {actual}, expected {expected}")]
    VersionConflict {
        course_id: String,
        expected: u64,
        actual: u64,
    },

    // ===== Input =====
    #[error("Invalid name: {reason}")]
    InvalidName { reason: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Appending a child needs a sort order past `i64::MAX`
    #[error("No sort order left under {parent} in course {course_id}")]
    SortOrderExhausted { course_id: String, parent: String },

    // ===== Generic =====
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<CourseGraphError> for ExError {
    fn from(err: CourseGraphError) -> Self {
        let message = err.to_string();
        match err {
            CourseGraphError::MaxDepthExceeded { .. } => {
                ExError::new(ExErrorKind::MaxDepthExceeded).with_message(message)
            }
            CourseGraphError::CircularReference { item_id, .. } => {
                ExError::new(ExErrorKind::CircularReference)
                    .with_entity_id(item_id)
                    .with_message(message)
            }
            CourseGraphError::InvalidParent { parent_id, .. } => {
                ExError::new(ExErrorKind::InvalidParent)
                    .with_entity_id(parent_id)
                    .with_message(message)
            }
            CourseGraphError::FolderCannotBeInLearningOrder { item_id } => {
                ExError::new(ExErrorKind::FolderCannotBeInLearningOrder)
                    .with_entity_id(item_id)
                    .with_message(message)
            }
            CourseGraphError::ItemNotFound { item_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(item_id)
                .with_message(message),
            CourseGraphError::TargetItemRequired { course_id, .. } => {
                ExError::new(ExErrorKind::TargetItemRequired)
                    .with_course_id(course_id)
                    .with_message(message)
            }
            CourseGraphError::CannotReferenceSelf { item_id } => {
                ExError::new(ExErrorKind::CannotReferenceSelf)
                    .with_entity_id(item_id)
                    .with_message(message)
            }
            CourseGraphError::DuplicateEdge { item_id, .. } => {
                ExError::new(ExErrorKind::DuplicateEdge)
                    .with_entity_id(item_id)
                    .with_message(message)
            }
            CourseGraphError::CourseMismatch {
                item_id,
                expected_course_id,
                ..
            } => ExError::new(ExErrorKind::CourseMismatch)
                .with_entity_id(item_id)
                .with_course_id(expected_course_id)
                .with_message(message),
            CourseGraphError::FolderNotEmpty { item_id, .. } => {
                ExError::new(ExErrorKind::FolderNotEmpty)
                    .with_entity_id(item_id)
                    .with_message(message)
            }
            CourseGraphError::StartPointRequired { owner_id } => {
                ExError::new(ExErrorKind::StartPointRequired)
                    .with_entity_id(owner_id)
                    .with_message(message)
            }
            CourseGraphError::SnapshotImmutable { entity_id } => {
                ExError::new(ExErrorKind::SnapshotImmutable)
                    .with_entity_id(entity_id)
                    .with_message(message)
            }
            CourseGraphError::CourseNotFound { course_id } => ExError::new(ExErrorKind::NotFound)
                .with_course_id(course_id)
                .with_message(message),
            CourseGraphError::SnapshotNotFound { snapshot_id } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_id(snapshot_id)
                    .with_message(message)
            }
            CourseGraphError::CourseAlreadyExists { course_id } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_course_id(course_id)
                    .with_message(message)
            }
            CourseGraphError::VersionConflict { course_id, .. } => {
                ExError::new(ExErrorKind::Concurrency)
                    .with_course_id(course_id)
                    .with_message(message)
            }
            CourseGraphError::InvalidName { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }
            CourseGraphError::InvalidConfig { .. } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(message)
            }
            CourseGraphError::SortOrderExhausted { course_id, .. } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_course_id(course_id)
                    .with_message(message)
            }
            CourseGraphError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
            CourseGraphError::Internal { .. } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for CourseGraphError {
    fn from(err: serde_json::Error) -> Self {
        CourseGraphError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_categories() {
        let cases = [
            (ExErrorKind::MaxDepthExceeded, ErrorCategory::Structural),
            (ExErrorKind::CircularReference, ErrorCategory::Structural),
            (ExErrorKind::DuplicateEdge, ErrorCategory::Reference),
            (ExErrorKind::TargetItemRequired, ErrorCategory::Reference),
            (ExErrorKind::FolderNotEmpty, ErrorCategory::State),
            (ExErrorKind::SnapshotImmutable, ErrorCategory::State),
            (ExErrorKind::Persistence, ErrorCategory::Infrastructure),
        ];
        for (kind, category) in cases {
            assert_eq!(kind.category(), category, "Wrong category for {:?}", kind);
        }
    }

    #[test]
    fn test_domain_error_maps_to_kind_and_context() {
        let ex: ExError = CourseGraphError::FolderNotEmpty {
            item_id: "folder-1".to_string(),
            child_count: 2,
        }
        .into();

        assert_eq!(ex.kind(), ExErrorKind::FolderNotEmpty);
        assert_eq!(ex.code(), "ERR_FOLDER_NOT_EMPTY");
        assert_eq!(ex.entity_id(), Some("folder-1"));
        assert!(ex.message().contains("2 children"));
    }

    #[test]
    fn test_display_includes_code_and_op() {
        let ex = ExError::new(ExErrorKind::Persistence)
            .with_op("sqlite")
            .with_message("disk full");
        assert_eq!(ex.to_string(), "[ERR_PERSISTENCE] in operation 'sqlite': disk full");
    }
}
