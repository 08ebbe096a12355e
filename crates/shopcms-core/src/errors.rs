use crate::tree::NodePath;
use shopcms_core_types::{RequestContext, RequestId, TraceId};
use thiserror::Error;

/// Result type alias using CmsError
pub type Result<T> = std::result::Result<T, CmsError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that route handlers can return to
/// the editor and that tests can assert on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Tree validation (collected, non-fatal per node)
    InvalidInput,
    UnknownKind,
    MissingRequiredAttribute,
    InvalidAttribute,
    InvalidChild,
    DuplicateNodeId,

    // Configuration (initialization defects, fatal)
    ValidatorUnbound,
    DuplicateKind,
    AlreadyBound,

    // Document / history
    StalePublish,
    OutOfRange,
    NotFound,
    NothingPublished,

    // Persistence (propagated from the storage collaborator)
    ReadFailed,
    WriteFailed,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::UnknownKind => "ERR_UNKNOWN_KIND",
            ExErrorKind::MissingRequiredAttribute => "ERR_MISSING_REQUIRED_ATTRIBUTE",
            ExErrorKind::InvalidAttribute => "ERR_INVALID_ATTRIBUTE",
            ExErrorKind::InvalidChild => "ERR_INVALID_CHILD",
            ExErrorKind::DuplicateNodeId => "ERR_DUPLICATE_NODE_ID",
            ExErrorKind::ValidatorUnbound => "ERR_VALIDATOR_UNBOUND",
            ExErrorKind::DuplicateKind => "ERR_DUPLICATE_KIND",
            ExErrorKind::AlreadyBound => "ERR_ALREADY_BOUND",
            ExErrorKind::StalePublish => "ERR_STALE_PUBLISH",
            ExErrorKind::OutOfRange => "ERR_OUT_OF_RANGE",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::NothingPublished => "ERR_NOTHING_PUBLISHED",
            ExErrorKind::ReadFailed => "ERR_READ_FAILED",
            ExErrorKind::WriteFailed => "ERR_WRITE_FAILED",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Configuration defects must never be caught and ignored
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ExErrorKind::ValidatorUnbound | ExErrorKind::DuplicateKind | ExErrorKind::AlreadyBound
        )
    }
}

/// Canonical structured error type
///
/// A flattened, classification-first view of a [`CmsError`] for logs and
/// external responses.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    shop_id: Option<String>,
    page_id: Option<String>,
    path: Option<NodePath>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    issues: Option<Vec<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            shop_id: None,
            page_id: None,
            path: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            issues: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    pub fn with_shop_id(mut self, id: impl Into<String>) -> Self {
        self.shop_id = Some(id.into());
        self
    }

    pub fn with_page_id(mut self, id: impl Into<String>) -> Self {
        self.page_id = Some(id.into());
        self
    }

    /// Add the tree position the error refers to
    pub fn with_path(mut self, path: NodePath) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Attach the correlation ids of the call being served
    pub fn with_context(mut self, ctx: &RequestContext) -> Self {
        self.request_id = Some(ctx.request_id.clone());
        self.trace_id = ctx.trace_id.clone();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach the individual issues behind an aggregate validation failure
    pub fn with_issues(mut self, issues: Vec<ExError>) -> Self {
        self.issues = Some(issues);
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn shop_id(&self) -> Option<&str> {
        self.shop_id.as_deref()
    }

    pub fn page_id(&self) -> Option<&str> {
        self.page_id.as_deref()
    }

    pub fn path(&self) -> Option<&NodePath> {
        self.path.as_ref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn issues(&self) -> Option<&[ExError]> {
        self.issues.as_deref()
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
        if let Some(shop_id) = &self.shop_id {
            write!(f, " (shop_id: {})", shop_id)?;
        }
        if let Some(page_id) = &self.page_id {
            write!(f, " (page_id: {})", page_id)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// A single structural problem found while validating a tree
///
/// Validation never stops at the first problem; every issue carries the
/// path of the node it was found on so an editor can highlight all of them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("unknown component kind '{kind}' at {path}")]
    UnknownKind { path: NodePath, kind: String },

    #[error("{kind} at {path} is missing required attribute '{attribute}'")]
    MissingRequiredAttribute {
        path: NodePath,
        kind: String,
        attribute: String,
    },

    #[error("attribute '{attribute}' at {path} must be {expected}")]
    InvalidAttribute {
        path: NodePath,
        attribute: String,
        expected: String,
    },

    #[error("invalid child at {path}: {reason}")]
    InvalidChild { path: NodePath, reason: String },

    #[error("node id '{id}' at {path} is already used at {first}")]
    DuplicateId {
        path: NodePath,
        id: String,
        first: NodePath,
    },
}

impl ValidationError {
    /// Path of the offending node
    pub fn path(&self) -> &NodePath {
        match self {
            ValidationError::UnknownKind { path, .. }
            | ValidationError::MissingRequiredAttribute { path, .. }
            | ValidationError::InvalidAttribute { path, .. }
            | ValidationError::InvalidChild { path, .. }
            | ValidationError::DuplicateId { path, .. } => path,
        }
    }

    pub fn kind(&self) -> ExErrorKind {
        match self {
            ValidationError::UnknownKind { .. } => ExErrorKind::UnknownKind,
            ValidationError::MissingRequiredAttribute { .. } => {
                ExErrorKind::MissingRequiredAttribute
            }
            ValidationError::InvalidAttribute { .. } => ExErrorKind::InvalidAttribute,
            ValidationError::InvalidChild { .. } => ExErrorKind::InvalidChild,
            ValidationError::DuplicateId { .. } => ExErrorKind::DuplicateNodeId,
        }
    }
}

impl From<&ValidationError> for ExError {
    fn from(issue: &ValidationError) -> Self {
        ExError::new(issue.kind())
            .with_op("validate")
            .with_path(issue.path().clone())
            .with_message(issue.to_string())
    }
}

/// Domain error taxonomy for shopcms operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CmsError {
    // ===== Validation =====
    /// One or more structural problems in a submitted tree
    #[error("tree validation failed with {} issue(s)", issues.len())]
    Validation { issues: Vec<ValidationError> },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    // ===== Configuration =====
    /// A children slot was resolved before the catalog was bound
    #[error("tree validator used before the catalog was bound")]
    ValidatorUnbound,

    #[error("component kind registered twice: {kind}")]
    DuplicateKind { kind: String },

    #[error("children slot of {kind} is already bound to a validator")]
    ValidatorAlreadyBound { kind: String },

    // ===== Document / history =====
    /// Caller's view of `updatedAt` no longer matches the stored page
    #[error("page {page_id} changed since it was loaded (expected updatedAt {expected}, found {actual})")]
    StalePublish {
        page_id: String,
        expected: String,
        actual: String,
    },

    #[error("gridCols must be within 1..=24, got {value}")]
    GridColsOutOfRange { value: i64 },

    #[error("node not found: {node_id}")]
    NodeNotFound { node_id: String },

    #[error("page not found: {page_id} (shop {shop_id})")]
    PageNotFound { shop_id: String, page_id: String },

    #[error("page {page_id} has never been published")]
    NothingPublished { page_id: String },

    // ===== Audit trail =====
    #[error("no settings audit entry at or before {timestamp} for shop {shop_id}")]
    RevertTargetNotFound { shop_id: String, timestamp: String },

    #[error("invalid shop id '{shop_id}'")]
    InvalidShopId { shop_id: String },

    // ===== Persistence =====
    #[error("failed to read {target}: {reason}")]
    ReadFailed { target: String, reason: String },

    #[error("failed to write {target}: {reason}")]
    WriteFailed { target: String, reason: String },

    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

impl CmsError {
    pub fn kind(&self) -> ExErrorKind {
        match self {
            CmsError::Validation { .. } | CmsError::InvalidInput { .. } => {
                ExErrorKind::InvalidInput
            }
            CmsError::InvalidShopId { .. } => ExErrorKind::InvalidInput,
            CmsError::ValidatorUnbound => ExErrorKind::ValidatorUnbound,
            CmsError::DuplicateKind { .. } => ExErrorKind::DuplicateKind,
            CmsError::ValidatorAlreadyBound { .. } => ExErrorKind::AlreadyBound,
            CmsError::StalePublish { .. } => ExErrorKind::StalePublish,
            CmsError::GridColsOutOfRange { .. } => ExErrorKind::OutOfRange,
            CmsError::NodeNotFound { .. }
            | CmsError::PageNotFound { .. }
            | CmsError::RevertTargetNotFound { .. } => ExErrorKind::NotFound,
            CmsError::NothingPublished { .. } => ExErrorKind::NothingPublished,
            CmsError::ReadFailed { .. } => ExErrorKind::ReadFailed,
            CmsError::WriteFailed { .. } => ExErrorKind::WriteFailed,
            CmsError::Serialization { .. } => ExErrorKind::Serialization,
        }
    }

    /// Issues carried by a validation failure (empty for other errors)
    pub fn issues(&self) -> &[ValidationError] {
        match self {
            CmsError::Validation { issues } => issues,
            _ => &[],
        }
    }
}

impl From<CmsError> for ExError {
    fn from(err: CmsError) -> Self {
        let base = ExError::new(err.kind()).with_message(err.to_string());
        match err {
            CmsError::Validation { issues } => {
                base.with_issues(issues.iter().map(ExError::from).collect())
            }
            CmsError::StalePublish { page_id, .. } | CmsError::NothingPublished { page_id } => {
                base.with_page_id(page_id)
            }
            CmsError::PageNotFound { shop_id, page_id } => {
                base.with_shop_id(shop_id).with_page_id(page_id)
            }
            CmsError::RevertTargetNotFound { shop_id, .. }
            | CmsError::InvalidShopId { shop_id } => base.with_shop_id(shop_id),
            _ => base,
        }
    }
}

impl From<serde_json::Error> for CmsError {
    fn from(err: serde_json::Error) -> Self {
        CmsError::Serialization {
            reason: err.to_string(),
        }
    }
}
