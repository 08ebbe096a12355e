//! Canonical schema constants for structured logging and events
//!
//! Every `log_op_*` macro and every error conversion uses these keys so
//! that log consumers can filter on stable field names.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Entity identifiers
pub const FIELD_SHOP_ID: &str = "shop_id";
pub const FIELD_PAGE_ID: &str = "page_id";
pub const FIELD_NODE_ID: &str = "node_id";

// Collection sizes
pub const FIELD_NODE_COUNT: &str = "node_count";
pub const FIELD_ISSUE_COUNT: &str = "issue_count";
pub const FIELD_ENTRY_COUNT: &str = "entry_count";
pub const FIELD_DROPPED_LINES: &str = "dropped_lines";
pub const FIELD_DIFF_KEYS: &str = "diff_keys";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
