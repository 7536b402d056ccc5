//! The fixed storage keys.
//!
//! Every persisted blob lives under one of these keys as a whole JSON
//! document. There is no partial update and no schema versioning: a change
//! to a persisted shape silently invalidates old rows, which callers must
//! tolerate by treating unparseable values as absent.

/// The most recently generated training plan (markdown + parsed weeks).
pub const TRAINING_PLAN: &str = "training_plan";

/// Append-only list of plan generation records.
pub const PLAN_HISTORY: &str = "plan_history";

/// Metadata for documents uploaded into the internal catalog.
pub const UPLOADED_DOCUMENTS: &str = "uploaded_documents";

/// Append-only list of evaluation submissions.
pub const EVALUATION_HISTORY: &str = "evaluation_history";
