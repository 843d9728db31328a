// AdPulse UTM QA - validates tracking parameters against a marketing taxonomy

pub mod qa;
pub mod taxonomy;

pub use qa::{IssueKind, IssueSeverity, Params, UtmCheckIssue, UtmCheckResult, UtmError, UtmQaAgent};
pub use taxonomy::{AllowedValues, Taxonomy};
