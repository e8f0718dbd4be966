//! Entry comment domain type, grouping, and validation.
//!
//! Comments are written once and never edited or deleted. The timestamp is
//! formatted by the client at creation time and stored verbatim; the server
//! never interprets it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Maximum length of a comment body in characters.
pub const MAX_COMMENT_LENGTH: usize = 2_000;

/// Format of the client-stamped `posted_at` field.
pub const POSTED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One comment on an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: DbId,
    pub entry_id: DbId,
    pub body: String,
    /// Commenter display name, resolved at creation time.
    pub commenter: String,
    /// Commenter profile id in the external directory.
    pub commenter_id: String,
    /// Client-formatted creation time (see [`POSTED_AT_FORMAT`]).
    pub posted_at: String,
}

/// Render a timestamp the way the client stamps `posted_at`.
pub fn format_posted_at(at: Timestamp) -> String {
    at.format(POSTED_AT_FORMAT).to_string()
}

/// Validate a comment body: non-blank and within the length limit.
pub fn validate_comment_body(body: &str) -> Result<(), String> {
    if body.trim().is_empty() {
        return Err("Comment body cannot be empty".to_string());
    }
    if body.len() > MAX_COMMENT_LENGTH {
        return Err(format!(
            "Comment body exceeds maximum length of {MAX_COMMENT_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Group comments by entry id, preserving the source order within each
/// group (insertion order is chronological as created).
pub fn group_by_entry(comments: Vec<Comment>) -> HashMap<DbId, Vec<Comment>> {
    let mut grouped: HashMap<DbId, Vec<Comment>> = HashMap::new();
    for comment in comments {
        grouped.entry(comment.entry_id).or_default().push(comment);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn comment(id: DbId, entry_id: DbId, body: &str) -> Comment {
        Comment {
            id,
            entry_id,
            body: body.into(),
            commenter: "Jane Smith".into(),
            commenter_id: "u-1".into(),
            posted_at: "2026-03-01 10:00:00".into(),
        }
    }

    // -- validate_comment_body ------------------------------------------------

    #[test]
    fn normal_body_accepted() {
        assert!(validate_comment_body("Needs a citation for the birth year.").is_ok());
    }

    #[test]
    fn empty_body_rejected() {
        let result = validate_comment_body("");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("cannot be empty"));
    }

    #[test]
    fn whitespace_only_body_rejected() {
        assert!(validate_comment_body("   \n\t").is_err());
    }

    #[test]
    fn body_at_limit_accepted() {
        assert!(validate_comment_body(&"a".repeat(MAX_COMMENT_LENGTH)).is_ok());
    }

    #[test]
    fn body_over_limit_rejected() {
        let result = validate_comment_body(&"a".repeat(MAX_COMMENT_LENGTH + 1));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("maximum length"));
    }

    // -- group_by_entry -------------------------------------------------------

    #[test]
    fn groups_preserve_source_order() {
        let grouped = group_by_entry(vec![
            comment(1, 7, "first"),
            comment(2, 9, "other entry"),
            comment(3, 7, "second"),
        ]);
        let bodies: Vec<&str> = grouped[&7].iter().map(|c| c.body.as_str()).collect();
        assert_eq!(bodies, vec!["first", "second"]);
        assert_eq!(grouped[&9].len(), 1);
    }

    #[test]
    fn empty_input_groups_to_empty_map() {
        assert!(group_by_entry(Vec::new()).is_empty());
    }

    // -- format_posted_at -----------------------------------------------------

    #[test]
    fn posted_at_uses_second_precision() {
        let at = chrono::Utc.with_ymd_and_hms(2026, 3, 1, 9, 5, 30).unwrap();
        assert_eq!(format_posted_at(at), "2026-03-01 09:05:30");
    }
}
