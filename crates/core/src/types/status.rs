//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Moderation status of a product comment.
///
/// Comments enter the moderation queue as `Pending` and leave it through one
/// of the three moderation decisions. Any status the server reports that is
/// not one of these deserializes as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Spam,
    #[serde(other)]
    Unknown,
}

impl CommentStatus {
    /// All statuses, in moderation-queue display order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Approved, Self::Rejected, Self::Spam];

    /// Wire name used by the REST API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Spam => "spam",
            Self::Unknown => "unknown",
        }
    }

    /// Persian label for the admin dashboard.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "در انتظار بررسی",
            Self::Approved => "تایید شده",
            Self::Rejected => "رد شده",
            Self::Spam => "اسپم",
            Self::Unknown => "نامشخص",
        }
    }
}

impl std::fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CommentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "spam" => Ok(Self::Spam),
            _ => Err(format!("invalid comment status: {s}")),
        }
    }
}

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Wire name used by the REST API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(format!("invalid sort order: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&CommentStatus::Spam).unwrap(),
            "\"spam\""
        );
        let parsed: CommentStatus = serde_json::from_str("\"rejected\"").unwrap();
        assert_eq!(parsed, CommentStatus::Rejected);
    }

    #[test]
    fn test_unrecognized_status_is_unknown() {
        let parsed: CommentStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(parsed, CommentStatus::Unknown);
        assert!(!CommentStatus::ALL.contains(&parsed));
    }

    #[test]
    fn test_comment_status_from_str_is_case_insensitive() {
        assert_eq!(
            "Approved".parse::<CommentStatus>().unwrap(),
            CommentStatus::Approved
        );
        assert!("archived".parse::<CommentStatus>().is_err());
    }

    #[test]
    fn test_sort_order_default_is_desc() {
        assert_eq!(SortOrder::default(), SortOrder::Desc);
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
    }
}
