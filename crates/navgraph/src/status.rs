//! Status codes reported by path queries

/// Outcome attached to a returned path.
///
/// A query that finds no path returns `None` instead of a failing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum PathStatus {
    /// A complete path from the start polygon to the end polygon was found
    #[default]
    Success,
}

impl PathStatus {
    /// Checks if the status is a success
    pub fn is_success(&self) -> bool {
        matches!(self, PathStatus::Success)
    }

    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            PathStatus::Success => "SUCCESS",
        }
    }
}

impl std::fmt::Display for PathStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(PathStatus::Success.to_string(), "SUCCESS");
        assert!(PathStatus::default().is_success());
    }

    #[cfg(feature = "serialization")]
    #[test]
    fn test_wire_name() {
        let json = serde_json::to_string(&PathStatus::Success).unwrap();
        assert_eq!(json, "\"SUCCESS\"");
    }
}
