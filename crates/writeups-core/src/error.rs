use std::fmt;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    StateLoadFailed,
    StateWriteFailed,
    CatalogFetchFailed,
    CatalogCacheWriteFailed,
    ImportInvalid,
    ItemNotFound,
    AmbiguousKey,
    InvalidEnumValue,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::StateLoadFailed => "E1001",
            Self::StateWriteFailed => "E1002",
            Self::CatalogFetchFailed => "E2001",
            Self::CatalogCacheWriteFailed => "E2002",
            Self::ImportInvalid => "E3001",
            Self::ItemNotFound => "E4001",
            Self::AmbiguousKey => "E4002",
            Self::InvalidEnumValue => "E4003",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::StateLoadFailed => "User state could not be read",
            Self::StateWriteFailed => "User state could not be written",
            Self::CatalogFetchFailed => "Catalog source unreachable",
            Self::CatalogCacheWriteFailed => "Catalog cache write failed",
            Self::ImportInvalid => "Import file is not valid user state JSON",
            Self::ItemNotFound => "No write-up matches that key",
            Self::AmbiguousKey => "Key matches more than one write-up",
            Self::InvalidEnumValue => "Invalid sort/date-field value",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::StateLoadFailed => Some("Check permissions on the data directory."),
            Self::StateWriteFailed => Some("Check disk space and write permissions."),
            Self::CatalogFetchFailed => {
                Some("Check network connectivity and the catalog URL; the local cache is kept.")
            }
            Self::CatalogCacheWriteFailed => Some("Check disk space and write permissions."),
            Self::ImportInvalid => {
                Some("Import expects a JSON export produced by `wu export`; nothing was merged.")
            }
            Self::ItemNotFound => Some("Run `wu list` to find write-up keys and titles."),
            Self::AmbiguousKey => Some("Use a longer title fragment or the full URL."),
            Self::InvalidEnumValue => Some("Use one of the documented sort/date-field values."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::StateLoadFailed,
            ErrorCode::StateWriteFailed,
            ErrorCode::CatalogFetchFailed,
            ErrorCode::CatalogCacheWriteFailed,
            ErrorCode::ImportInvalid,
            ErrorCode::ItemNotFound,
            ErrorCode::AmbiguousKey,
            ErrorCode::InvalidEnumValue,
            ErrorCode::InternalUnexpected,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::ImportInvalid.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }
}
