use std::fmt;

/// Machine-readable error codes for scripts and the CLI's JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    GuestNotFound,
    InvalidGuestData,
    InvalidDraft,
    IdSpaceExhausted,
    ImportParseError,
    UnsupportedImportFormat,
    StorageWriteFailed,
    LockContention,
    StorageReadFailed,
    TableQueryFailed,
    RemoteRequestFailed,
    RemoteResponseInvalid,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::GuestNotFound => "E2001",
            Self::InvalidGuestData => "E2002",
            Self::InvalidDraft => "E2003",
            Self::IdSpaceExhausted => "E2004",
            Self::ImportParseError => "E3001",
            Self::UnsupportedImportFormat => "E3002",
            Self::StorageWriteFailed => "E5001",
            Self::LockContention => "E5002",
            Self::StorageReadFailed => "E5003",
            Self::TableQueryFailed => "E6001",
            Self::RemoteRequestFailed => "E6002",
            Self::RemoteResponseInvalid => "E6003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Registry not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::GuestNotFound => "Guest not found",
            Self::InvalidGuestData => "Stored guest list failed validation",
            Self::InvalidDraft => "Invalid guest details",
            Self::IdSpaceExhausted => "No guest ids left",
            Self::ImportParseError => "Import file could not be parsed",
            Self::UnsupportedImportFormat => "Unsupported import format",
            Self::StorageWriteFailed => "Guest list write failed",
            Self::LockContention => "Lock contention",
            Self::StorageReadFailed => "Guest list read failed",
            Self::TableQueryFailed => "Guest table query failed",
            Self::RemoteRequestFailed => "Remote request failed",
            Self::RemoteResponseInvalid => "Remote response invalid",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `vows init` to initialize this registry."),
            Self::ConfigParseError => Some("Fix syntax in .vows/config.toml and retry."),
            Self::GuestNotFound => Some("Run `vows list` to see current guest ids."),
            Self::InvalidGuestData => {
                Some("The saved list was ignored; the next change overwrites it.")
            }
            Self::InvalidDraft => Some("Provide a non-empty guest name."),
            Self::IdSpaceExhausted => {
                Some("Remove the guest with the largest id, then add again.")
            }
            Self::ImportParseError => Some("Check the file is a CSV file or an Excel workbook."),
            Self::UnsupportedImportFormat => Some("Save the sheet as .csv, .xlsx or .xls and import that file."),
            Self::StorageWriteFailed => Some("Check disk space and write permissions."),
            Self::LockContention => Some("Retry after the other `vows` process finishes."),
            Self::StorageReadFailed => Some("Check read permissions on the .vows directory."),
            Self::TableQueryFailed => Some("Check the sqlite path in .vows/config.toml."),
            Self::RemoteRequestFailed => {
                Some("Check the remote url and api key, then re-run the command.")
            }
            Self::RemoteResponseInvalid => Some("Verify the remote table columns match."),
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

    const ALL: [ErrorCode; 14] = [
        ErrorCode::NotInitialized,
        ErrorCode::ConfigParseError,
        ErrorCode::GuestNotFound,
        ErrorCode::InvalidGuestData,
        ErrorCode::InvalidDraft,
        ErrorCode::IdSpaceExhausted,
        ErrorCode::ImportParseError,
        ErrorCode::UnsupportedImportFormat,
        ErrorCode::StorageWriteFailed,
        ErrorCode::LockContention,
        ErrorCode::StorageReadFailed,
        ErrorCode::TableQueryFailed,
        ErrorCode::RemoteRequestFailed,
        ErrorCode::RemoteResponseInvalid,
    ];

    #[test]
    fn all_codes_are_unique() {
        let mut seen = HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        for code in ALL {
            let text = code.code();
            assert_eq!(text.len(), 5);
            assert!(text.starts_with('E'));
            assert!(text.chars().skip(1).all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn display_matches_code() {
        assert_eq!(ErrorCode::GuestNotFound.to_string(), "E2001");
    }
}
