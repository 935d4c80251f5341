//! CLI Exit Code Registry
//!
//! Single source of truth for exit codes. Exit codes are part of the shell
//! contract — scripts rely on them.
//!
//! | Code | Meaning                                   |
//! |------|-------------------------------------------|
//! | 0    | Success                                   |
//! | 1    | General error (unspecified)               |
//! | 2    | CLI usage error (bad args)                |
//! | 3    | Project archive unreadable                |
//! | 4    | Dataset missing or unreadable             |
//! | 5    | State store unreadable                    |
//! | 6    | Invalid output format                     |
//! | 7    | Output path not writable                  |

use revstate_extract::ExtractError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options. clap exits with
/// this code on its own for argument parse failures.
#[allow(dead_code)]
pub const EXIT_USAGE: u8 = 2;

/// Project archive cannot be opened or extracted.
pub const EXIT_ARCHIVE: u8 = 3;

/// Configured dataset file absent or unparseable.
pub const EXIT_DATASET: u8 = 4;

/// State store cannot be opened or queried.
pub const EXIT_STATE: u8 = 5;

/// Requested output format not in the accepted set.
pub const EXIT_FORMAT: u8 = 6;

/// Output path not writable.
pub const EXIT_WRITE: u8 = 7;

/// Exit code for an extraction error variant.
pub fn extract_exit_code(err: &ExtractError) -> u8 {
    match err {
        ExtractError::ArchiveUnreadable(_) => EXIT_ARCHIVE,
        ExtractError::DatasetMissing(_) | ExtractError::DatasetUnreadable(_) => EXIT_DATASET,
        ExtractError::StateUnreadable(_) => EXIT_STATE,
        ExtractError::InvalidFormat(_) => EXIT_FORMAT,
        ExtractError::WriteFailure { .. } => EXIT_WRITE,
        ExtractError::Merge(_) => EXIT_ERROR,
    }
}
