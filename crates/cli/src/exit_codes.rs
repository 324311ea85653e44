//! CLI Exit Code Registry
//!
//! Single source of truth for all `kinfill` exit codes. Exit codes are
//! part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                                |
//! |------|--------------------------------------------------------|
//! | 0    | Success (record filled / patch printed)                |
//! | 1    | General error (unspecified)                            |
//! | 2    | Usage error (bad args, handled by clap)                |
//! | 3    | No valid transactions (terminal no-op, nothing filled) |
//! | 4    | Mapping/config error                                   |
//! | 5    | I/O error (unreadable input file)                      |
//! | 10   | Transport error (network, non-2xx, non-JSON body)      |
//! | 11   | Validation error (unusable response shape)             |
//! | 12   | Write-back error (host record update failed)           |

use kinfill_client::SubmitError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Response held no valid transaction lines; nothing was written.
/// Like `diff(1)`'s exit 1, this is an outcome, not a crash.
pub const EXIT_NO_TRANSACTIONS: u8 = 3;

/// Field-mapping TOML failed to parse or validate.
pub const EXIT_CONFIG: u8 = 4;

/// Local file could not be read.
pub const EXIT_IO: u8 = 5;

/// Network failure, non-2xx analyzer status, or non-JSON body.
pub const EXIT_TRANSPORT: u8 = 10;

/// Analyzer response shape was unusable.
pub const EXIT_VALIDATION: u8 = 11;

/// The host record update itself failed.
pub const EXIT_WRITE_BACK: u8 = 12;

/// Map a submission failure to its exit code.
pub fn submit_exit_code(err: &SubmitError) -> u8 {
    match err {
        SubmitError::Transport(_) => EXIT_TRANSPORT,
        SubmitError::Validation(_) => EXIT_VALIDATION,
        SubmitError::WriteBack(_) => EXIT_WRITE_BACK,
    }
}
