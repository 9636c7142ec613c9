//! CLI Exit Code Registry
//!
//! Every exit code the `orderlens` binary can return. Scripts rely on these,
//! so a code is never reused for a different meaning.
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success                                                  |
//! | 1    | General error (unspecified)                              |
//! | 2    | Usage error (bad args, config file not found)            |
//! | 3    | Config file is not valid TOML or fails validation        |
//! | 4    | A source file could not be read or tokenized             |
//! | 5    | A source file parsed but its content is unusable         |
//! | 6    | Discrepancies beyond tolerance (`--fail-on-discrepancy`) |

use orderlens_io::IngestError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, config file missing.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Reconciliation (3-6)
// =============================================================================

/// Config TOML failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Source file unreadable, not valid text, or structurally broken.
pub const EXIT_INGEST: u8 = 4;

/// Source file missing required columns or without a single valid row.
pub const EXIT_INGEST_VALIDATION: u8 = 5;

/// At least one ASIN exceeds the discrepancy tolerance.
pub const EXIT_DISCREPANCY: u8 = 6;

/// Map an ingestion error to its exit code.
pub fn ingest_exit_code(err: &IngestError) -> u8 {
    match err {
        IngestError::Io { .. } | IngestError::Parse { .. } => EXIT_INGEST,
        IngestError::Validation(_) => EXIT_INGEST_VALIDATION,
        IngestError::Task(_) => EXIT_ERROR,
    }
}
