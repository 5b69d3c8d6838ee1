//! CLI Exit Code Registry
//!
//! Single source of truth for the codes `ouimap` exits with. Scripts that
//! regenerate the tables rely on them.
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success                                                  |
//! | 1    | Fatal error (fetch, I/O, rules, floors, normalization)   |
//! | 2    | Usage error (bad arguments, no subcommand; also clap's)  |
//!
//! Every fatal build failure shares code 1; the message on stderr names the
//! cause.

/// Success - outputs written, or the subcommand completed.
pub const EXIT_SUCCESS: u8 = 0;

/// Fatal error - the run aborted and no outputs were replaced.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, conflicting options, no subcommand.
pub const EXIT_USAGE: u8 = 2;
