//! Placeholder credential check
//!
//! A fixed table of demo accounts. This gates the CLI's mutating commands
//! against typos, it is not a security boundary.

use tracing::debug;

const BUILTIN_CREDENTIALS: &[(&str, &str)] = &[("admin", "admin123"), ("user", "user123")];

/// True if the pair matches one of the built-in accounts
pub fn authenticate(username: &str, password: &str) -> bool {
    let accepted = BUILTIN_CREDENTIALS
        .iter()
        .any(|(user, pass)| *user == username && *pass == password);

    if !accepted {
        debug!(username, "Credentials rejected");
    }
    accepted
}
