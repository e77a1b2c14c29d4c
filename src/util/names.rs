//! Workspace name generation

use rand::Rng;

/// Alphabet random workspace names are drawn from
const NAME_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Default length of a generated workspace name
pub const DEFAULT_NAME_LENGTH: usize = 6;

/// Generate a random alphanumeric workspace name of `length` characters
///
/// Uniqueness among a window's workspaces is left to the caller.
pub fn generate_workspace_name(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| NAME_ALPHABET[rng.random_range(0..NAME_ALPHABET.len())] as char)
        .collect()
}
