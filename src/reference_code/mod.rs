//! Reference code generation for anonymous responses.
//!
//! Reporters never authenticate; the reference code is the only token that
//! lets them look up a submission later. Codes are drawn from an alphabet
//! with the visually confusable characters removed (O, I, 0, 1) so they can
//! be read over the phone or copied from paper without ambiguity.
//!
//! Uniqueness is not guaranteed by construction. Callers must verify a
//! candidate against existing records; [`generate_unique_code`] wraps that
//! check in a bounded retry loop.

use rand::seq::SliceRandom;
use thiserror::Error;

/// Draw alphabet: A-Z and 2-9 minus O, I, 0, 1. 32 symbols per position,
/// so 32^12 possible codes for the 3x4 format.
pub const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Number of character groups in a code.
pub const GROUP_COUNT: usize = 3;

/// Characters per group.
pub const GROUP_LEN: usize = 4;

/// Separator between groups.
pub const SEPARATOR: char = '-';

/// Retry budget for [`generate_unique_code`].
pub const MAX_ATTEMPTS: usize = 10;

/// Reference code generation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodeGenerationError {
    /// No unique code was found within the retry budget.
    #[error("failed to generate a unique reference code after {attempts} attempts")]
    Exhausted { attempts: usize },
}

fn random_group() -> String {
    let mut rng = rand::thread_rng();
    (0..GROUP_LEN)
        .map(|_| {
            // ALPHABET is a non-empty const, choose cannot fail
            *ALPHABET.choose(&mut rng).unwrap_or(&b'A') as char
        })
        .collect()
}

/// Generate a reference code in `XXXX-XXXX-XXXX` format.
///
/// Collision probability under uniform random choice is negligible for the
/// expected volume, but the result must still be checked for uniqueness
/// before it is accepted.
pub fn generate_code() -> String {
    let groups: Vec<String> = (0..GROUP_COUNT).map(|_| random_group()).collect();
    groups.join(&SEPARATOR.to_string())
}

/// Generate a reference code with a UTC date prefix: `YYMMDD-XXXX-XXXX`.
pub fn generate_timestamped_code() -> String {
    let prefix = chrono::Utc::now().format("%y%m%d").to_string();
    let mut parts = vec![prefix];
    parts.extend((0..GROUP_COUNT - 1).map(|_| random_group()));
    parts.join(&SEPARATOR.to_string())
}

/// Generate a code that the supplied existence check does not know.
///
/// Draws a candidate, asks `exists` whether it is taken, and accepts on the
/// first miss. Gives up after [`MAX_ATTEMPTS`] draws so a pathological
/// existence check (or a near-full keyspace) surfaces as a diagnosable
/// error instead of an unbounded search.
pub fn generate_unique_code<F>(mut exists: F) -> Result<String, CodeGenerationError>
where
    F: FnMut(&str) -> bool,
{
    for _ in 0..MAX_ATTEMPTS {
        let code = generate_code();
        if !exists(&code) {
            return Ok(code);
        }
    }
    Err(CodeGenerationError::Exhausted {
        attempts: MAX_ATTEMPTS,
    })
}

/// Structural validation of a reference code.
///
/// Checks shape only: exactly three groups separated by `-`, each exactly
/// four ASCII-alphanumeric characters. Does not verify that the code
/// exists; used for early rejection of malformed lookup requests.
pub fn validate_format(code: &str) -> bool {
    if code.is_empty() {
        return false;
    }

    let parts: Vec<&str> = code.split(SEPARATOR).collect();
    if parts.len() != GROUP_COUNT {
        return false;
    }

    parts
        .iter()
        .all(|part| part.len() == GROUP_LEN && part.chars().all(|c| c.is_ascii_alphanumeric()))
}
