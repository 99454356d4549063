//! Random identifier generation for tasks and notes.
//!
//! IDs are short on purpose: three lowercase alphanumeric characters are easy
//! to type and read aloud, and uniqueness is only required within a single
//! store, never globally.

use std::collections::HashSet;

use crate::error::TaskError;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

const SHORT_ID_LEN: usize = 3;

const MAX_UNIQUE_ATTEMPTS: usize = 100;

// Largest multiple of the alphabet size that fits in a byte. Bytes at or
// above this are discarded so the modulo draw stays uniform.
const UNBIASED_LIMIT: u8 = u8::MAX - u8::MAX % (ALPHABET.len() as u8);

/// Generate `length` characters sampled uniformly from the alphabet using the
/// operating system's random source.
pub fn generate(length: usize) -> Result<String, TaskError> {
    let mut id = String::with_capacity(length);
    let mut buf = [0u8; 16];
    while id.len() < length {
        getrandom::fill(&mut buf).map_err(|e| TaskError::id_generation(e))?;
        for &byte in &buf {
            if id.len() == length {
                break;
            }
            if byte < UNBIASED_LIMIT {
                id.push(ALPHABET[(byte % ALPHABET.len() as u8) as usize] as char);
            }
        }
    }
    Ok(id)
}

/// Generate a new three-character task ID.
pub fn generate_short_id() -> Result<String, TaskError> {
    generate(SHORT_ID_LEN)
}

/// Generate a note ID of the form `<task-id>-<suffix>`.
pub fn generate_note_id(task_id: &str) -> Result<String, TaskError> {
    Ok(format!("{}-{}", task_id, generate(SHORT_ID_LEN)?))
}

/// Generate a short ID not present in `existing`.
///
/// Retries up to 100 times, then falls back to a single four-character draw.
/// The fallback is not re-checked against `existing`: with 36^3 combinations
/// the loop only exhausts when the store holds most of the ID space, and the
/// wider draw makes a collision vanishingly unlikely rather than impossible.
pub fn generate_unique(existing: &HashSet<String>) -> Result<String, TaskError> {
    for _ in 0..MAX_UNIQUE_ATTEMPTS {
        let id = generate_short_id()?;
        if !existing.contains(&id) {
            return Ok(id);
        }
    }
    generate(SHORT_ID_LEN + 1)
}
