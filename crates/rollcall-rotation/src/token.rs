//! Rotating token generation.

use rand::Rng;

/// Length of a generated token in hex characters.
pub const TOKEN_LEN: usize = 16;

/// Generates a fresh rotation token: 16 lowercase hex chars, 64 bits
/// of randomness from the thread-local CSPRNG.
///
/// 64 bits is comfortably past the 48-bit floor for "unguessable
/// within one rotation window". The window itself (11 s by default)
/// still permits replaying a *current* frame; binding tokens to the
/// scanner is out of scope.
pub fn next_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; TOKEN_LEN / 2] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
