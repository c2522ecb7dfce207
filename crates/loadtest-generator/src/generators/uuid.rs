//! UUID-based key generators.

use rand::Rng;
use uuid::Uuid;

/// Length of a hyphenated UUID string.
pub const UUID_STRING_LENGTH: u32 = 36;

/// Generate a random UUID v4 using the provided RNG.
pub fn generate_uuid_v4<R: Rng>(rng: &mut R) -> Uuid {
    // Generate 16 random bytes
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);

    // Set version (4) and variant (RFC 4122) bits
    bytes[6] = (bytes[6] & 0x0f) | 0x40; // Version 4
    bytes[8] = (bytes[8] & 0x3f) | 0x80; // Variant RFC 4122

    Uuid::from_bytes(bytes)
}

/// Generate a non-negative 63-bit key that is unique across independent runs.
///
/// Draws from OS randomness rather than the session RNG, so seeded sessions
/// still get fresh keys on every run.
pub fn unique_i64_key() -> i64 {
    (Uuid::new_v4().as_u128() >> 65) as i64
}
