use rand::seq::SliceRandom;
use rand::thread_rng;

/// URL-safe alphabet, 64 symbols so every character carries 6 bits.
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// 10 characters over a 64-symbol alphabet gives 60 bits of entropy, enough
/// to make id collisions negligible without coordination.
pub const ID_LENGTH: usize = 10;

/// Generate a fresh paste id.
pub fn generate_id() -> String {
    let mut rng = thread_rng();
    (0..ID_LENGTH)
        .map(|_| *ALPHABET.choose(&mut rng).unwrap() as char)
        .collect()
}
