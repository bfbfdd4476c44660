// Timeline identifier generation

use rand::Rng;

/// Length of generated timeline identifiers
pub const TIMELINE_ID_LEN: usize = 8;

/// URL-safe alphabet, so ids can be used directly as path segments
const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Generate a fresh random timeline identifier
pub fn generate_timeline_id() -> String {
    let mut rng = rand::thread_rng();
    (0..TIMELINE_ID_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
