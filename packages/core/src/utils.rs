// ABOUTME: Shared utility functions for Intake
// ABOUTME: ID generation for conversation turns

use rand::Rng;

const CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Generate a short random turn identifier (12 alphanumeric characters)
pub fn generate_turn_id() -> String {
    let mut rng = rand::thread_rng();
    (0..12)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
