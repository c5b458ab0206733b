//! String value generator.

use rand::Rng;
use serde_json::Value;

/// Share of characters drawn from printable ASCII; the rest are arbitrary
/// non-control Unicode scalars.
const PRINTABLE_ASCII_WEIGHT: f64 = 0.8;

/// Generate a string of `0..=max_len` characters.
pub fn generate_text<R: Rng>(rng: &mut R, max_len: usize) -> Value {
    let len = rng.gen_range(0..=max_len);
    let text: String = (0..len).map(|_| random_char(rng)).collect();
    Value::String(text)
}

fn random_char<R: Rng>(rng: &mut R) -> char {
    if rng.gen_bool(PRINTABLE_ASCII_WEIGHT) {
        return rng.gen_range(' '..='~');
    }
    loop {
        let c: char = rng.gen();
        if !c.is_control() {
            return c;
        }
    }
}
