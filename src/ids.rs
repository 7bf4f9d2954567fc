// Client-side identifiers: base-36 time stamps and random suffixes

use rand::Rng;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    // Only ASCII digits and letters were pushed
    out.into_iter().map(char::from).collect()
}

pub fn random_base36<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect()
}

// "OF-" + 4 chars, "FL-" + 6 chars, ...
pub fn product_id<R: Rng + ?Sized>(rng: &mut R, prefix: &str, len: usize) -> String {
    format!("{}-{}", prefix, random_base36(rng, len).to_uppercase())
}

// Time token plus a short random tail; the caller rejects collisions within a cart
pub fn cart_id<R: Rng + ?Sized>(rng: &mut R, now_ms: u64) -> String {
    format!("{}{}", to_base36(now_ms), random_base36(rng, 4))
}

pub fn booking_id(now_ms: u64) -> String {
    format!("BK-{}", to_base36(now_ms).to_uppercase())
}
