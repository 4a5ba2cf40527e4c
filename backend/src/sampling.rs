use num_bigint::{BigInt, Sign};
use rand_core::RngCore;
use sampling::source::Source;

/// Samples uniformly in `[0, modulus)` by rejection on masked random bytes.
pub fn uniform_below(modulus: &BigInt, source: &mut Source) -> BigInt {
    debug_assert!(modulus.sign() == Sign::Plus, "modulus must be positive");
    let bits: u64 = modulus.bits();
    let bytes: usize = bits.div_ceil(8) as usize;
    let mask: u8 = 0xFF >> ((bytes as u64) * 8 - bits);
    let mut buf: Vec<u8> = vec![0u8; bytes];
    loop {
        source.fill_bytes(&mut buf);
        if let Some(last) = buf.last_mut() {
            *last &= mask;
        }
        let x: BigInt = BigInt::from_bytes_le(Sign::Plus, &buf);
        if x < *modulus {
            return x;
        }
    }
}

/// Fills a vector of `n` values uniform in `[0, modulus)`.
pub fn uniform_vec(n: usize, modulus: &BigInt, source: &mut Source) -> Vec<BigInt> {
    (0..n).map(|_| uniform_below(modulus, source)).collect()
}
