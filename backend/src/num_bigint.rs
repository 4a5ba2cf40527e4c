use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive};

pub trait RoundingDiv {
    /// Returns self / other rounded to the nearest integer, ties away from zero.
    fn div_round(&self, other: &Self) -> Self;

    /// Returns the representative of self mod q in (-q/2, q/2].
    fn center(&self, q: &Self) -> Self;
}

impl RoundingDiv for BigInt {
    fn div_round(&self, other: &Self) -> Self {
        let (quo, rem) = self.div_rem(other);
        let twice_rem: BigInt = rem.abs() << 1usize;
        if twice_rem >= other.abs() {
            if self.sign() == other.sign() {
                return quo + BigInt::one();
            } else {
                return quo - BigInt::one();
            }
        }
        quo
    }

    fn center(&self, q: &Self) -> Self {
        let r: BigInt = self.mod_floor(q);
        if (&r << 1usize) > *q { r - q } else { r }
    }
}

/// Lossy conversion used when leaving the exact domain.
pub fn to_f64(x: &BigInt) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(x: i64) -> BigInt {
        BigInt::from(x)
    }

    #[test]
    fn div_round_nearest() {
        assert_eq!(big(7).div_round(&big(2)), big(4));
        assert_eq!(big(-7).div_round(&big(2)), big(-4));
        assert_eq!(big(5).div_round(&big(3)), big(2));
        assert_eq!(big(4).div_round(&big(3)), big(1));
        assert_eq!(big(-4).div_round(&big(3)), big(-1));
        assert_eq!(big(-5).div_round(&big(3)), big(-2));
        assert_eq!(big(0).div_round(&big(3)), big(0));
    }

    #[test]
    fn center_is_balanced() {
        let q: BigInt = big(10);
        assert_eq!(big(3).center(&q), big(3));
        assert_eq!(big(5).center(&q), big(5));
        assert_eq!(big(6).center(&q), big(-4));
        assert_eq!(big(-1).center(&q), big(-1));
        assert_eq!(big(23).center(&q), big(3));
    }
}
