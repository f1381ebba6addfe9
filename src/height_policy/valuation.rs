//! Deterministic height policy.

use crate::height_policy::HeightPolicy;

/// A height policy deriving the height from the key alone.
///
/// The height is the 2-adic valuation of the key: the number of times it can
/// be halved before it becomes odd. A key of zero has height zero. Negative
/// keys behave like their absolute value, so `-8` has height `3`.
///
/// Since the layout of the list becomes a pure function of the inserted keys
/// and their order, this policy is mostly useful for reproducible tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Valuation;

impl HeightPolicy for Valuation {
    #[inline]
    #[expect(clippy::as_conversions, reason = "u32 always fits in usize")]
    fn height(&mut self, key: i64) -> usize {
        if key == 0 {
            0
        } else {
            key.trailing_zeros() as usize
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::Valuation;
    use crate::height_policy::HeightPolicy;

    #[rstest]
    #[case(0, 0)]
    #[case(1, 0)]
    #[case(7, 0)]
    #[case(6, 1)]
    #[case(4, 2)]
    #[case(8, 3)]
    #[case(1024, 10)]
    #[case(96, 5)]
    #[case(-8, 3)]
    #[case(-6, 1)]
    #[case(i64::MIN, 63)]
    #[case(i64::MAX, 0)]
    fn valuation(#[case] key: i64, #[case] expected: usize) {
        assert_eq!(Valuation.height(key), expected);
    }

    #[test]
    fn matches_repeated_halving() {
        for key in -2_048_i64..=2_048 {
            let mut k = key;
            let mut h = 0;
            while k != 0 && k % 2 == 0 {
                k /= 2;
                h += 1;
            }
            assert_eq!(Valuation.height(key), h, "key {key}");
        }
    }
}
