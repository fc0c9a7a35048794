//! Property tests for the compare flag engine.
//!
//! Each flag has an independent arithmetic characterisation, checked here
//! against the bit-level update rules.

use armlet::Flags;
use proptest::prelude::*;

fn compared(lhs: u32, rhs: u32) -> Flags {
    let mut f = Flags::default();
    f.compare(lhs, rhs);
    f
}

proptest! {
    #[test]
    fn z_holds_exactly_on_equal_operands(a in any::<u32>(), b in any::<u32>()) {
        prop_assert_eq!(compared(a, b).z, a == b);
    }

    #[test]
    fn n_mirrors_the_sign_bit_of_the_wrapped_difference(a in any::<u32>(), b in any::<u32>()) {
        let diff = a.wrapping_sub(b);
        prop_assert_eq!(compared(a, b).n, (diff as i32) < 0);
    }

    #[test]
    fn c_is_signed_less_than(a in any::<u32>(), b in any::<u32>()) {
        prop_assert_eq!(compared(a, b).c, (a as i32) < (b as i32));
    }

    #[test]
    fn v_holds_exactly_when_the_true_difference_leaves_i32(a in any::<u32>(), b in any::<u32>()) {
        let wide = i64::from(a as i32) - i64::from(b as i32);
        let overflows = wide < i64::from(i32::MIN) || wide > i64::from(i32::MAX);
        prop_assert_eq!(compared(a, b).v, overflows);
    }

    #[test]
    fn n_xor_v_is_signed_less_than(a in any::<u32>(), b in any::<u32>()) {
        // The BLT condition (N != V) must agree with signed comparison even
        // when the subtraction overflowed.
        let f = compared(a, b);
        prop_assert_eq!(f.n != f.v, (a as i32) < (b as i32));
    }
}

#[test]
fn representative_corner_values() {
    for &(a, b) in &[
        (0u32, 0u32),
        (0, 1),
        (1, 0),
        (u32::MAX, 0),
        (0, u32::MAX),
        (i32::MIN as u32, i32::MAX as u32),
        (i32::MAX as u32, i32::MIN as u32),
        (i32::MIN as u32, 1),
    ] {
        let f = compared(a, b);
        assert_eq!(f.z, a == b, "Z for {a:#x} vs {b:#x}");
        assert_eq!(f.c, (a as i32) < (b as i32), "C for {a:#x} vs {b:#x}");
        assert_eq!(f.n != f.v, (a as i32) < (b as i32), "N^V for {a:#x} vs {b:#x}");
    }
}
