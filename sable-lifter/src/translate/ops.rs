//! Static opcode tables and the single-op emitter functions they point at.

use cranelift::prelude::*;
use sable_pcode::Op;

use crate::translate::{resize_int, sized_int};

pub(super) type BinEmitter = fn(&mut FunctionBuilder, Value, Value) -> Value;
pub(super) type UnEmitter = fn(&mut FunctionBuilder, Value) -> Value;

static INT_BINARY_OPS: &[(Op, BinEmitter)] = &[
    (Op::IntAnd, int_and),
    (Op::IntOr, int_or),
    (Op::IntXor, int_xor),
    (Op::IntLeft, int_left),
    (Op::IntRight, int_right),
    (Op::IntSignedRight, int_signed_right),
    (Op::IntAdd, int_add),
    (Op::IntSub, int_sub),
    (Op::IntMul, int_mul),
    (Op::IntDiv, int_div),
    (Op::IntSignedDiv, int_signed_div),
    (Op::IntRem, int_rem),
    (Op::IntSignedRem, int_signed_rem),
    (Op::IntEqual, int_equal),
    (Op::IntNotEqual, int_not_equal),
    (Op::IntLess, int_less),
    (Op::IntSignedLess, int_signed_less),
    (Op::IntLessEqual, int_less_equal),
    (Op::IntSignedLessEqual, int_signed_less_equal),
    (Op::IntCarry, int_carry),
    (Op::IntSignedCarry, int_signed_carry),
    (Op::IntSignedBorrow, int_signed_borrow),
];

/// Comparison opcodes always produce an 8-bit boolean.
static INT_COMPARISON_OPS: &[Op] = &[
    Op::IntEqual,
    Op::IntNotEqual,
    Op::IntLess,
    Op::IntSignedLess,
    Op::IntLessEqual,
    Op::IntSignedLessEqual,
    Op::IntCarry,
    Op::IntSignedCarry,
    Op::IntSignedBorrow,
];

static BOOL_BINARY_OPS: &[(Op, BinEmitter)] =
    &[(Op::BoolAnd, int_and), (Op::BoolOr, int_or), (Op::BoolXor, int_xor)];

/// Float binary ops; the flag marks ordered comparisons (8-bit result).
static FLOAT_BINARY_OPS: &[(Op, BinEmitter, bool)] = &[
    (Op::FloatEqual, float_equal, true),
    (Op::FloatNotEqual, float_not_equal, true),
    (Op::FloatLess, float_less, true),
    (Op::FloatLessEqual, float_less_equal, true),
    (Op::FloatAdd, float_add, false),
    (Op::FloatSub, float_sub, false),
    (Op::FloatMul, float_mul, false),
    (Op::FloatDiv, float_div, false),
];

static FLOAT_UNARY_OPS: &[(Op, UnEmitter)] = &[
    (Op::FloatNegate, float_negate),
    (Op::FloatAbs, float_abs),
    (Op::FloatSqrt, float_sqrt),
    (Op::FloatCeil, float_ceil),
    (Op::FloatFloor, float_floor),
    (Op::FloatRound, float_round),
];

pub(super) fn int_binary_emitter(op: Op) -> Option<BinEmitter> {
    INT_BINARY_OPS.iter().find(|(key, _)| *key == op).map(|(_, emit)| *emit)
}

pub(super) fn is_int_comparison(op: Op) -> bool {
    INT_COMPARISON_OPS.contains(&op)
}

pub(super) fn bool_binary_emitter(op: Op) -> Option<BinEmitter> {
    BOOL_BINARY_OPS.iter().find(|(key, _)| *key == op).map(|(_, emit)| *emit)
}

pub(super) fn float_binary_emitter(op: Op) -> Option<(BinEmitter, bool)> {
    FLOAT_BINARY_OPS
        .iter()
        .find(|(key, _, _)| *key == op)
        .map(|(_, emit, is_cmp)| (*emit, *is_cmp))
}

pub(super) fn float_unary_emitter(op: Op) -> Option<UnEmitter> {
    FLOAT_UNARY_OPS.iter().find(|(key, _)| *key == op).map(|(_, emit)| *emit)
}

/// Sign-extends `value` from `in_size` to `out_size` bytes. Extension to the
/// same or a smaller width degenerates to a resize.
pub(super) fn sign_extend(
    builder: &mut FunctionBuilder,
    value: Value,
    in_size: u8,
    out_size: u8,
) -> Value {
    let in_ty = sized_int(in_size);
    let out_ty = sized_int(out_size);
    if out_ty.bits() <= in_ty.bits() {
        return resize_int(builder, value, in_size, out_size);
    }
    builder.ins().sextend(out_ty, value)
}

/// Coerces a shift amount to the shifted operand's type, truncating
/// (unsigned) when it is wider.
fn coerce_shift_amount(builder: &mut FunctionBuilder, shifted: Value, amount: Value) -> Value {
    let want = builder.func.dfg.value_type(shifted);
    let have = builder.func.dfg.value_type(amount);
    match have.bits().cmp(&want.bits()) {
        std::cmp::Ordering::Less => builder.ins().uextend(want, amount),
        std::cmp::Ordering::Equal => amount,
        std::cmp::Ordering::Greater => builder.ins().ireduce(want, amount),
    }
}

fn int_add(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    builder.ins().iadd(a, b)
}

fn int_sub(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    builder.ins().isub(a, b)
}

fn int_mul(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    builder.ins().imul(a, b)
}

fn int_div(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    builder.ins().udiv(a, b)
}

fn int_signed_div(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    builder.ins().sdiv(a, b)
}

fn int_rem(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    builder.ins().urem(a, b)
}

fn int_signed_rem(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    builder.ins().srem(a, b)
}

fn int_and(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    builder.ins().band(a, b)
}

fn int_or(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    builder.ins().bor(a, b)
}

fn int_xor(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    builder.ins().bxor(a, b)
}

fn int_left(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    let b = coerce_shift_amount(builder, a, b);
    builder.ins().ishl(a, b)
}

fn int_right(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    let b = coerce_shift_amount(builder, a, b);
    builder.ins().ushr(a, b)
}

fn int_signed_right(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    let b = coerce_shift_amount(builder, a, b);
    builder.ins().sshr(a, b)
}

fn int_equal(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    builder.ins().icmp(IntCC::Equal, a, b)
}

fn int_not_equal(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    builder.ins().icmp(IntCC::NotEqual, a, b)
}

fn int_less(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    builder.ins().icmp(IntCC::UnsignedLessThan, a, b)
}

fn int_signed_less(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    builder.ins().icmp(IntCC::SignedLessThan, a, b)
}

fn int_less_equal(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    builder.ins().icmp(IntCC::UnsignedLessThanOrEqual, a, b)
}

fn int_signed_less_equal(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    builder.ins().icmp(IntCC::SignedLessThanOrEqual, a, b)
}

// Carry out of unsigned addition: the sum wrapped iff it is less than either
// operand.
fn int_carry(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    let sum = builder.ins().iadd(a, b);
    builder.ins().icmp(IntCC::UnsignedLessThan, sum, b)
}

// Overflow of signed addition: the result sign is wrong exactly when
// `result < a` disagrees with `b < 0`.
fn int_signed_carry(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    let sum = builder.ins().iadd(a, b);
    let sum_lt_a = builder.ins().icmp(IntCC::SignedLessThan, sum, a);
    let b_is_neg = builder.ins().icmp_imm(IntCC::SignedLessThan, b, 0);
    builder.ins().bxor(sum_lt_a, b_is_neg)
}

// Overflow of signed subtraction.
fn int_signed_borrow(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    let diff = builder.ins().isub(a, b);
    let diff_gt_a = builder.ins().icmp(IntCC::SignedGreaterThan, diff, a);
    let b_is_neg = builder.ins().icmp_imm(IntCC::SignedLessThan, b, 0);
    builder.ins().bxor(diff_gt_a, b_is_neg)
}

fn float_add(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    builder.ins().fadd(a, b)
}

fn float_sub(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    builder.ins().fsub(a, b)
}

fn float_mul(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    builder.ins().fmul(a, b)
}

fn float_div(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    builder.ins().fdiv(a, b)
}

fn float_equal(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    builder.ins().fcmp(FloatCC::Equal, a, b)
}

fn float_not_equal(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    builder.ins().fcmp(FloatCC::OrderedNotEqual, a, b)
}

fn float_less(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    builder.ins().fcmp(FloatCC::LessThan, a, b)
}

fn float_less_equal(builder: &mut FunctionBuilder, a: Value, b: Value) -> Value {
    builder.ins().fcmp(FloatCC::LessThanOrEqual, a, b)
}

fn float_negate(builder: &mut FunctionBuilder, x: Value) -> Value {
    builder.ins().fneg(x)
}

fn float_abs(builder: &mut FunctionBuilder, x: Value) -> Value {
    builder.ins().fabs(x)
}

fn float_sqrt(builder: &mut FunctionBuilder, x: Value) -> Value {
    builder.ins().sqrt(x)
}

fn float_ceil(builder: &mut FunctionBuilder, x: Value) -> Value {
    builder.ins().ceil(x)
}

fn float_floor(builder: &mut FunctionBuilder, x: Value) -> Value {
    builder.ins().floor(x)
}

fn float_round(builder: &mut FunctionBuilder, x: Value) -> Value {
    builder.ins().nearest(x)
}

#[cfg(test)]
mod tests {
    use sable_pcode::Op;

    use super::*;

    #[test]
    fn comparison_set_matches_the_binary_table() {
        for op in INT_COMPARISON_OPS {
            assert!(int_binary_emitter(*op).is_some(), "{op} missing from the binary table");
        }
    }

    #[test]
    fn families_do_not_overlap() {
        for (op, _) in INT_BINARY_OPS {
            assert!(bool_binary_emitter(*op).is_none());
            assert!(float_binary_emitter(*op).is_none());
        }
        for (op, _, _) in FLOAT_BINARY_OPS {
            assert!(int_binary_emitter(*op).is_none());
        }
    }

    #[test]
    fn float_unary_table_covers_the_intrinsic_ops() {
        for op in [Op::FloatNegate, Op::FloatAbs, Op::FloatSqrt, Op::FloatCeil, Op::FloatFloor, Op::FloatRound] {
            assert!(float_unary_emitter(op).is_some());
        }
        assert!(float_unary_emitter(Op::FloatIsNan).is_none());
    }
}
