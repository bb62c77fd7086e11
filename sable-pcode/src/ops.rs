/// P-code operations, following the fixed enumeration used by Ghidra-family
/// decompilers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Copy,
    Cast,

    IntZext,
    IntSext,
    /// Twos-complement (arithmetic) negation.
    Int2Comp,
    /// Bitwise NOT.
    IntNegate,
    Popcount,
    LzCount,

    IntAdd,
    IntSub,
    IntMul,
    IntDiv,
    IntSignedDiv,
    IntRem,
    IntSignedRem,

    IntAnd,
    IntOr,
    IntXor,
    IntLeft,
    IntRight,
    IntSignedRight,

    IntEqual,
    IntNotEqual,
    IntLess,
    IntSignedLess,
    IntLessEqual,
    IntSignedLessEqual,
    IntCarry,
    IntSignedCarry,
    IntSignedBorrow,

    BoolNegate,
    BoolAnd,
    BoolOr,
    BoolXor,

    FloatAdd,
    FloatSub,
    FloatMul,
    FloatDiv,

    FloatNegate,
    FloatAbs,
    FloatSqrt,
    FloatCeil,
    FloatFloor,
    FloatRound,
    FloatIsNan,

    FloatEqual,
    FloatNotEqual,
    FloatLess,
    FloatLessEqual,

    /// Signed integer to float.
    IntToFloat,
    FloatToFloat,
    /// Float to signed integer, truncating.
    FloatToInt,

    Branch,
    CBranch,
    BranchInd,
    Call,
    CallInd,
    /// User-defined operation. Operand 0 indexes the arch's user-op table.
    CallOther,
    Return,

    Load,
    Store,

    Piece,
    Subpiece,

    PtrAdd,
    PtrSub,

    MultiEqual,
    Indirect,
    New,
    CPoolRef,
}

impl Op {
    /// Whether this op takes a variable number of operands rather than a
    /// fixed arity.
    pub fn is_variadic(&self) -> bool {
        matches!(self, Op::MultiEqual | Op::CPoolRef)
    }

    pub fn is_float(&self) -> bool {
        matches!(
            self,
            Op::FloatAdd
                | Op::FloatSub
                | Op::FloatMul
                | Op::FloatDiv
                | Op::FloatNegate
                | Op::FloatAbs
                | Op::FloatSqrt
                | Op::FloatCeil
                | Op::FloatFloor
                | Op::FloatRound
                | Op::FloatIsNan
                | Op::FloatEqual
                | Op::FloatNotEqual
                | Op::FloatLess
                | Op::FloatLessEqual
                | Op::IntToFloat
                | Op::FloatToFloat
                | Op::FloatToInt
        )
    }

    /// The Ghidra spelling of the operation, used in diagnostics.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Op::Copy => "COPY",
            Op::Cast => "CAST",
            Op::IntZext => "INT_ZEXT",
            Op::IntSext => "INT_SEXT",
            Op::Int2Comp => "INT_2COMP",
            Op::IntNegate => "INT_NEGATE",
            Op::Popcount => "POPCOUNT",
            Op::LzCount => "LZCOUNT",
            Op::IntAdd => "INT_ADD",
            Op::IntSub => "INT_SUB",
            Op::IntMul => "INT_MULT",
            Op::IntDiv => "INT_DIV",
            Op::IntSignedDiv => "INT_SDIV",
            Op::IntRem => "INT_REM",
            Op::IntSignedRem => "INT_SREM",
            Op::IntAnd => "INT_AND",
            Op::IntOr => "INT_OR",
            Op::IntXor => "INT_XOR",
            Op::IntLeft => "INT_LEFT",
            Op::IntRight => "INT_RIGHT",
            Op::IntSignedRight => "INT_SRIGHT",
            Op::IntEqual => "INT_EQUAL",
            Op::IntNotEqual => "INT_NOTEQUAL",
            Op::IntLess => "INT_LESS",
            Op::IntSignedLess => "INT_SLESS",
            Op::IntLessEqual => "INT_LESSEQUAL",
            Op::IntSignedLessEqual => "INT_SLESSEQUAL",
            Op::IntCarry => "INT_CARRY",
            Op::IntSignedCarry => "INT_SCARRY",
            Op::IntSignedBorrow => "INT_SBORROW",
            Op::BoolNegate => "BOOL_NEGATE",
            Op::BoolAnd => "BOOL_AND",
            Op::BoolOr => "BOOL_OR",
            Op::BoolXor => "BOOL_XOR",
            Op::FloatAdd => "FLOAT_ADD",
            Op::FloatSub => "FLOAT_SUB",
            Op::FloatMul => "FLOAT_MULT",
            Op::FloatDiv => "FLOAT_DIV",
            Op::FloatNegate => "FLOAT_NEG",
            Op::FloatAbs => "FLOAT_ABS",
            Op::FloatSqrt => "FLOAT_SQRT",
            Op::FloatCeil => "FLOAT_CEIL",
            Op::FloatFloor => "FLOAT_FLOOR",
            Op::FloatRound => "FLOAT_ROUND",
            Op::FloatIsNan => "FLOAT_NAN",
            Op::FloatEqual => "FLOAT_EQUAL",
            Op::FloatNotEqual => "FLOAT_NOTEQUAL",
            Op::FloatLess => "FLOAT_LESS",
            Op::FloatLessEqual => "FLOAT_LESSEQUAL",
            Op::IntToFloat => "FLOAT_INT2FLOAT",
            Op::FloatToFloat => "FLOAT_FLOAT2FLOAT",
            Op::FloatToInt => "FLOAT_TRUNC",
            Op::Branch => "BRANCH",
            Op::CBranch => "CBRANCH",
            Op::BranchInd => "BRANCHIND",
            Op::Call => "CALL",
            Op::CallInd => "CALLIND",
            Op::CallOther => "CALLOTHER",
            Op::Return => "RETURN",
            Op::Load => "LOAD",
            Op::Store => "STORE",
            Op::Piece => "PIECE",
            Op::Subpiece => "SUBPIECE",
            Op::PtrAdd => "PTRADD",
            Op::PtrSub => "PTRSUB",
            Op::MultiEqual => "MULTIEQUAL",
            Op::Indirect => "INDIRECT",
            Op::New => "NEW",
            Op::CPoolRef => "CPOOLREF",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variadic_ops() {
        assert!(Op::MultiEqual.is_variadic());
        assert!(Op::CPoolRef.is_variadic());
        assert!(!Op::CallOther.is_variadic());
        assert!(!Op::IntAdd.is_variadic());
    }

    #[test]
    fn float_family() {
        assert!(Op::FloatIsNan.is_float());
        assert!(Op::FloatToInt.is_float());
        assert!(!Op::IntAdd.is_float());
        assert!(!Op::BoolXor.is_float());
    }

    #[test]
    fn mnemonics() {
        assert_eq!(Op::Int2Comp.mnemonic(), "INT_2COMP");
        assert_eq!(Op::FloatToInt.mnemonic(), "FLOAT_TRUNC");
        assert_eq!(Op::CallOther.mnemonic(), "CALLOTHER");
    }
}
