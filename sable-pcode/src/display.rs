use std::fmt;

use crate::{AddrSpace, Op, VarNode};

impl fmt::Display for AddrSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddrSpace::Register => f.write_str("register"),
            AddrSpace::Ram => f.write_str("ram"),
            AddrSpace::Const => f.write_str("const"),
            AddrSpace::Unique => f.write_str("unique"),
        }
    }
}

impl fmt::Display for VarNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.space {
            AddrSpace::Const => write!(f, "const({:#x}):{}", self.offset, self.size),
            space => write!(f, "{}[{:#x}]:{}", space, self.offset, self.size),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Op, VarNode};

    #[test]
    fn varnode_display() {
        assert_eq!(VarNode::reg(0x10, 4).to_string(), "register[0x10]:4");
        assert_eq!(VarNode::ram(0x4000, 8).to_string(), "ram[0x4000]:8");
        assert_eq!(VarNode::constant(7, 2).to_string(), "const(0x7):2");
        assert_eq!(VarNode::unique(0x80, 1).to_string(), "unique[0x80]:1");
    }

    #[test]
    fn op_display_uses_mnemonic() {
        assert_eq!(Op::IntAdd.to_string(), "INT_ADD");
        assert_eq!(Op::FloatIsNan.to_string(), "FLOAT_NAN");
    }
}
