use itertools::Itertools;
use std::fmt;

/// Instruction of the target stack machine.
///
/// Each instruction renders as one line of VM code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instr {
    /// `push segment index`
    Push(Segment, u16),
    /// `pop segment index`
    Pop(Segment, u16),
    /// Arithmetic and logical operators on the top of the stack.
    Arith(ArithOp),
    /// `call Class.name argc`
    Call { name: String, args: u16 },
    /// `function Class.name nlocals`
    Function { name: String, locals: u16 },
    Return,
    Label(String),
    Goto(String),
    /// Pops the top of the stack and jumps when it is not zero.
    IfGoto(String),
}

/// Outputs instruction as VM code.
impl fmt::Display for Instr {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Instr::Push(segment, index)      => write!(f, "push {} {}", segment, index),
            Instr::Pop(segment, index)       => write!(f, "pop {} {}", segment, index),
            Instr::Arith(op)                 => write!(f, "{}", op),
            Instr::Call { name, args }       => write!(f, "call {} {}", name, args),
            Instr::Function { name, locals } => write!(f, "function {} {}", name, locals),
            Instr::Return                    => write!(f, "return"),
            Instr::Label(label)              => write!(f, "label {}", label),
            Instr::Goto(label)               => write!(f, "goto {}", label),
            Instr::IfGoto(label)             => write!(f, "if-goto {}", label),
        }
    }
}

/// Memory segments of the stack machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Subroutine local variables.
    Local,
    /// Subroutine arguments.
    Argument,
    /// Class level variables, shared by all files of a program.
    Static,
    /// Fields of the object pointed to by `pointer 0`.
    This,
    /// Array element pointed to by `pointer 1`.
    That,
    /// `0` is the base of `this`, `1` is the base of `that`.
    Pointer,
    /// General purpose scratch registers.
    Temp,
    /// Pseudo segment, pushing index `n` pushes the value `n`.
    Constant,
}

impl fmt::Display for Segment {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Segment::Local    => write!(f, "local"),
            Segment::Argument => write!(f, "argument"),
            Segment::Static   => write!(f, "static"),
            Segment::This     => write!(f, "this"),
            Segment::That     => write!(f, "that"),
            Segment::Pointer  => write!(f, "pointer"),
            Segment::Temp     => write!(f, "temp"),
            Segment::Constant => write!(f, "constant"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Neg,
    And,
    Or,
    Not,
    Eq,
    Gt,
    Lt,
}

impl fmt::Display for ArithOp {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ArithOp::Add => write!(f, "add"),
            ArithOp::Sub => write!(f, "sub"),
            ArithOp::Neg => write!(f, "neg"),
            ArithOp::And => write!(f, "and"),
            ArithOp::Or  => write!(f, "or"),
            ArithOp::Not => write!(f, "not"),
            ArithOp::Eq  => write!(f, "eq"),
            ArithOp::Gt  => write!(f, "gt"),
            ArithOp::Lt  => write!(f, "lt"),
        }
    }
}

/// Render instructions as VM code, one newline terminated line each.
pub fn render(code: &[Instr]) -> String {
    if code.is_empty() {
        return String::new();
    }
    let mut text = code.iter().join("\n");
    text.push('\n');
    text
}
