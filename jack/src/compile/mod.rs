//! Code generation.
//!
//! Translates the syntax tree of one class into stack machine instructions.
mod codegen;
mod ir;
mod symbol;

pub use self::{
    codegen::CodeGen,
    ir::{render, ArithOp, Instr, Segment},
    symbol::{StaticCounter, Symbol, SymbolKind, SymbolTable},
};

use crate::{error::SymbolError, parsing::Class};

/// Generate the instructions of one class.
///
/// Static variables are numbered from the given counter, so classes
/// of one program must share it.
pub fn generate(class: &Class, statics: &StaticCounter) -> Result<Vec<Instr>, SymbolError> {
    CodeGen::new(statics.clone()).compile(class)
}
