pub mod compile;
pub mod compiler;
pub mod constants;
mod error;
pub mod lex;
pub mod parsing;
pub mod token_stream;
pub mod tokens;

pub use self::{
    compile::render,
    compiler::compile,
    error::{JackError, JackResult, LexError, ParseError, SymbolError},
    lex::tokenize,
    parsing::parse,
};

pub mod prelude {
    pub use super::{
        compile::{render, Instr, StaticCounter},
        compiler::{Compiler, CompilerConf},
        error::{JackError, JackResult},
    };
}
