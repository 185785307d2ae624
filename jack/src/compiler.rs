//! Whole pipeline for one compilation unit.
use crate::{
    compile::{generate, Instr, StaticCounter},
    constants::DEFAULT_MAX_DEPTH,
    error::JackResult,
    lex::tokenize,
    parsing::parse_with,
    tokens::Token,
};

/// Compiler configuration.
#[derive(Debug, Clone)]
pub struct CompilerConf {
    /// Ceiling on nested expressions, terms and statement blocks.
    pub max_depth: usize,
}

impl Default for CompilerConf {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Compiles classes of one program.
///
/// Cloning the compiler shares its static counter, so clones can be
/// handed to worker threads compiling separate files.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    conf: CompilerConf,
    statics: StaticCounter,
}

impl Compiler {
    pub fn new(conf: CompilerConf) -> Self {
        Self::with_statics(conf, StaticCounter::new())
    }

    pub fn with_statics(conf: CompilerConf, statics: StaticCounter) -> Self {
        Self { conf, statics }
    }

    #[inline]
    pub fn statics(&self) -> &StaticCounter {
        &self.statics
    }

    /// Compile the source text of one class.
    ///
    /// The first error of any stage aborts the unit, and no
    /// instructions are returned for it.
    pub fn compile(&self, source: &str) -> JackResult<Vec<Instr>> {
        let tokens = tokenize(source)?;
        self.compile_tokens(&tokens)
    }

    /// Compile an already tokenized class.
    pub fn compile_tokens(&self, tokens: &[Token]) -> JackResult<Vec<Instr>> {
        let class = parse_with(tokens, &self.conf)?;
        let code = generate(&class, &self.statics)?;
        Ok(code)
    }
}

/// Compile one class on its own, with default configuration
/// and static variables numbered from zero.
pub fn compile(source: &str) -> JackResult<Vec<Instr>> {
    Compiler::default().compile(source)
}
