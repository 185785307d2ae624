//! Constant values of the Jack language and its target VM.

/// Largest integer constant the language accepts.
///
/// Integer constants are unsigned and the VM's words are 16-bit two's
/// complement, so only the positive half of the range can be written
/// as a literal.
pub const MAX_INT_CONSTANT: u16 = 0x7FFF; // 32767

/// Default ceiling on parser recursion, counted in nested
/// expressions, terms and statement blocks.
pub const DEFAULT_MAX_DEPTH: usize = 256;

pub const SOURCE_FILE_EXTENSION: &str = "jack";
pub const OUTPUT_FILE_EXTENSION: &str = "vm";

/// Operating system routines the generated code calls into.
pub mod os {
    pub const MEMORY_ALLOC: &str = "Memory.alloc";
    pub const MATH_MULTIPLY: &str = "Math.multiply";
    pub const MATH_DIVIDE: &str = "Math.divide";
    pub const STRING_NEW: &str = "String.new";
    pub const STRING_APPEND_CHAR: &str = "String.appendChar";
}

/// Version of this compiler implementation.
pub const IMPL_VERSION: &str = env!("CARGO_PKG_VERSION");
