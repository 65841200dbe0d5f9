//! Bytecode compilation errors.

use thiserror::Error;

/// Errors that can occur during bytecode compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("undefined variable {name}")]
    UndefinedVariable { name: String },

    #[error("unknown operator {operator}")]
    UnknownOperator { operator: String },

    /// A jump target, constant index, or global slot would exceed the
    /// 2-byte operand width the core encoding allows (see `AMBIENT STACK`
    /// in `SPEC_FULL.md`).
    #[error("program too large: {what} exceeds the 2-byte operand limit (65535)")]
    ProgramTooLarge { what: &'static str },
}
