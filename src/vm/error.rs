//! Runtime (post-compilation) errors.

use thiserror::Error;

use crate::code::InvalidOpcode;

/// Errors that can occur while a [`super::Vm`] executes a bytecode program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    #[error("stack overflow: exceeded {max} slots")]
    StackOverflow { max: usize },

    #[error("stack underflow: popped an empty stack")]
    StackUnderflow,

    #[error("unsupported operand types for binary operator: {left} {operator} {right}")]
    InvalidOperandTypes {
        operator: &'static str,
        left: &'static str,
        right: &'static str,
    },

    #[error("strings only support the `+` operator, got {operator}")]
    UnsupportedStringOperator { operator: &'static str },

    #[error("invalid operand for unary `{operator}`: {operand}")]
    InvalidOperand {
        operator: &'static str,
        operand: &'static str,
    },

    #[error("cannot compare values of type {left} and {right}")]
    TypeMismatch {
        left: &'static str,
        right: &'static str,
    },

    #[error("unusable as hash key: {kind}")]
    UnusableHashKey { kind: &'static str },

    #[error("division by zero")]
    DivisionByZero,

    #[error("invalid instruction: {0}")]
    InvalidInstruction(#[from] InvalidOpcode),
}
