//! Bytecode compiler and stack virtual machine for a small dynamically-typed
//! expression language (the "Monkey" family).
//!
//! This crate covers only the back end: an [`ast`] tree arrives already
//! parsed from some external lexer/parser, [`compiler::Compiler`] lowers it
//! into a flat instruction stream plus a constants pool, and [`vm::Vm`]
//! executes that stream against an operand stack and a globals table.
//!
//! ```
//! use monkey_bytecode::ast::{Expression, Program, Statement};
//! use monkey_bytecode::compiler::Compiler;
//! use monkey_bytecode::vm::Vm;
//! use monkey_bytecode::Value;
//!
//! let program = Program {
//!     statements: vec![Statement::Expression(Expression::Infix {
//!         operator: "+".to_string(),
//!         left: Box::new(Expression::IntegerLiteral(1)),
//!         right: Box::new(Expression::IntegerLiteral(2)),
//!     })],
//! };
//!
//! let mut compiler = Compiler::new();
//! compiler.compile(&program).unwrap();
//!
//! let mut vm = Vm::new(compiler.bytecode());
//! vm.run().unwrap();
//! assert_eq!(vm.last_popped_stack_elem().and_then(Value::as_integer), Some(3));
//! ```

pub mod ast;
pub mod code;
pub mod compiler;
pub mod symbol_table;
pub mod value;
pub mod vm;

pub use compiler::Compiler;
pub use value::Value;
pub use vm::Vm;
