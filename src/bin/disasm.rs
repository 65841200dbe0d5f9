//! Compiles one of a handful of built-in example programs and prints its
//! disassembly and final result.
//!
//! There's no lexer/parser in this crate (an external front end is assumed
//! to hand us an [`monkey_bytecode::ast::Program`]), so this binary stands in
//! for a REPL by building the AST for each example directly in Rust.

use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use monkey_bytecode::ast::{BlockStatement, Expression, LetStatement, Program, Statement};
use monkey_bytecode::compiler::Compiler;
use monkey_bytecode::vm::Vm;
use monkey_bytecode::Value;

/// Disassemble and run a built-in example program.
#[derive(Parser, Debug)]
#[command(name = "disasm")]
#[command(about = "Compile and run a built-in Monkey bytecode example", long_about = None)]
struct Args {
    /// Which example program to run.
    #[arg(value_enum, default_value_t = Example::Arithmetic)]
    example: Example,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Example {
    /// `1 + 2 * 3`
    Arithmetic,
    /// `if (1 > 2) { 10 } else { 20 }`
    Conditional,
    /// `let a = 1; let b = 2; a + b`
    Globals,
    /// `[1, 2 + 2, 3 * 3]`
    Array,
}

fn int(value: i64) -> Expression {
    Expression::IntegerLiteral(value)
}

fn infix(operator: &str, left: Expression, right: Expression) -> Expression {
    Expression::Infix {
        operator: operator.to_string(),
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn program_for(example: Example) -> Program {
    match example {
        Example::Arithmetic => Program {
            statements: vec![Statement::Expression(infix(
                "+",
                int(1),
                infix("*", int(2), int(3)),
            ))],
        },
        Example::Conditional => Program {
            statements: vec![Statement::Expression(Expression::If {
                condition: Box::new(infix(">", int(1), int(2))),
                consequence: BlockStatement {
                    statements: vec![Statement::Expression(int(10))],
                },
                alternative: Some(BlockStatement {
                    statements: vec![Statement::Expression(int(20))],
                }),
            })],
        },
        Example::Globals => Program {
            statements: vec![
                LetStatement {
                    name: "a".to_string(),
                    value: int(1),
                }
                .into(),
                LetStatement {
                    name: "b".to_string(),
                    value: int(2),
                }
                .into(),
                Statement::Expression(infix(
                    "+",
                    Expression::Identifier("a".to_string()),
                    Expression::Identifier("b".to_string()),
                )),
            ],
        },
        Example::Array => Program {
            statements: vec![Statement::Expression(Expression::Array(vec![
                int(1),
                infix("+", int(2), int(2)),
                infix("*", int(3), int(3)),
            ]))],
        },
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    let program = program_for(args.example);

    let mut compiler = Compiler::new();
    compiler.compile(&program)?;
    let bytecode = compiler.bytecode();

    println!("{}", monkey_bytecode::code::disassemble(&bytecode.instructions)?);

    let mut vm = Vm::new(bytecode);
    vm.run()?;
    match vm.last_popped_stack_elem() {
        Some(value) => println!("=> {value}"),
        None => println!("=> (stack empty)"),
    }

    Ok(())
}
