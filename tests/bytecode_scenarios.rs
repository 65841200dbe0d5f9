//! End-to-end scenarios driving the public API: build an AST, compile it,
//! run it, and check the value left on top of the stack.

use monkey_bytecode::ast::{BlockStatement, Expression, LetStatement, Program, Statement};
use monkey_bytecode::compiler::Compiler;
use monkey_bytecode::vm::Vm;
use monkey_bytecode::Value;

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

fn run(program: Program) -> Value {
    let mut compiler = Compiler::new();
    compiler.compile(&program).expect("compile should succeed");
    let mut vm = Vm::new(compiler.bytecode());
    vm.run().expect("run should succeed");
    vm.last_popped_stack_elem()
        .cloned()
        .expect("an expression statement should leave a value on the stack")
}

#[test]
fn arithmetic_precedence_via_nested_infix() {
    // 1 + 2 * 3 has no operator precedence in the bytecode layer itself —
    // that's a front-end concern — so the AST already encodes `2 * 3` as the
    // inner node.
    let program = Program {
        statements: vec![Statement::Expression(infix(
            "+",
            int(1),
            infix("*", int(2), int(3)),
        ))],
    };
    assert_eq!(run(program).as_integer(), Some(7));
}

#[test]
fn fibonacci_like_global_accumulation() {
    // let a = 0; let b = 1; let c = a + b; c
    let program = Program {
        statements: vec![
            LetStatement {
                name: "a".to_string(),
                value: int(0),
            }
            .into(),
            LetStatement {
                name: "b".to_string(),
                value: int(1),
            }
            .into(),
            LetStatement {
                name: "c".to_string(),
                value: infix(
                    "+",
                    Expression::Identifier("a".to_string()),
                    Expression::Identifier("b".to_string()),
                ),
            }
            .into(),
            Statement::Expression(Expression::Identifier("c".to_string())),
        ],
    };
    assert_eq!(run(program).as_integer(), Some(1));
}

#[test]
fn nested_if_expressions() {
    // if (true) { if (false) { 1 } else { 2 } } else { 3 }
    let inner = Expression::If {
        condition: Box::new(Expression::Boolean(false)),
        consequence: BlockStatement {
            statements: vec![Statement::Expression(int(1))],
        },
        alternative: Some(BlockStatement {
            statements: vec![Statement::Expression(int(2))],
        }),
    };
    let program = Program {
        statements: vec![Statement::Expression(Expression::If {
            condition: Box::new(Expression::Boolean(true)),
            consequence: BlockStatement {
                statements: vec![Statement::Expression(inner)],
            },
            alternative: Some(BlockStatement {
                statements: vec![Statement::Expression(int(3))],
            }),
        })],
    };
    assert_eq!(run(program).as_integer(), Some(2));
}

#[test]
fn array_of_mixed_expressions_and_hash_lookup() {
    let array = Expression::Array(vec![int(1), infix("+", int(1), int(1)), int(3)]);
    let hash = Expression::Hash(vec![(Expression::StringLiteral("len".to_string()), int(3))]);

    let program = Program {
        statements: vec![
            Statement::Expression(array),
            Statement::Expression(hash),
        ],
    };

    let mut compiler = Compiler::new();
    compiler.compile(&program).unwrap();
    let mut vm = Vm::new(compiler.bytecode());
    vm.run().unwrap();

    let hash = vm.last_popped_stack_elem().unwrap();
    let Value::Hash(hash) = hash else {
        panic!("expected a hash value");
    };
    let len = hash
        .get(&Value::String(std::rc::Rc::from("len")))
        .and_then(Value::as_integer);
    assert_eq!(len, Some(3));
}
