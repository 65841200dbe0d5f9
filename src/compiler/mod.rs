//! Lowers an [`ast::Program`] into a flat instruction stream plus a
//! constants pool.
//!
//! The compiler is a recursive AST walker. It retains `last_instruction`
//! and `previous_instruction` so it can answer "is the last emitted
//! instruction a `Pop`?" and truncate it in place — the entire reason those
//! two fields exist is to let an if-expression's consequent/alternative
//! block leave its value on the stack instead of discarding it (see
//! `SPEC_FULL.md` §4.3).

mod error;


pub use error::CompileError;

use std::rc::Rc;

use crate::ast::{BlockStatement, Expression, LetStatement, Program, Statement};
use crate::code::{self, Opcode};
use crate::symbol_table::SymbolTable;
use crate::value::Value;

/// The bytecode artifact handed to [`crate::vm::Vm`]: a flat instruction
/// stream and the constants it references by index.
#[derive(Debug, Clone)]
pub struct Bytecode {
    pub instructions: Vec<u8>,
    pub constants: Vec<Value>,
}

#[derive(Debug, Clone, Copy)]
struct EmittedInstruction {
    opcode: Opcode,
    position: usize,
}

pub struct Compiler {
    instructions: Vec<u8>,
    constants: Vec<Value>,
    symbol_table: SymbolTable,
    last_instruction: Option<EmittedInstruction>,
    previous_instruction: Option<EmittedInstruction>,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self::new_with_state(SymbolTable::new(), Vec::new())
    }

    /// Construct a compiler that threads a symbol table and constants pool
    /// carried over from a previous compilation — the shape a REPL uses to
    /// keep `let`-bound names and literals alive across input lines.
    pub fn new_with_state(symbol_table: SymbolTable, constants: Vec<Value>) -> Self {
        Self {
            instructions: Vec::new(),
            constants,
            symbol_table,
            last_instruction: None,
            previous_instruction: None,
        }
    }

    /// Compile every statement of `program` in order, emitting into this
    /// compiler's instruction stream. Can be called only once per
    /// `Compiler`; build a fresh one (or `new_with_state`) per compilation.
    pub fn compile(&mut self, program: &Program) -> Result<(), CompileError> {
        tracing::debug!(statements = program.statements.len(), "compiling program");
        for statement in &program.statements {
            self.compile_statement(statement)?;
        }
        Ok(())
    }

    /// Snapshot the instructions and constants emitted so far.
    pub fn bytecode(&self) -> Bytecode {
        Bytecode {
            instructions: self.instructions.clone(),
            constants: self.constants.clone(),
        }
    }

    /// Hand back the symbol table (and, for convenience, the constants) so a
    /// REPL can seed the next `Compiler::new_with_state` call.
    pub fn into_state(self) -> (SymbolTable, Vec<Value>) {
        (self.symbol_table, self.constants)
    }

    fn compile_statement(&mut self, statement: &Statement) -> Result<(), CompileError> {
        match statement {
            Statement::Let(LetStatement { name, value }) => {
                self.compile_expression(value)?;
                let symbol = self
                    .symbol_table
                    .define(name.clone())
                    .map_err(|_| CompileError::ProgramTooLarge { what: "global slot" })?;
                self.emit_u16(Opcode::SetGlobal, symbol.index as usize, "global slot")?;
            }
            Statement::Expression(expr) => {
                self.compile_expression(expr)?;
                self.emit(Opcode::Pop, &[]);
            }
            Statement::Block(block) => self.compile_block(block)?,
        }
        Ok(())
    }

    fn compile_block(&mut self, block: &BlockStatement) -> Result<(), CompileError> {
        for statement in &block.statements {
            self.compile_statement(statement)?;
        }
        Ok(())
    }

    fn compile_expression(&mut self, expr: &Expression) -> Result<(), CompileError> {
        match expr {
            Expression::IntegerLiteral(value) => {
                let index = self.add_constant(Value::Integer(*value))?;
                self.emit_u16(Opcode::Const, index, "constant index")?;
            }
            Expression::StringLiteral(value) => {
                let index = self.add_constant(Value::String(Rc::from(value.as_str())))?;
                self.emit_u16(Opcode::Const, index, "constant index")?;
            }
            Expression::Boolean(true) => {
                self.emit(Opcode::True, &[]);
            }
            Expression::Boolean(false) => {
                self.emit(Opcode::False, &[]);
            }
            Expression::Identifier(name) => {
                let symbol = self
                    .symbol_table
                    .resolve(name)
                    .ok_or_else(|| CompileError::UndefinedVariable { name: name.clone() })?;
                self.emit_u16(Opcode::GetGlobal, symbol.index as usize, "global slot")?;
            }
            Expression::Prefix { operator, right } => {
                self.compile_expression(right)?;
                match operator.as_str() {
                    "!" => self.emit(Opcode::Bang, &[]),
                    "-" => self.emit(Opcode::Minus, &[]),
                    other => {
                        return Err(CompileError::UnknownOperator {
                            operator: other.to_string(),
                        });
                    }
                };
            }
            Expression::Infix {
                operator,
                left,
                right,
            } => self.compile_infix(operator, left, right)?,
            Expression::If {
                condition,
                consequence,
                alternative,
            } => self.compile_if(condition, consequence, alternative.as_ref())?,
            Expression::Array(elements) => {
                for element in elements {
                    self.compile_expression(element)?;
                }
                self.emit_u16(Opcode::Array, elements.len(), "array length")?;
            }
            Expression::Hash(pairs) => {
                for (key, value) in pairs {
                    self.compile_expression(key)?;
                    self.compile_expression(value)?;
                }
                self.emit_u16(Opcode::Hash, pairs.len() * 2, "hash entry count")?;
            }
        }
        Ok(())
    }

    fn compile_infix(
        &mut self,
        operator: &str,
        left: &Expression,
        right: &Expression,
    ) -> Result<(), CompileError> {
        // `<` has no dedicated opcode: swap operands and reuse `GreaterThan`.
        if operator == "<" {
            self.compile_expression(right)?;
            self.compile_expression(left)?;
            self.emit(Opcode::GreaterThan, &[]);
            return Ok(());
        }

        self.compile_expression(left)?;
        self.compile_expression(right)?;
        let opcode = match operator {
            "+" => Opcode::Add,
            "-" => Opcode::Sub,
            "*" => Opcode::Mul,
            "/" => Opcode::Div,
            ">" => Opcode::GreaterThan,
            "==" => Opcode::Eq,
            "!=" => Opcode::NotEq,
            other => {
                return Err(CompileError::UnknownOperator {
                    operator: other.to_string(),
                });
            }
        };
        self.emit(opcode, &[]);
        Ok(())
    }

    fn compile_if(
        &mut self,
        condition: &Expression,
        consequence: &BlockStatement,
        alternative: Option<&BlockStatement>,
    ) -> Result<(), CompileError> {
        self.compile_expression(condition)?;
        // Placeholder operand (`9999`), back-patched below.
        let jump_not_truthy_pos = self.emit(Opcode::JumpNotTruthy, &[9999]);

        self.compile_block(consequence)?;
        if self.last_instruction_is(Opcode::Pop) {
            self.remove_last_pop();
        }

        let jump_pos = self.emit(Opcode::Jump, &[9999]);

        let after_consequence = self.instructions.len();
        self.change_operand(Opcode::JumpNotTruthy, jump_not_truthy_pos, after_consequence)?;

        match alternative {
            None => {
                self.emit(Opcode::Null, &[]);
            }
            Some(alternative) => {
                self.compile_block(alternative)?;
                if self.last_instruction_is(Opcode::Pop) {
                    self.remove_last_pop();
                }
            }
        }

        let after_alternative = self.instructions.len();
        self.change_operand(Opcode::Jump, jump_pos, after_alternative)?;

        Ok(())
    }

    fn add_constant(&mut self, value: Value) -> Result<usize, CompileError> {
        self.constants.push(value);
        let index = self.constants.len() - 1;
        if index > u16::MAX as usize {
            return Err(CompileError::ProgramTooLarge {
                what: "constants pool",
            });
        }
        Ok(index)
    }

    /// Emit an opcode with no operands, tracking it as `last_instruction`.
    fn emit(&mut self, op: Opcode, operands: &[usize]) -> usize {
        let position = self.instructions.len();
        self.instructions.extend(code::encode(op, operands));

        self.previous_instruction = self.last_instruction;
        self.last_instruction = Some(EmittedInstruction { opcode: op, position });
        position
    }

    /// Emit an opcode whose single operand must fit the 2-byte encoding,
    /// surfacing `CompileError::ProgramTooLarge` instead of panicking when
    /// it doesn't.
    fn emit_u16(
        &mut self,
        op: Opcode,
        operand: usize,
        what: &'static str,
    ) -> Result<usize, CompileError> {
        if operand > u16::MAX as usize {
            return Err(CompileError::ProgramTooLarge { what });
        }
        Ok(self.emit(op, &[operand]))
    }

    fn last_instruction_is(&self, op: Opcode) -> bool {
        matches!(self.last_instruction, Some(EmittedInstruction { opcode, .. }) if opcode == op)
    }

    fn remove_last_pop(&mut self) {
        let last = self
            .last_instruction
            .expect("remove_last_pop called with no last instruction");
        self.instructions.truncate(last.position);
        self.last_instruction = self.previous_instruction;
        self.previous_instruction = None;
    }

    /// Overwrite the instruction at `position` in place — used for
    /// back-patching forward jumps once the destination offset is known.
    fn replace_instruction(&mut self, position: usize, new_instruction: &[u8]) {
        self.instructions[position..position + new_instruction.len()]
            .copy_from_slice(new_instruction);
    }

    /// Re-encode the instruction at `op_position` (known by the caller to
    /// be `op`) with a new operand, overwriting it in place.
    fn change_operand(
        &mut self,
        op: Opcode,
        op_position: usize,
        operand: usize,
    ) -> Result<(), CompileError> {
        if operand > u16::MAX as usize {
            return Err(CompileError::ProgramTooLarge { what: "jump target" });
        }
        let new_instruction = code::encode(op, &[operand]);
        self.replace_instruction(op_position, &new_instruction);
        Ok(())
    }
}
