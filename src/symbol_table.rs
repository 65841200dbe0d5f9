//! Resolves source names to stable slot indices in a named scope.
//!
//! The covered core uses a single [`Scope::Global`]; the `Scope` tag exists
//! so a later local/enclosed scope can be added without reshaping `Symbol`.

use hashbrown::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub scope: Scope,
    pub index: u16,
}

/// Every global slot (0..=`u16::MAX`) is already taken; `define` would have
/// to hand out an index that doesn't fit the `SetGlobal`/`GetGlobal` 2-byte
/// operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("global scope is full: more than {} definitions", u16::MAX as usize + 1)]
pub struct SymbolTableFull;

/// A mapping from source name to its most recent [`Symbol`].
///
/// Externally constructible (`Default`) so a REPL can thread one instance
/// across successive compilations, accumulating global slots instead of
/// reassigning them from zero each time.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    store: HashMap<String, Symbol>,
    num_definitions: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the next unused index in the global scope and stores the
    /// binding. Re-defining an existing name allocates a *fresh* index; the
    /// old slot is left dangling (acceptable for the covered scope — see
    /// `DESIGN.md`). Fails once the global scope has handed out `u16::MAX +
    /// 1` slots — the same 2-byte operand ceiling `compiler::Compiler`
    /// already enforces for constants and jump targets.
    pub fn define(&mut self, name: impl Into<String>) -> Result<Symbol, SymbolTableFull> {
        if self.num_definitions > u16::MAX as usize {
            return Err(SymbolTableFull);
        }
        let name = name.into();
        let symbol = Symbol {
            name: name.clone(),
            scope: Scope::Global,
            index: self.num_definitions as u16,
        };
        self.num_definitions += 1;
        self.store.insert(name, symbol.clone());
        Ok(symbol)
    }

    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.store.get(name)
    }

    pub fn num_definitions(&self) -> usize {
        self.num_definitions
    }
}
