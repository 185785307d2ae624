use super::ir::Segment;
use crate::{error::SymbolError, parsing::TypeName};
use smol_str::SmolStr;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU16, Ordering},
        Arc,
    },
};

/// Resolved binding of an identifier to its storage location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub index: u16,
    /// Declared type, used to resolve method calls on the variable.
    pub ty: TypeName,
}

impl Symbol {
    #[inline]
    pub fn segment(&self) -> Segment {
        self.kind.segment()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Class scope, numbered across every class of the program.
    Static,
    /// Class scope, numbered per class.
    Field,
    /// Subroutine scope.
    Argument,
    /// Subroutine scope.
    Local,
}

impl SymbolKind {
    #[rustfmt::skip]
    pub fn segment(&self) -> Segment {
        match self {
            SymbolKind::Static   => Segment::Static,
            SymbolKind::Field    => Segment::This,
            SymbolKind::Argument => Segment::Argument,
            SymbolKind::Local    => Segment::Local,
        }
    }

    #[inline]
    fn is_class_scope(&self) -> bool {
        matches!(self, SymbolKind::Static | SymbolKind::Field)
    }
}

/// Shared counter handing out static variable indices.
///
/// Static variables live in one segment for the whole program, so
/// their numbering continues from class to class. Clones share the
/// same counter, which allows classes to be compiled concurrently.
#[derive(Debug, Clone, Default)]
pub struct StaticCounter(Arc<AtomicU16>);

impl StaticCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next unused static index.
    pub fn next_index(&self) -> Result<u16, SymbolError> {
        self.0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |index| index.checked_add(1))
            .map_err(|_| SymbolError::Overflow { segment: "static" })
    }

    /// Number of indices handed out so far.
    pub fn count(&self) -> u16 {
        self.0.load(Ordering::Relaxed)
    }

    /// Start numbering from zero again, for a new program.
    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed)
    }
}

/// Two level symbol table.
///
/// The class scope lives for the whole class. The subroutine
/// scope is discarded at the start of every subroutine.
#[derive(Debug)]
pub struct SymbolTable {
    class: HashMap<SmolStr, Symbol>,
    subroutine: HashMap<SmolStr, Symbol>,
    statics: StaticCounter,
    field_count: u16,
    argument_count: u16,
    local_count: u16,
}

impl SymbolTable {
    pub fn new(statics: StaticCounter) -> Self {
        Self {
            class: HashMap::new(),
            subroutine: HashMap::new(),
            statics,
            field_count: 0,
            argument_count: 0,
            local_count: 0,
        }
    }

    /// Clear the subroutine scope.
    ///
    /// Methods receive the object as argument 0, so their
    /// declared parameters are numbered from 1.
    pub fn start_subroutine(&mut self, is_method: bool) {
        self.subroutine.clear();
        self.argument_count = if is_method { 1 } else { 0 };
        self.local_count = 0;
    }

    /// Bind a new identifier in the scope of its kind.
    ///
    /// A name may only be bound once across both scopes.
    pub fn declare(
        &mut self,
        name: impl Into<SmolStr>,
        kind: SymbolKind,
        ty: TypeName,
    ) -> Result<Symbol, SymbolError> {
        let name = name.into();
        if self.contains(&name) {
            return Err(SymbolError::Duplicate { name });
        }

        let index = match kind {
            SymbolKind::Static => self.statics.next_index()?,
            SymbolKind::Field => bump(&mut self.field_count, "this")?,
            SymbolKind::Argument => bump(&mut self.argument_count, "argument")?,
            SymbolKind::Local => bump(&mut self.local_count, "local")?,
        };

        let symbol = Symbol { kind, index, ty };
        let scope = if kind.is_class_scope() {
            &mut self.class
        } else {
            &mut self.subroutine
        };
        scope.insert(name, symbol.clone());

        Ok(symbol)
    }

    /// Lookup the given name, subroutine scope first.
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.subroutine.get(name).or_else(|| self.class.get(name))
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Number of fields, which is the size of an instance.
    #[inline]
    pub fn field_count(&self) -> u16 {
        self.field_count
    }

    #[inline]
    pub fn local_count(&self) -> u16 {
        self.local_count
    }
}

/// Post-increment a segment counter.
fn bump(counter: &mut u16, segment: &'static str) -> Result<u16, SymbolError> {
    let index = *counter;
    *counter = index.checked_add(1).ok_or(SymbolError::Overflow { segment })?;
    Ok(index)
}
