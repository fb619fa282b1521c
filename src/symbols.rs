//! Scalar and array symbols, and symbol extraction.
//!
//! Extraction tokenizes the expression once. A name token whose next token is
//! `[` is recorded as an array; every other name is recorded as a scalar. Each
//! distinct name appears at most once per table. Tables are ordered by last
//! occurrence: names are added walking the references from the end of the
//! expression back to the start, so `(a+(b-c))*(d+A[4])` yields `d c b a`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::lexer::Lexer;
use crate::types::{HString, TokenKind, TryIntoHeaplessString};

/// A scalar variable and its bound value.
///
/// Equality is by name only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalarSymbol {
    pub name: HString,
    pub value: i64,
}

impl ScalarSymbol {
    pub fn new(name: &str) -> Result<Self> {
        Ok(Self {
            name: name.try_into_heapless()?,
            value: 0,
        })
    }
}

impl PartialEq for ScalarSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ScalarSymbol {}

impl fmt::Display for ScalarSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// An array variable. `values` is `None` until the loader allocates it.
///
/// Equality is by name only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArraySymbol {
    pub name: HString,
    pub values: Option<Vec<i64>>,
}

impl ArraySymbol {
    pub fn new(name: &str) -> Result<Self> {
        Ok(Self {
            name: name.try_into_heapless()?,
            values: None,
        })
    }

    /// Number of allocated entries; zero while unallocated.
    pub fn len(&self) -> usize {
        self.values.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<i64> {
        self.values.as_ref()?.get(index).copied()
    }
}

impl PartialEq for ArraySymbol {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ArraySymbol {}

impl fmt::Display for ArraySymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.values {
            Some(values) => write!(f, "{}={:?}", self.name, values),
            None => write!(f, "{}=null", self.name),
        }
    }
}

/// The scalar and array tables of one evaluation session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolTables {
    pub scalars: Vec<ScalarSymbol>,
    pub arrays: Vec<ArraySymbol>,
}

impl SymbolTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scalar(&self, name: &str) -> Option<&ScalarSymbol> {
        self.scalars.iter().find(|s| s.name == name)
    }

    pub fn scalar_mut(&mut self, name: &str) -> Option<&mut ScalarSymbol> {
        self.scalars.iter_mut().find(|s| s.name == name)
    }

    pub fn array(&self, name: &str) -> Option<&ArraySymbol> {
        self.arrays.iter().find(|a| a.name == name)
    }

    pub fn array_mut(&mut self, name: &str) -> Option<&mut ArraySymbol> {
        self.arrays.iter_mut().find(|a| a.name == name)
    }

    /// Add a scalar unless one with the same name exists. Returns whether it was added.
    pub fn insert_scalar(&mut self, name: &str) -> Result<bool> {
        if self.scalar(name).is_some() {
            return Ok(false);
        }
        self.scalars.push(ScalarSymbol::new(name)?);
        Ok(true)
    }

    /// Add an array unless one with the same name exists. Returns whether it was added.
    pub fn insert_array(&mut self, name: &str) -> Result<bool> {
        if self.array(name).is_some() {
            return Ok(false);
        }
        self.arrays.push(ArraySymbol::new(name)?);
        Ok(true)
    }

    /// Returns `true` if `name` is in either table.
    pub fn contains(&self, name: &str) -> bool {
        self.scalar(name).is_some() || self.array(name).is_some()
    }
}

/// Discover the distinct scalar and array names referenced by `expr`.
///
/// All scalars start at `0` and all arrays start unallocated.
pub fn build_symbols(expr: &str) -> Result<SymbolTables> {
    let mut references: Vec<(&str, bool)> = Vec::new();
    let mut lexer = Lexer::new(expr);

    while let Some(token) = lexer.next_token() {
        if token.kind != TokenKind::Identifier {
            continue;
        }
        let subscripted = lexer
            .peek_token()
            .is_some_and(|next| next.text == "[");
        references.push((token.text, subscripted));
    }

    let mut tables = SymbolTables::new();
    for (name, subscripted) in references.into_iter().rev() {
        if subscripted {
            tables.insert_array(name)?;
        } else {
            tables.insert_scalar(name)?;
        }
    }

    log::debug!(
        "extracted {} scalars and {} arrays from {:?}",
        tables.scalars.len(),
        tables.arrays.len(),
        expr
    );
    Ok(tables)
}
