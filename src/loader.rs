//! Binding values to extracted symbols.
//!
//! Each line of the value source is either `name value` for a scalar or
//! `name size (index,value) (index,value) ...` for an array. Whitespace and
//! the characters `(` `)` `,` separate the fields of a pair list. Lines for
//! names that the expression never references are skipped.

use std::io::BufRead;

use crate::error::{ExprError, Result};
use crate::symbols::SymbolTables;

/// Bind every line of `lines` into `tables`.
///
/// Stops at the first malformed line. Lines bound before it keep their values.
pub fn load_symbol_values<I, S>(tables: &mut SymbolTables, lines: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for line in lines {
        bind_line(tables, line.as_ref())?;
    }
    Ok(())
}

/// Like [`load_symbol_values`], reading lines from `reader`.
pub fn load_symbol_values_from_reader<R: BufRead>(
    tables: &mut SymbolTables,
    reader: R,
) -> Result<()> {
    for line in reader.lines() {
        bind_line(tables, &line?)?;
    }
    Ok(())
}

fn malformed(line: &str) -> ExprError {
    ExprError::MalformedValueLine {
        line: line.to_string(),
    }
}

/// Bind a single value line.
pub fn bind_line(tables: &mut SymbolTables, line: &str) -> Result<()> {
    let line = line.trim();
    let mut fields = line.split_whitespace();
    let Some(name) = fields.next() else {
        return Ok(());
    };
    if !tables.contains(name) {
        log::debug!("skipping values for unknown symbol '{}'", name);
        return Ok(());
    }

    let first: i64 = fields.next().ok_or_else(|| malformed(line))?.parse()?;
    let rest: Vec<&str> = fields.collect();

    if rest.is_empty() {
        if let Some(scalar) = tables.scalar_mut(name) {
            scalar.value = first;
            log::trace!("bound scalar {}={}", name, first);
            return Ok(());
        }
    }

    let Some(array) = tables.array_mut(name) else {
        return Err(malformed(line));
    };
    let size = usize::try_from(first).map_err(|_| malformed(line))?;

    let numbers: Vec<&str> = rest
        .iter()
        .flat_map(|field| field.split(['(', ')', ',']))
        .filter(|s| !s.is_empty())
        .collect();
    if numbers.len() % 2 != 0 {
        return Err(malformed(line));
    }

    let mut values: Vec<i64> = Vec::new();
    values
        .try_reserve_exact(size)
        .map_err(|_| ExprError::CapacityExceeded("array values"))?;
    values.resize(size, 0);
    for pair in numbers.chunks(2) {
        let index: i64 = pair[0].parse()?;
        let value: i64 = pair[1].parse()?;
        let slot = usize::try_from(index)
            .ok()
            .filter(|&i| i < size)
            .ok_or_else(|| ExprError::ArrayIndexOutOfBounds {
                name: name.to_string(),
                index,
                len: size,
            })?;
        values[slot] = value;
    }

    log::trace!("bound array {} with {} entries", name, size);
    array.values = Some(values);
    Ok(())
}
