use std::collections::HashMap;

use serde::Serialize;

/// One entry of a broker's fixed symbol catalog. The index (position in the
/// catalog) is stable for the lifetime of the catalog version.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Symbol {
    pub name: &'static str,
    pub tradable: bool,
}

impl Symbol {
    pub const fn tradable(name: &'static str) -> Self {
        Self {
            name,
            tradable: true,
        }
    }

    pub const fn suspended(name: &'static str) -> Self {
        Self {
            name,
            tradable: false,
        }
    }
}

/// A symbol referenced either by catalog index or by name.
#[derive(Debug, Clone, Copy)]
pub enum SymbolRef<'a> {
    Name(&'a str),
    Index(usize),
}

impl<'a> From<&'a str> for SymbolRef<'a> {
    fn from(name: &'a str) -> Self {
        SymbolRef::Name(name)
    }
}

impl From<usize> for SymbolRef<'_> {
    fn from(index: usize) -> Self {
        SymbolRef::Index(index)
    }
}

/// Name/index resolution over a broker catalog. Name lookups are
/// case-sensitive and truncate to the first 6 bytes so broker suffixes like
/// "EURUSD(OTC)" still resolve.
#[derive(Debug)]
pub struct Registry {
    symbols: &'static [Symbol],
    by_name: HashMap<&'static str, usize>,
}

impl Registry {
    pub fn new(symbols: &'static [Symbol]) -> Self {
        let by_name = symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name, i))
            .collect();
        Self { symbols, by_name }
    }

    pub fn symbols(&self) -> &'static [Symbol] {
        self.symbols
    }

    /// Resolve to a validated catalog index. `None` when the symbol is
    /// unknown, out of bounds, or currently not tradable.
    pub fn resolve(&self, sym: SymbolRef<'_>) -> Option<usize> {
        let index = match sym {
            SymbolRef::Name(name) => {
                let key = if name.len() > 6 {
                    name.get(..6).unwrap_or(name)
                } else {
                    name
                };
                *self.by_name.get(key)?
            }
            SymbolRef::Index(index) if index < self.symbols.len() => index,
            SymbolRef::Index(_) => return None,
        };
        self.symbols[index].tradable.then_some(index)
    }
}
