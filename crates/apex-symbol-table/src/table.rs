//! The owning symbol store for one compilation unit.

use crate::reference::SymbolReference;
use crate::symbol::Symbol;
use apex_position_tracking::Position;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// How much of the table a consumer is expected to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DetailLevel {
    /// Only externally visible symbols are of interest
    Public,
    /// All declarations, without reference data
    Internal,
    /// Full symbol and reference detail
    #[default]
    Full,
}

/// Errors surfaced by table mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SymbolTableError {
    /// A symbol with this id is already stored
    #[error("duplicate symbol id: {0}")]
    DuplicateSymbolId(String),
    /// The symbol names a parent id that is not in the table
    #[error("unknown parent id {parent} for symbol {symbol}")]
    UnknownParent {
        /// Id of the rejected symbol
        symbol: String,
        /// The missing parent id
        parent: String,
    },
}

/// Owning store of symbols and references for one compilation unit.
///
/// Symbols are kept in insertion order, which matches traversal order by
/// construction; an id index and a parent→children index make scope
/// queries cheap. The reference list is a separate append-only sequence
/// whose order matches emission order.
#[derive(Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymbolTable {
    file_uri: String,
    detail_level: DetailLevel,
    symbols: Vec<Symbol>,
    index: FxHashMap<String, usize>,
    children: FxHashMap<String, Vec<String>>,
    roots: Vec<String>,
    references: Vec<SymbolReference>,
}

impl SymbolTable {
    /// Creates an empty table for the given file.
    pub fn new(file_uri: impl Into<String>) -> Self {
        Self { file_uri: file_uri.into(), ..Self::default() }
    }

    /// Creates an empty table with an explicit detail level.
    pub fn with_detail_level(file_uri: impl Into<String>, detail_level: DetailLevel) -> Self {
        Self { file_uri: file_uri.into(), detail_level, ..Self::default() }
    }

    /// Inserts a symbol into the tree.
    ///
    /// Rejects duplicate ids and parent ids that are not already stored;
    /// symbols must be added in traversal order, parents first.
    pub fn add_symbol(&mut self, symbol: Symbol) -> Result<(), SymbolTableError> {
        if self.index.contains_key(&symbol.id) {
            return Err(SymbolTableError::DuplicateSymbolId(symbol.id));
        }
        if let Some(parent) = &symbol.parent_id {
            if !self.index.contains_key(parent) {
                return Err(SymbolTableError::UnknownParent {
                    symbol: symbol.id,
                    parent: parent.clone(),
                });
            }
            self.children.entry(parent.clone()).or_default().push(symbol.id.clone());
        } else {
            self.roots.push(symbol.id.clone());
        }
        self.index.insert(symbol.id.clone(), self.symbols.len());
        self.symbols.push(symbol);
        Ok(())
    }

    /// Appends a reference to the ordered reference list and returns its
    /// index, which doubles as the reference's id for type linking.
    pub fn add_type_reference(&mut self, reference: SymbolReference) -> usize {
        self.references.push(reference);
        self.references.len() - 1
    }

    /// Case-insensitive lookup following lexical rules.
    ///
    /// With a scope id, searches that scope and then each enclosing scope
    /// up the parent chain; without one, searches root symbols first and
    /// then the whole table in declaration order.
    pub fn lookup(&self, name: &str, scope: Option<&str>) -> Option<&Symbol> {
        if let Some(scope_id) = scope {
            let mut current = Some(scope_id.to_string());
            while let Some(id) = current {
                if let Some(found) = self.find_symbol_in_scope(&id, name) {
                    return Some(found);
                }
                current = self.get_symbol(&id).and_then(|s| s.parent_id.clone());
            }
        }
        self.roots
            .iter()
            .filter_map(|id| self.get_symbol(id))
            .find(|s| s.name_matches(name))
            .or_else(|| self.symbols.iter().find(|s| s.name_matches(name)))
    }

    /// Finds a direct child of `scope_id` with the given name.
    pub fn find_symbol_in_scope(&self, scope_id: &str, name: &str) -> Option<&Symbol> {
        self.children
            .get(scope_id)?
            .iter()
            .filter_map(|id| self.get_symbol(id))
            .find(|s| s.name_matches(name))
    }

    /// Returns the direct children of a scope, in declaration order.
    pub fn get_symbols_in_scope(&self, scope_id: &str) -> Vec<&Symbol> {
        self.children
            .get(scope_id)
            .map(|ids| ids.iter().filter_map(|id| self.get_symbol(id)).collect())
            .unwrap_or_default()
    }

    /// Returns the first symbol matching a predicate, in declaration order.
    pub fn find_symbol_with(&self, predicate: impl Fn(&Symbol) -> bool) -> Option<&Symbol> {
        self.symbols.iter().find(|s| predicate(s))
    }

    /// Returns the scope-path segments used to compose ids under `scope`.
    ///
    /// The segments are the block names from the outermost ancestor down
    /// to (and including) the given scope. With no scope the path is
    /// empty, matching root-level symbol ids.
    pub fn get_current_scope_path(&self, scope: Option<&str>) -> Vec<String> {
        let mut segments = Vec::new();
        let mut current = scope.map(str::to_string);
        while let Some(id) = current {
            let Some(symbol) = self.get_symbol(&id) else { break };
            if symbol.kind.is_block() {
                segments.push(symbol.name.clone());
            }
            current = symbol.parent_id.clone();
        }
        segments.reverse();
        segments
    }

    /// Returns the block-symbol ids whose ranges contain `position`,
    /// ordered file scope first, innermost scope last.
    ///
    /// Descent is deterministic: at file level the most recently added
    /// containing root wins; below that, children are tried in insertion
    /// order and the first containing child is taken.
    pub fn get_scope_hierarchy(&self, position: Position) -> Vec<String> {
        let mut hierarchy = Vec::new();
        let mut current = self
            .roots
            .iter()
            .rev()
            .find(|id| self.symbol_contains(id, position))
            .cloned();

        while let Some(id) = current {
            if self.get_symbol(&id).is_some_and(|s| s.kind.is_block()) {
                hierarchy.push(id.clone());
            }
            current = self
                .children
                .get(&id)
                .and_then(|kids| {
                    kids.iter().find(|child| self.symbol_contains(child, position))
                })
                .cloned();
        }
        hierarchy
    }

    fn symbol_contains(&self, id: &str, position: Position) -> bool {
        self.get_symbol(id)
            .is_some_and(|s| s.location.symbol_range.contains(position))
    }

    /// Returns a symbol by id.
    pub fn get_symbol(&self, id: &str) -> Option<&Symbol> {
        self.index.get(id).map(|&i| &self.symbols[i])
    }

    /// Mutable access to a symbol by id.
    ///
    /// Reserved for the resolver's type-linking writes.
    pub fn get_symbol_mut(&mut self, id: &str) -> Option<&mut Symbol> {
        let i = *self.index.get(id)?;
        Some(&mut self.symbols[i])
    }

    /// All symbols in traversal order.
    pub fn get_all_symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// All references in emission order.
    pub fn get_all_references(&self) -> &[SymbolReference] {
        &self.references
    }

    /// Mutable access to a reference by index.
    ///
    /// Used during collection for parameter attachment and by the
    /// resolver for binding and chain-node narrowing.
    pub fn get_reference_mut(&mut self, index: usize) -> Option<&mut SymbolReference> {
        self.references.get_mut(index)
    }

    /// Ids of root-level symbols, in declaration order.
    pub fn root_ids(&self) -> &[String] {
        &self.roots
    }

    /// The file URI this table was built for.
    pub fn get_file_uri(&self) -> &str {
        &self.file_uri
    }

    /// The table's detail level.
    pub fn get_detail_level(&self) -> DetailLevel {
        self.detail_level
    }

    /// True when at least one reference was collected.
    pub fn has_references(&self) -> bool {
        !self.references.is_empty()
    }
}
