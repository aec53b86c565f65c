//! Scope stack and block factory.
//!
//! During traversal the collector keeps a stack of synthetic block scopes.
//! Every semantic symbol (class, method, variable) is parented through a
//! block so that `file → type → class-block → method → method-block → ...`
//! chains are uniform and FQN reconstruction from ids stays mechanical.

use apex_position_tracking::Location;
use apex_symbol_table::{compose_block_id, Symbol, SymbolDetail, SymbolTable};
use apex_symbol_types::{Modifiers, ScopeType, SymbolKind};
use tracing::warn;

/// One live entry on the scope stack.
#[derive(Debug, Clone)]
pub struct ScopeEntry {
    /// Id of the block symbol this entry materialized
    pub block_id: String,
    /// The grammar context the block corresponds to
    pub scope_type: ScopeType,
}

/// Stack of block scopes with a per-unit monotonic name counter.
#[derive(Debug, Default)]
pub struct ScopeStack {
    entries: Vec<ScopeEntry>,
    counter: u32,
}

impl ScopeStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// The innermost open scope.
    pub fn current(&self) -> Option<&ScopeEntry> {
        self.entries.last()
    }

    /// Id of the innermost open scope's block symbol.
    pub fn current_block_id(&self) -> Option<&str> {
        self.entries.last().map(|e| e.block_id.as_str())
    }

    /// Number of open scopes.
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Walks open scopes innermost-first.
    pub fn iter_innermost_first(&self) -> impl Iterator<Item = &ScopeEntry> {
        self.entries.iter().rev()
    }

    /// Materializes a block symbol and pushes it as the current scope.
    ///
    /// The block is named `{scope_type}_{counter}` with a counter that
    /// increases monotonically per compilation unit. Its parent is the
    /// semantic symbol named by `semantic_name` when that symbol exists,
    /// otherwise the current top of the stack; class and method blocks
    /// pass their symbol's name so the block lands under it and becomes
    /// the parent of direct children.
    pub fn enter_scope(
        &mut self,
        table: &mut SymbolTable,
        scope_type: ScopeType,
        location: Location,
        semantic_name: Option<&str>,
    ) -> String {
        self.counter += 1;
        let block_name = format!("{}_{}", scope_type.label(), self.counter);

        let parent_id = semantic_name
            .and_then(|name| self.find_semantic_parent(table, name))
            .or_else(|| self.current_block_id().map(str::to_string));

        let block_id = match &parent_id {
            Some(parent) => compose_block_id(parent, &block_name),
            None => compose_block_id(table.get_file_uri(), &block_name),
        };
        let scope_path = table.get_current_scope_path(parent_id.as_deref());

        let block = Symbol {
            id: block_id.clone(),
            name: block_name,
            kind: SymbolKind::Block,
            location,
            file_uri: table.get_file_uri().to_string(),
            parent_id,
            modifiers: Modifiers::default(),
            annotations: Vec::new(),
            namespace: None,
            scope_path,
            detail: SymbolDetail::Scope { scope_type },
        };

        if let Err(err) = table.add_symbol(block) {
            warn!(scope = %scope_type, error = %err, "failed to materialize block scope");
        }
        self.entries.push(ScopeEntry { block_id: block_id.clone(), scope_type });
        block_id
    }

    /// Pops the current scope.
    ///
    /// A kind mismatch is logged and the pop proceeds anyway so a single
    /// malformed subtree cannot skew every later scope.
    pub fn exit_scope(&mut self, expected: ScopeType) -> Option<ScopeEntry> {
        let popped = self.entries.pop();
        match &popped {
            Some(entry) if entry.scope_type != expected => {
                warn!(
                    expected = %expected,
                    actual = %entry.scope_type,
                    block = %entry.block_id,
                    "scope pop mismatch"
                );
            }
            None => {
                warn!(expected = %expected, "scope pop on empty stack");
            }
            _ => {}
        }
        popped
    }

    /// Finds the most recently declared type or callable symbol with the
    /// given name, the semantic owner a class/method block parents to.
    fn find_semantic_parent(&self, table: &SymbolTable, name: &str) -> Option<String> {
        table
            .get_all_symbols()
            .iter()
            .rev()
            .find(|s| (s.kind.is_type() || s.kind.is_callable()) && s.name_matches(name))
            .map(|s| s.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apex_position_tracking::{Location, Range};
    use apex_symbol_table::compose_symbol_id;
    use apex_symbol_types::TypeInfo;

    fn loc(start_line: u32, end_line: u32) -> Location {
        Location::single(Range::new(start_line, 0, end_line, 1))
    }

    fn add_class(table: &mut SymbolTable, name: &str) -> String {
        let id = compose_symbol_id(table.get_file_uri(), &[], "class", name);
        let symbol = Symbol {
            id: id.clone(),
            name: name.into(),
            kind: SymbolKind::Class,
            location: loc(1, 9),
            file_uri: table.get_file_uri().to_string(),
            parent_id: None,
            modifiers: Modifiers::default(),
            annotations: Vec::new(),
            namespace: None,
            scope_path: Vec::new(),
            detail: SymbolDetail::Type {
                super_class: None,
                interfaces: Vec::new(),
                values: Vec::new(),
            },
        };
        table.add_symbol(symbol).unwrap();
        id
    }

    #[test]
    fn test_block_names_are_monotonic() {
        let mut table = SymbolTable::new("file.cls");
        let mut scopes = ScopeStack::new();
        let first = scopes.enter_scope(&mut table, ScopeType::Block, loc(1, 2), None);
        let second = scopes.enter_scope(&mut table, ScopeType::If, loc(1, 2), None);
        assert!(first.ends_with(":block:block_1"));
        assert!(second.ends_with(":block_1:block:if_2"));
    }

    #[test]
    fn test_semantic_parenting() {
        let mut table = SymbolTable::new("file.cls");
        let mut scopes = ScopeStack::new();
        let class_id = add_class(&mut table, "T");

        let block_id =
            scopes.enter_scope(&mut table, ScopeType::Class, loc(1, 9), Some("T"));
        let block = table.get_symbol(&block_id).unwrap();
        assert_eq!(block.parent_id.as_deref(), Some(class_id.as_str()));
        assert_eq!(block_id, format!("{}:block:class_1", class_id));
    }

    #[test]
    fn test_missing_semantic_symbol_parents_to_current() {
        let mut table = SymbolTable::new("file.cls");
        let mut scopes = ScopeStack::new();
        let outer = scopes.enter_scope(&mut table, ScopeType::Block, loc(1, 9), None);
        let inner =
            scopes.enter_scope(&mut table, ScopeType::Method, loc(2, 8), Some("nothere"));
        let block = table.get_symbol(&inner).unwrap();
        assert_eq!(block.parent_id.as_deref(), Some(outer.as_str()));
    }

    #[test]
    fn test_exit_mismatch_still_pops() {
        let mut table = SymbolTable::new("file.cls");
        let mut scopes = ScopeStack::new();
        scopes.enter_scope(&mut table, ScopeType::While, loc(1, 3), None);
        let popped = scopes.exit_scope(ScopeType::If);
        assert_eq!(popped.map(|e| e.scope_type), Some(ScopeType::While));
        assert_eq!(scopes.depth(), 0);
        assert!(scopes.exit_scope(ScopeType::If).is_none());
    }

    #[test]
    fn test_method_block_id_composes_off_method_id() {
        let mut table = SymbolTable::new("file.cls");
        let mut scopes = ScopeStack::new();
        add_class(&mut table, "T");
        scopes.enter_scope(&mut table, ScopeType::Class, loc(1, 9), Some("T"));

        let method_id =
            compose_symbol_id("file.cls", &["class_1".into()], "method", "run");
        let method = Symbol {
            id: method_id.clone(),
            name: "run".into(),
            kind: SymbolKind::Method,
            location: loc(2, 4),
            file_uri: "file.cls".into(),
            parent_id: scopes.current_block_id().map(str::to_string),
            modifiers: Modifiers::default(),
            annotations: Vec::new(),
            namespace: None,
            scope_path: vec!["class_1".into()],
            detail: SymbolDetail::Callable {
                parameters: Vec::new(),
                return_type: TypeInfo::void(),
                is_constructor: false,
            },
        };
        table.add_symbol(method).unwrap();

        let block_id =
            scopes.enter_scope(&mut table, ScopeType::Method, loc(2, 4), Some("run"));
        assert_eq!(block_id, format!("{}:block:method_2", method_id));
    }
}
