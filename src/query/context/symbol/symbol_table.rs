//! 符号表
//!
//! 记录规划期间产生的每个变量，以及读写它的计划节点ID。
//! 变量一旦有了读者，名字在整个查询期间都不能再变。

use std::collections::{BTreeSet, HashMap};

use crate::core::error::{QueryError, QueryResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub col_names: Vec<String>,
    pub readers: BTreeSet<i64>,
    pub writers: BTreeSet<i64>,
}

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            col_names: Vec::new(),
            readers: BTreeSet::new(),
            writers: BTreeSet::new(),
        }
    }

    pub fn with_col_names(mut self, col_names: Vec<String>) -> Self {
        self.col_names = col_names;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_variable(&mut self, name: &str) -> QueryResult<&Symbol> {
        self.new_dataset(name, Vec::new())
    }

    pub fn new_dataset(&mut self, name: &str, col_names: Vec<String>) -> QueryResult<&Symbol> {
        if self.symbols.contains_key(name) {
            return Err(QueryError::PlanningError(format!("变量 '{}' 已存在", name)));
        }
        let symbol = Symbol::new(name).with_col_names(col_names);
        Ok(self.symbols.entry(name.to_string()).or_insert(symbol))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn get_var(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    fn symbol_mut(&mut self, name: &str) -> QueryResult<&mut Symbol> {
        self.symbols
            .get_mut(name)
            .ok_or_else(|| QueryError::PlanningError(format!("变量 '{}' 不存在", name)))
    }

    pub fn set_col_names(&mut self, name: &str, col_names: Vec<String>) {
        if let Some(symbol) = self.symbols.get_mut(name) {
            symbol.col_names = col_names;
        }
    }

    pub fn read_by(&mut self, name: &str, node_id: i64) -> QueryResult<()> {
        self.symbol_mut(name)?.readers.insert(node_id);
        Ok(())
    }

    pub fn written_by(&mut self, name: &str, node_id: i64) -> QueryResult<()> {
        self.symbol_mut(name)?.writers.insert(node_id);
        Ok(())
    }

    pub fn delete_read_by(&mut self, name: &str, node_id: i64) -> QueryResult<bool> {
        Ok(self.symbol_mut(name)?.readers.remove(&node_id))
    }

    pub fn delete_written_by(&mut self, name: &str, node_id: i64) -> QueryResult<bool> {
        Ok(self.symbol_mut(name)?.writers.remove(&node_id))
    }

    /// 节点改读另一个变量
    pub fn update_read_by(&mut self, old_var: &str, new_var: &str, node_id: i64) -> QueryResult<()> {
        self.delete_read_by(old_var, node_id)?;
        self.read_by(new_var, node_id)
    }

    pub fn readers(&self, name: &str) -> Option<&BTreeSet<i64>> {
        self.symbols.get(name).map(|s| &s.readers)
    }

    pub fn writers(&self, name: &str) -> Option<&BTreeSet<i64>> {
        self.symbols.get(name).map(|s| &s.writers)
    }
}
