//! 验证上下文
//!
//! 规划期间的验证状态：符号表、当前图空间和附加说明。

use crate::core::error::QueryResult;
use crate::query::context::symbol::SymbolTable;
use crate::utils::anon_var_generator::AnonVarGenerator;

#[derive(Debug, Clone, Default)]
pub struct ValidateContext {
    symbols: SymbolTable,
    anon_var_gen: AnonVarGenerator,
    space: Option<String>,
    /// 给外部展示的附加说明，比如被改写前的语句
    external_detail: Option<String>,
}

impl ValidateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    /// 生成匿名变量并登记到符号表
    pub fn anon_var(&mut self) -> QueryResult<String> {
        self.anon_var_gen.get_var(&mut self.symbols)
    }

    pub fn switch_to_space(&mut self, space: impl Into<String>) {
        self.space = Some(space.into());
    }

    pub fn which_space(&self) -> Option<&str> {
        self.space.as_deref()
    }

    pub fn set_external_detail(&mut self, detail: impl Into<String>) {
        self.external_detail = Some(detail.into());
    }

    pub fn external_detail(&self) -> Option<&str> {
        self.external_detail.as_deref()
    }
}
