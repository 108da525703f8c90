//! 匿名变量生成器
//!
//! 生成 `__VAR_<n>` 形式的变量名并登记到符号表。
//! 解析器不允许用户变量以 '_' 开头，所以以 '_' 开头的名字只会由内部生成。

use crate::core::error::QueryResult;
use crate::query::context::symbol::SymbolTable;
use crate::utils::id_gen::IdGenerator;

#[derive(Debug, Clone, Default)]
pub struct AnonVarGenerator {
    id_gen: IdGenerator,
}

impl AnonVarGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 生成一个新的匿名变量
    pub fn get_var(&mut self, symbols: &mut SymbolTable) -> QueryResult<String> {
        loop {
            let name = format!("__VAR_{}", self.id_gen.id());
            if symbols.exists(&name) {
                continue;
            }
            symbols.new_variable(&name)?;
            log::trace!("生成匿名变量: {}", name);
            return Ok(name);
        }
    }

    pub fn is_anon_var(var: &str) -> bool {
        var.starts_with('_')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_anon_var() {
        assert!(AnonVarGenerator::is_anon_var("_anon_var"));
        assert!(AnonVarGenerator::is_anon_var("_"));
        assert!(!AnonVarGenerator::is_anon_var("regular_var"));
        assert!(!AnonVarGenerator::is_anon_var(""));
    }

    #[test]
    fn test_get_var_skips_taken_names() {
        let mut symbols = SymbolTable::new();
        symbols.new_variable("__VAR_0").unwrap();

        let mut gen = AnonVarGenerator::new();
        assert_eq!(gen.get_var(&mut symbols).unwrap(), "__VAR_1");
        assert_eq!(gen.get_var(&mut symbols).unwrap(), "__VAR_2");
        assert!(symbols.exists("__VAR_2"));
    }
}
