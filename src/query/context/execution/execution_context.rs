//! 执行上下文模块
//!
//! 存储执行期间发布的变量。每个变量保留全部历史版本，
//! 循环体里的节点每执行一次追加一个版本，读取默认取最新版本。

use std::collections::HashMap;

use crate::core::Value;

/// 结果状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultState {
    Unexecuted,
    Success,
}

/// 一次执行产生的结果
#[derive(Debug, Clone, PartialEq)]
pub struct ExecResult {
    pub value: Value,
    pub state: ResultState,
}

impl ExecResult {
    pub fn success(value: Value) -> Self {
        Self {
            value,
            state: ResultState::Success,
        }
    }
}

static EMPTY_RESULT: ExecResult = ExecResult {
    value: Value::Null,
    state: ResultState::Unexecuted,
};

/// 执行上下文
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    results: HashMap<String, Vec<ExecResult>>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// 发布一个新版本
    pub fn set_result(&mut self, name: impl Into<String>, value: Value) {
        self.results
            .entry(name.into())
            .or_default()
            .push(ExecResult::success(value));
    }

    /// 最新版本，变量从未写入时返回未执行的空结果
    pub fn get_result(&self, name: &str) -> &ExecResult {
        self.results
            .get(name)
            .and_then(|history| history.last())
            .unwrap_or(&EMPTY_RESULT)
    }

    pub fn get_value(&self, name: &str) -> &Value {
        &self.get_result(name).value
    }

    /// 按写入顺序排列的全部版本
    pub fn get_history(&self, name: &str) -> &[ExecResult] {
        self.results.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn num_versions(&self, name: &str) -> usize {
        self.get_history(name).len()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.results.contains_key(name)
    }

    /// 已发布的变量名
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.results.keys().map(String::as_str)
    }
}
