//! 请求上下文模块 - 查询请求的会话信息和参数

use std::collections::HashMap;

use crate::core::Value;

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    query: String,
    session_id: i64,
    parameters: HashMap<String, Value>,
}

impl RequestContext {
    pub fn new(query: impl Into<String>, session_id: i64) -> Self {
        Self {
            query: query.into(),
            session_id,
            parameters: HashMap::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn session_id(&self) -> i64 {
        self.session_id
    }

    pub fn get_parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    pub fn parameters(&self) -> &HashMap<String, Value> {
        &self.parameters
    }
}
