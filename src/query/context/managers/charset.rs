//! 字符集信息

use std::collections::HashMap;

/// 支持的字符集及其排序规则
#[derive(Debug, Clone, PartialEq)]
pub struct CharsetInfo {
    /// 字符集 -> (默认排序规则, 全部排序规则)
    charsets: HashMap<String, (String, Vec<String>)>,
}

impl CharsetInfo {
    pub fn new() -> Self {
        Self {
            charsets: HashMap::new(),
        }
    }

    pub fn with_charset(
        mut self,
        charset: impl Into<String>,
        default_collation: impl Into<String>,
        collations: Vec<String>,
    ) -> Self {
        self.charsets
            .insert(charset.into(), (default_collation.into(), collations));
        self
    }

    pub fn is_support_charset(&self, charset: &str) -> bool {
        self.charsets.contains_key(&charset.to_lowercase())
    }

    pub fn is_support_collate(&self, collation: &str) -> bool {
        let collation = collation.to_lowercase();
        self.charsets
            .values()
            .any(|(_, collations)| collations.contains(&collation))
    }

    /// 排序规则是否属于字符集
    pub fn charset_and_collate_match(&self, charset: &str, collation: &str) -> bool {
        self.charsets
            .get(&charset.to_lowercase())
            .is_some_and(|(_, collations)| collations.contains(&collation.to_lowercase()))
    }

    pub fn default_collation(&self, charset: &str) -> Option<&str> {
        self.charsets
            .get(&charset.to_lowercase())
            .map(|(default, _)| default.as_str())
    }
}

impl Default for CharsetInfo {
    /// 只支持 utf8 / utf8_bin
    fn default() -> Self {
        Self::new().with_charset("utf8", "utf8_bin", vec!["utf8_bin".to_string()])
    }
}
