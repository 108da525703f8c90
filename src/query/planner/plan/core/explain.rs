//! 计划描述
//!
//! EXPLAIN / PROFILE 输出的数据结构，以及 json、dot、行格式三种渲染。
//! 性能统计按调用顺序追加在节点描述上，序列化后可以无损还原。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;

/// 节点描述键值对
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub key: String,
    pub value: String,
}

impl Pair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// 分支信息
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanNodeBranchInfo {
    pub is_do_branch: bool,
    pub condition_node_id: i64,
}

impl PlanNodeBranchInfo {
    pub fn new(is_do_branch: bool, condition_node_id: i64) -> Self {
        Self {
            is_do_branch,
            condition_node_id,
        }
    }
}

/// 性能统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilingStats {
    pub rows: i64,
    pub exec_duration_in_us: i64,
    pub total_duration_in_us: i64,
    pub other_stats: HashMap<String, String>,
}

impl ProfilingStats {
    pub fn new(rows: i64, exec_duration_in_us: i64, total_duration_in_us: i64) -> Self {
        Self {
            rows,
            exec_duration_in_us,
            total_duration_in_us,
            other_stats: HashMap::new(),
        }
    }

    pub fn with_stat(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.other_stats.insert(key.into(), value.into());
        self
    }
}

/// 计划节点描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanNodeDescription {
    pub name: String,
    pub id: i64,
    pub output_var: String,
    pub col_names: Vec<String>,
    pub description: Option<Vec<Pair>>,
    pub profiles: Option<Vec<ProfilingStats>>,
    pub branch_info: Option<PlanNodeBranchInfo>,
    pub dependencies: Option<Vec<i64>>,
}

impl PlanNodeDescription {
    pub fn new(name: impl Into<String>, id: i64) -> Self {
        Self {
            name: name.into(),
            id,
            output_var: String::new(),
            col_names: Vec::new(),
            description: None,
            profiles: None,
            branch_info: None,
            dependencies: None,
        }
    }

    pub fn with_output_var(mut self, output_var: impl Into<String>) -> Self {
        self.output_var = output_var.into();
        self
    }

    pub fn with_col_names(mut self, col_names: Vec<String>) -> Self {
        self.col_names = col_names;
        self
    }

    pub fn add_description(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.description
            .get_or_insert_with(Vec::new)
            .push(Pair::new(key, value));
    }

    /// 按键查找描述值，取第一个
    pub fn get_description(&self, key: &str) -> Option<&str> {
        self.description
            .as_ref()?
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    pub fn set_dependencies(&mut self, deps: Vec<i64>) {
        self.dependencies = Some(deps);
    }

    pub fn set_branch_info(&mut self, branch_info: PlanNodeBranchInfo) {
        self.branch_info = Some(branch_info);
    }

    pub fn add_profile(&mut self, profile: ProfilingStats) {
        self.profiles.get_or_insert_with(Vec::new).push(profile);
    }

    fn dependency_ids(&self) -> String {
        self.dependencies
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    fn operator_info(&self) -> String {
        let mut info = vec![format!("outputVar: {}", self.output_var)];
        if !self.col_names.is_empty() {
            info.push(format!("colNames: {}", self.col_names.join(",")));
        }
        for pair in self.description.iter().flatten() {
            info.push(format!("{}: {}", pair.key, pair.value));
        }
        info.join("; ")
    }

    fn profiling_info(&self) -> String {
        self.profiles
            .iter()
            .flatten()
            .map(|p| {
                format!(
                    "rows: {}, execTime: {}us, totalTime: {}us",
                    p.rows, p.exec_duration_in_us, p.total_duration_in_us
                )
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// 计划描述
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanDescription {
    pub plan_node_descs: Vec<PlanNodeDescription>,
    pub node_index_map: HashMap<i64, usize>,
    pub format: String,
    pub optimize_time_in_us: i64,
}

impl PlanDescription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..Self::default()
        }
    }

    /// 追加一个节点描述，同一节点ID只能出现一次
    pub fn add_node_desc(&mut self, desc: PlanNodeDescription) -> usize {
        let index = self.plan_node_descs.len();
        if let Some(existing) = self.node_index_map.insert(desc.id, index) {
            panic!("节点 {} 的描述已存在（位置 {}）", desc.id, existing);
        }
        self.plan_node_descs.push(desc);
        index
    }

    pub fn get_node_desc(&self, node_id: i64) -> Option<&PlanNodeDescription> {
        self.node_index_map
            .get(&node_id)
            .and_then(|&index| self.plan_node_descs.get(index))
    }

    pub fn get_node_desc_mut(&mut self, node_id: i64) -> Option<&mut PlanNodeDescription> {
        let index = *self.node_index_map.get(&node_id)?;
        self.plan_node_descs.get_mut(index)
    }

    pub fn is_empty(&self) -> bool {
        self.plan_node_descs.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// graphviz 格式，边从依赖指向使用者
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph exec_plan {\n    rankdir=BT;\n");
        for desc in &self.plan_node_descs {
            let _ = writeln!(
                out,
                "    node_{} [shape=box, label=\"{}_{}\"];",
                desc.id, desc.name, desc.id
            );
        }
        for desc in &self.plan_node_descs {
            for dep in desc.dependencies.iter().flatten() {
                let _ = writeln!(out, "    node_{} -> node_{};", dep, desc.id);
            }
            if let Some(branch) = &desc.branch_info {
                let label = if branch.is_do_branch { "Y" } else { "N" };
                let _ = writeln!(
                    out,
                    "    node_{} -> node_{} [style=dashed, label=\"{}\"];",
                    desc.id, branch.condition_node_id, label
                );
            }
        }
        out.push('}');
        out
    }

    /// 行格式：id | name | dependencies | profiling data | operator info
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        let mut rows = vec![vec![
            "id".to_string(),
            "name".to_string(),
            "dependencies".to_string(),
            "profiling data".to_string(),
            "operator info".to_string(),
        ]];
        for desc in &self.plan_node_descs {
            rows.push(vec![
                desc.id.to_string(),
                desc.name.clone(),
                desc.dependency_ids(),
                desc.profiling_info(),
                desc.operator_info(),
            ]);
        }
        rows
    }

    /// 按配置的格式渲染
    pub fn render(&self) -> String {
        match self.format.as_str() {
            "dot" => self.to_dot(),
            "json" => self.to_json().unwrap_or_default(),
            _ => self
                .to_rows()
                .iter()
                .map(|row| row.join(" | "))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PlanDescription {
        let mut plan = PlanDescription::with_format("row");
        let mut start = PlanNodeDescription::new("Start", 0).with_output_var("__Start_0");
        start.set_dependencies(vec![]);
        plan.add_node_desc(start);

        let mut limit = PlanNodeDescription::new("Limit", 1)
            .with_output_var("__Limit_1")
            .with_col_names(vec!["name".to_string()]);
        limit.set_dependencies(vec![0]);
        limit.add_description("inputVar", "__Start_0");
        limit.add_description("count", "10");
        plan.add_node_desc(limit);
        plan
    }

    #[test]
    fn test_index_lookup() {
        let plan = sample();
        assert_eq!(plan.get_node_desc(1).map(|d| d.name.as_str()), Some("Limit"));
        assert!(plan.get_node_desc(7).is_none());
    }

    #[test]
    #[should_panic(expected = "描述已存在")]
    fn test_duplicate_node_desc_panics() {
        let mut plan = sample();
        plan.add_node_desc(PlanNodeDescription::new("Limit", 1));
    }

    #[test]
    fn test_profiles_accumulate_in_order() {
        let mut plan = sample();
        let desc = plan.get_node_desc_mut(1).unwrap();
        desc.add_profile(ProfilingStats::new(10, 5, 7));
        desc.add_profile(ProfilingStats::new(3, 1, 2).with_stat("loop", "2"));

        let profiles = plan.get_node_desc(1).unwrap().profiles.as_ref().unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].rows, 10);
        assert_eq!(profiles[1].other_stats.get("loop"), Some(&"2".to_string()));
    }

    #[test]
    fn test_json_is_lossless() {
        let mut plan = sample();
        plan.get_node_desc_mut(0)
            .unwrap()
            .add_profile(ProfilingStats::new(1, 2, 3));
        plan.get_node_desc_mut(1)
            .unwrap()
            .set_branch_info(PlanNodeBranchInfo::new(true, 0));

        let json = plan.to_json().unwrap();
        let back = PlanDescription::from_json(&json).unwrap();
        assert_eq!(back, plan);
    }

    #[test]
    fn test_dot_and_rows() {
        let plan = sample();
        let dot = plan.to_dot();
        assert!(dot.starts_with("digraph exec_plan {"));
        assert!(dot.contains("node_0 -> node_1;"));

        let rows = plan.to_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2][2], "0");
        assert!(rows[2][4].contains("inputVar: __Start_0"));
        assert!(plan.render().contains("Limit"));
    }
}
