//! 用户名解析相关的领域模型

use serde::ser::{Serialize, SerializeMap, Serializer};

/// 用户名无法解析时返回的占位值
pub const NOT_FOUND_SENTINEL: &str = "Not found or error";

/// 单个用户名的查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    /// 查询成功
    Found(String),
    /// 平台报告不存在
    NotFound,
    /// 请求失败（网络、鉴权、限流等）
    Failed(String),
}

impl UserLookup {
    pub fn id(&self) -> Option<&str> {
        match self {
            UserLookup::Found(id) => Some(id),
            _ => None,
        }
    }
}

/// 用户名到用户 ID 的映射
///
/// 键顺序与输入中首次出现的顺序一致，重复的用户名合并为一个键。
/// 序列化时失败项统一输出为 [`NOT_FOUND_SENTINEL`]。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsernameResolution {
    entries: Vec<(String, UserLookup)>,
}

impl UsernameResolution {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入或覆盖一个用户名的结果
    pub fn insert(&mut self, username: impl Into<String>, lookup: UserLookup) {
        let username = username.into();
        match self.entries.iter_mut().find(|(name, _)| *name == username) {
            Some(entry) => entry.1 = lookup,
            None => self.entries.push((username, lookup)),
        }
    }

    pub fn get(&self, username: &str) -> Option<&UserLookup> {
        self.entries
            .iter()
            .find(|(name, _)| name == username)
            .map(|(_, lookup)| lookup)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl Serialize for UsernameResolution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (username, lookup) in &self.entries {
            map.serialize_entry(username, lookup.id().unwrap_or(NOT_FOUND_SENTINEL))?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_collapse() {
        let mut resolution = UsernameResolution::new();
        resolution.insert("alice", UserLookup::Found("1".to_string()));
        resolution.insert("bob", UserLookup::NotFound);
        resolution.insert("alice", UserLookup::Found("1".to_string()));

        assert_eq!(resolution.len(), 2);
        assert_eq!(resolution.usernames().collect::<Vec<_>>(), vec!["alice", "bob"]);
    }

    #[test]
    fn test_serializes_in_input_order() {
        let mut resolution = UsernameResolution::new();
        resolution.insert("zed", UserLookup::Found("9".to_string()));
        resolution.insert("alice", UserLookup::Failed("503".to_string()));

        let json = serde_json::to_string(&resolution).unwrap();
        assert_eq!(json, r#"{"zed":"9","alice":"Not found or error"}"#);
    }

    #[test]
    fn test_not_found_and_failure_share_sentinel() {
        let mut resolution = UsernameResolution::new();
        resolution.insert("ghost", UserLookup::NotFound);
        resolution.insert("flaky", UserLookup::Failed("timeout".to_string()));

        let value = serde_json::to_value(&resolution).unwrap();
        assert_eq!(value["ghost"], NOT_FOUND_SENTINEL);
        assert_eq!(value["flaky"], NOT_FOUND_SENTINEL);
        assert_eq!(resolution.get("ghost"), Some(&UserLookup::NotFound));
    }
}
