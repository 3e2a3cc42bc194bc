//! Profile Context - Value Objects

use chrono::NaiveDateTime;

/// 档案名称最大字符数
pub const MAX_NAME_CHARS: usize = 100;

/// ID 中时间戳部分的格式（秒级精度）
const ID_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `created_at` 的序列化格式（ISO-8601，无时区，微秒精度）
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// 档案唯一标识
///
/// 格式: `profile_<YYYYMMDD_HHMMSS>`，同一秒内冲突时追加 `_<n>` 后缀。
/// 同时作为档案样本目录名使用。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProfileId(String);

impl ProfileId {
    /// 从创建时刻生成基础 ID
    pub fn generate(at: NaiveDateTime) -> Self {
        Self(format!("profile_{}", at.format(ID_TIMESTAMP_FORMAT)))
    }

    /// 冲突时的候选 ID，`n` 从 2 开始
    pub fn with_suffix(&self, n: u32) -> Self {
        Self(format!("{}_{}", self.0, n))
    }

    /// 校验外部来源的 ID（索引文档的键），必须是单层目录名
    pub fn parse(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if is_single_component(&id) {
            Ok(Self(id))
        } else {
            Err(id)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ProfileId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ProfileId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 档案名称
///
/// 大小写敏感，按字符串精确匹配判定重名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileName(String);

impl ProfileName {
    pub fn new(name: impl Into<String>) -> Result<Self, &'static str> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("name must not be empty");
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err("name must be at most 100 characters");
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProfileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 样本文件名
///
/// 只允许单层文件名，拒绝路径分隔符和 `..`，保证样本不会落到档案目录之外
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SampleName(String);

impl SampleName {
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if is_single_component(&name) {
            Ok(Self(name))
        } else {
            Err(name)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SampleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 非空、不是 `.` / `..`、不含路径分隔符和 NUL
fn is_single_component(s: &str) -> bool {
    !(s.is_empty()
        || s == "."
        || s == ".."
        || s.contains('/')
        || s.contains('\\')
        || s.contains('\0'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_id_generation_uses_second_precision() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_milli_opt(12, 0, 0, 999)
            .unwrap();
        let id = ProfileId::generate(at);
        assert_eq!(id.as_str(), "profile_20240101_120000");
        assert_eq!(id.with_suffix(2).as_str(), "profile_20240101_120000_2");
    }

    #[test]
    fn test_name_validation() {
        assert!(ProfileName::new("Ada").is_ok());
        assert!(ProfileName::new("").is_err());
        assert!(ProfileName::new("   ").is_err());
        assert!(ProfileName::new("x".repeat(MAX_NAME_CHARS)).is_ok());
        assert!(ProfileName::new("x".repeat(MAX_NAME_CHARS + 1)).is_err());
    }

    #[test]
    fn test_sample_name_rejects_paths() {
        assert!(SampleName::new("voice1.wav").is_ok());
        assert!(SampleName::new("../secret.wav").is_err());
        assert!(SampleName::new("a/b.wav").is_err());
        assert!(SampleName::new("a\\b.wav").is_err());
        assert!(SampleName::new("..").is_err());
        assert!(SampleName::new("").is_err());
    }

    #[test]
    fn test_profile_id_parse_rejects_paths() {
        assert!(ProfileId::parse("profile_20240101_120000_2").is_ok());
        assert_eq!(ProfileId::parse("../victim"), Err("../victim".to_string()));
        assert!(ProfileId::parse("a/b").is_err());
        assert!(ProfileId::parse("..").is_err());
        assert!(ProfileId::parse("").is_err());
        assert!(ProfileId::parse("nul\0byte").is_err());
    }
}
