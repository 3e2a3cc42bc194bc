//! JSON Profile Index
//!
//! 实现 ProfileIndexPort trait
//!
//! 文档格式（键为 profile_id）:
//! ```json
//! {
//!   "profile_20240101_120000": {
//!     "name": "Ada",
//!     "profile_id": "profile_20240101_120000",
//!     "samples": ["voice1.wav"],
//!     "created_at": "2024-01-01T12:00:00.000000",
//!     "sample_count": 1
//!   }
//! }
//! ```
//!
//! 写入先落到 `<path>.tmp` 再 rename 覆盖，文档始终是完整的档案集合。
//! 非 ASCII 字符写成 `\uXXXX` 转义，与旧版的转义方式一致。
//!
//! 键和样本文件名会成为文件系统路径，加载时必须是单层名称，否则整份文档视为损坏

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::application::ports::{IndexError, ProfileIndexPort, ProfileMap};
use crate::domain::profile::{Profile, ProfileId, ProfileName, SampleName, CREATED_AT_FORMAT};

/// 索引文档中的单条记录
#[derive(Debug, Serialize, Deserialize)]
struct ProfileEntry {
    name: String,
    profile_id: String,
    #[serde(default)]
    samples: Vec<String>,
    #[serde(default)]
    created_at: Option<String>,
    /// 仅为兼容旧读取方而写出，加载时忽略
    #[serde(default, skip_deserializing)]
    sample_count: usize,
}

impl From<&Profile> for ProfileEntry {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name().to_string(),
            profile_id: profile.id().to_string(),
            samples: profile.samples().to_vec(),
            created_at: Some(profile.created_at().format(CREATED_AT_FORMAT).to_string()),
            sample_count: profile.sample_count(),
        }
    }
}

impl ProfileEntry {
    /// 以文档键作为档案 ID 重建聚合
    fn into_profile(self, id: ProfileId) -> Result<Profile, IndexError> {
        let key = id.as_str();
        let name = ProfileName::new(self.name)
            .map_err(|e| IndexError::Corrupt(format!("profile '{}': {}", key, e)))?;

        if let Some(bad) = self.samples.iter().find(|s| SampleName::new(s.as_str()).is_err()) {
            return Err(IndexError::Corrupt(format!(
                "profile '{}': bad sample filename '{}'",
                key, bad
            )));
        }

        let created_at = match self.created_at.as_deref() {
            Some(raw) => parse_created_at(raw).ok_or_else(|| {
                IndexError::Corrupt(format!("profile '{}': bad created_at '{}'", key, raw))
            })?,
            None => Local::now().naive_local(),
        };

        Ok(Profile::restore(id, name, self.samples, created_at))
    }
}

/// 解析 ISO-8601 时间，兼容无小数秒与带时区偏移的写法
fn parse_created_at(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

/// 把非 ASCII 字符改写为 `\uXXXX`（BMP 之外用代理对）
///
/// 序列化结果中非 ASCII 字符只会出现在字符串字面量里，改写后仍是等价的 JSON
fn escape_non_ascii(json: &str) -> String {
    if json.is_ascii() {
        return json.to_string();
    }

    let mut out = String::with_capacity(json.len() + 16);
    let mut units = [0u16; 2];
    for ch in json.chars() {
        if ch.is_ascii() {
            out.push(ch);
        } else {
            for unit in ch.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}

/// JSON 文件档案索引
pub struct JsonProfileIndex {
    path: PathBuf,
}

impl JsonProfileIndex {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "profiles.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ProfileIndexPort for JsonProfileIndex {
    fn load(&self) -> Result<Option<ProfileMap>, IndexError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(IndexError::IoError(e.to_string())),
        };

        let document: BTreeMap<String, ProfileEntry> =
            serde_json::from_str(&raw).map_err(|e| IndexError::Corrupt(e.to_string()))?;

        let profiles = document
            .into_iter()
            .map(|(key, entry)| {
                let id = ProfileId::parse(key)
                    .map_err(|bad| IndexError::Corrupt(format!("bad profile id '{}'", bad)))?;
                let profile = entry.into_profile(id.clone())?;
                Ok((id, profile))
            })
            .collect::<Result<ProfileMap, IndexError>>()?;

        tracing::debug!(
            path = %self.path.display(),
            count = profiles.len(),
            "Loaded profile index"
        );

        Ok(Some(profiles))
    }

    fn save(&self, profiles: &ProfileMap) -> Result<(), IndexError> {
        let document: BTreeMap<&str, ProfileEntry> = profiles
            .iter()
            .map(|(id, profile)| (id.as_str(), ProfileEntry::from(profile)))
            .collect();

        let json = serde_json::to_string_pretty(&document)
            .map(|json| escape_non_ascii(&json))
            .map_err(|e| IndexError::SerializationError(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| IndexError::IoError(e.to_string()))?;
        }

        // 先写临时文件并 fsync，再原子 rename
        let temp_path = self.temp_path();
        let mut file = File::create(&temp_path).map_err(|e| IndexError::IoError(e.to_string()))?;
        file.write_all(json.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| IndexError::IoError(e.to_string()))?;
        drop(file);

        fs::rename(&temp_path, &self.path).map_err(|e| {
            IndexError::IoError(format!("Failed to replace profile index: {}", e))
        })?;

        tracing::debug!(
            path = %self.path.display(),
            count = profiles.len(),
            "Saved profile index"
        );

        Ok(())
    }

    fn quarantine(&self) -> Result<Option<PathBuf>, IndexError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "profiles.json".into());
        name.push(format!(".corrupt-{}", Local::now().format("%Y%m%d_%H%M%S")));
        let target = self.path.with_file_name(name);

        fs::rename(&self.path, &target).map_err(|e| IndexError::IoError(e.to_string()))?;

        Ok(Some(target))
    }
}
