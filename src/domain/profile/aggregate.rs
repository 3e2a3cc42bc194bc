//! Profile Context - Aggregate Root

use chrono::NaiveDateTime;

use super::{ProfileId, ProfileName, SampleName};

/// Profile 聚合根
///
/// 不变量:
/// - `id` 在档案生命周期内不变，删除后不复用
/// - `samples` 按附加顺序排列且不含重复文件名，首个元素为主样本
/// - `created_at` 创建后不可修改
///
/// 样本文件与目录的一致性由 ProfileManager 负责维护
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    id: ProfileId,
    name: ProfileName,
    samples: Vec<String>,
    created_at: NaiveDateTime,
}

impl Profile {
    /// 创建新档案（无样本）
    pub fn new(id: ProfileId, name: ProfileName, created_at: NaiveDateTime) -> Self {
        Self {
            id,
            name,
            samples: Vec::new(),
            created_at,
        }
    }

    /// 从持久化数据重建档案
    ///
    /// 索引文档中的重复样本名会被折叠，保留首次出现的位置
    pub fn restore(
        id: ProfileId,
        name: ProfileName,
        samples: Vec<String>,
        created_at: NaiveDateTime,
    ) -> Self {
        let mut profile = Self::new(id, name, created_at);
        for sample in samples {
            if !profile.samples.contains(&sample) {
                profile.samples.push(sample);
            }
        }
        profile
    }

    /// 追加样本，已存在时返回 false
    pub fn add_sample(&mut self, sample: &SampleName) -> bool {
        if self.has_sample(sample.as_str()) {
            return false;
        }
        self.samples.push(sample.as_str().to_string());
        true
    }

    /// 移除样本，不存在时返回 false
    pub fn remove_sample(&mut self, sample: &str) -> bool {
        match self.samples.iter().position(|s| s == sample) {
            Some(pos) => {
                self.samples.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn rename(&mut self, name: ProfileName) {
        self.name = name;
    }

    pub fn has_sample(&self, sample: &str) -> bool {
        self.samples.iter().any(|s| s == sample)
    }

    /// 主样本（首个附加的样本）
    pub fn primary_sample(&self) -> Option<&str> {
        self.samples.first().map(String::as_str)
    }

    // Getters
    pub fn id(&self) -> &ProfileId {
        &self.id
    }

    pub fn name(&self) -> &ProfileName {
        &self.name
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }
}
