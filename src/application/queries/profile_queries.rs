//! Profile Queries

use crate::domain::profile::ProfileId;

/// 获取档案详情查询
#[derive(Debug, Clone)]
pub struct GetProfile {
    pub profile_id: ProfileId,
}

/// 列出所有档案查询
#[derive(Debug, Clone)]
pub struct ListProfiles;
