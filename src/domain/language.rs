//! 合成语言
//!
//! 合成引擎支持的语言代码及显示名称

use serde::Serialize;

/// 支持的语言列表 (代码, 显示名称)
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("pl", "Polish"),
    ("tr", "Turkish"),
    ("ru", "Russian"),
    ("nl", "Dutch"),
    ("cs", "Czech"),
    ("ar", "Arabic"),
    ("zh-cn", "Chinese"),
    ("ja", "Japanese"),
    ("hu", "Hungarian"),
    ("ko", "Korean"),
    ("hi", "Hindi"),
];

/// 默认合成语言
pub const DEFAULT_LANGUAGE: &str = "en";

/// 合成语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Language(&'static str);

impl Language {
    /// 解析语言代码（大小写不敏感）
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim().to_lowercase();
        SUPPORTED_LANGUAGES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(c, _)| Self(c))
    }

    pub fn code(&self) -> &'static str {
        self.0
    }

    pub fn display_name(&self) -> &'static str {
        SUPPORTED_LANGUAGES
            .iter()
            .find(|(c, _)| *c == self.0)
            .map(|(_, name)| *name)
            .unwrap_or(self.0)
    }
}

impl Default for Language {
    fn default() -> Self {
        Self(DEFAULT_LANGUAGE)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language() {
        assert_eq!(Language::parse("en").map(|l| l.code()), Some("en"));
        assert_eq!(Language::parse("ZH-CN").map(|l| l.code()), Some("zh-cn"));
        assert_eq!(Language::parse("xx"), None);
        assert_eq!(Language::default().display_name(), "English");
    }
}
