//! LLM 返回内容的中间表示
//!
//! 所有字段都是 `Option`，缺失字段在归一化阶段再填默认值。

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

/// 一批单词的返回文档：`{"translations": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BatchReply {
    pub translations: Vec<ReplyEntry>,
}

/// 单个单词的返回条目
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReplyEntry {
    #[serde(default)]
    pub word: Option<FieldValue>,
    #[serde(default)]
    pub ipa: Option<FieldValue>,
    #[serde(default, alias = "korean")]
    pub translation: Option<FieldValue>,
    #[serde(default)]
    pub example: Option<FieldValue>,
    #[serde(default, alias = "example_korean")]
    pub example_translation: Option<FieldValue>,
}

/// 字段值：模型有时返回字符串，有时返回字符串列表
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Other(serde_json::Value),
}

impl FieldValue {
    pub fn into_text(self) -> String {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::List(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            FieldValue::Other(serde_json::Value::String(s)) => s,
            FieldValue::Other(value) => value.to_string(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl ReplyEntry {
    /// 只有单词、其它字段全缺的条目
    pub fn for_word(word: &str) -> Self {
        Self {
            word: Some(word.into()),
            ..Self::default()
        }
    }
}

impl BatchReply {
    /// 从 LLM 原始输出解析
    ///
    /// 允许外层包着 ```json 代码块或前后有说明文字，取最外层的 JSON 对象。
    pub fn from_llm_output(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(extract_json_object(text))
    }
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)\s*```").expect("静态正则"))
}

fn extract_json_object(text: &str) -> &str {
    let text = text.trim();
    let inner = fence_regex()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(text);

    match (inner.find('{'), inner.rfind('}')) {
        (Some(start), Some(end)) if start < end => &inner[start..=end],
        _ => inner,
    }
}
