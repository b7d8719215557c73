use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// 归一化时缺字段的默认值
pub const NO_IPA: &str = "no pronunciation available";
pub const NO_TRANSLATION: &str = "no translation available";
pub const NO_EXAMPLE: &str = "no example available";
pub const NO_EXAMPLE_TRANSLATION: &str = "no example translation available";

// 整批重试耗尽后的兜底值
pub const FAILED_IPA: &str = "pronunciation unavailable";
pub const FAILED_TRANSLATION: &str = "translation unavailable";
pub const FAILED_EXAMPLE: &str = "example error";
pub const FAILED_EXAMPLE_TRANSLATION: &str = "example translation unavailable";

/// 合并例句的格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExampleFormat {
    /// `例句 (翻译)`
    #[default]
    Plain,
    /// `例句 (翻译).`
    TrailingPeriod,
}

impl ExampleFormat {
    pub fn combine(self, example: &str, example_translation: &str) -> String {
        match self {
            ExampleFormat::Plain => format!("{} ({})", example, example_translation),
            ExampleFormat::TrailingPeriod => format!("{} ({}).", example, example_translation),
        }
    }
}

impl FromStr for ExampleFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(ExampleFormat::Plain),
            "trailing_period" => Ok(ExampleFormat::TrailingPeriod),
            other => Err(format!("未知的例句格式: {}", other)),
        }
    }
}

/// 一个单词的生成结果
///
/// 创建后不可变；`combined_example` 只在构造时由例句和例句翻译拼出。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordRecord {
    word: String,
    ipa: String,
    translation: String,
    example: String,
    example_translation: String,
    combined_example: String,
}

impl WordRecord {
    pub fn new(
        word: impl Into<String>,
        ipa: impl Into<String>,
        translation: impl Into<String>,
        example: impl Into<String>,
        example_translation: impl Into<String>,
        format: ExampleFormat,
    ) -> Self {
        let example = example.into();
        let example_translation = example_translation.into();
        let combined_example = format.combine(&example, &example_translation);
        Self {
            word: word.into(),
            ipa: ipa.into(),
            translation: translation.into(),
            example,
            example_translation,
            combined_example,
        }
    }

    /// 重试耗尽时的兜底记录，所有字段都是失败占位符
    pub fn fallback(word: impl Into<String>, format: ExampleFormat) -> Self {
        Self::new(
            word,
            FAILED_IPA,
            FAILED_TRANSLATION,
            FAILED_EXAMPLE,
            FAILED_EXAMPLE_TRANSLATION,
            format,
        )
    }

    /// 换成输入中的原词，其余字段不变
    pub(crate) fn with_word(self, word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            ..self
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn ipa(&self) -> &str {
        &self.ipa
    }

    pub fn translation(&self) -> &str {
        &self.translation
    }

    pub fn example(&self) -> &str {
        &self.example
    }

    pub fn example_translation(&self) -> &str {
        &self.example_translation
    }

    pub fn combined_example(&self) -> &str {
        &self.combined_example
    }

    /// 是否为兜底记录
    pub fn is_fallback(&self) -> bool {
        self.ipa == FAILED_IPA
            && self.translation == FAILED_TRANSLATION
            && self.example == FAILED_EXAMPLE
            && self.example_translation == FAILED_EXAMPLE_TRANSLATION
    }
}

impl fmt::Display for WordRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} | {} | {}",
            self.word, self.ipa, self.translation, self.combined_example
        )
    }
}
