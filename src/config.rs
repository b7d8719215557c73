use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::ExampleFormat;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 每批发送给 LLM 的单词数
    pub batch_size: usize,
    /// 每批最多尝试次数
    pub max_attempts: u32,
    /// 两次尝试之间的等待秒数
    pub retry_delay_secs: u64,
    /// 输入单词表
    pub input_file: String,
    /// 结果输出文件（JSON）
    pub output_file: String,
    /// 失败批次记录文件
    pub warn_file: String,
    /// 输出日志文件
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 例句合并格式
    pub example_format: ExampleFormat,
    /// 单词所属语言
    pub source_language: String,
    /// 翻译目标语言
    pub target_language: String,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub temperature: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            batch_size: 10,
            max_attempts: 3,
            retry_delay_secs: 2,
            input_file: "words.csv".to_string(),
            output_file: "translated_vocabulary.json".to_string(),
            warn_file: "warn.txt".to_string(),
            output_log_file: "output.txt".to_string(),
            verbose_logging: false,
            example_format: ExampleFormat::Plain,
            source_language: "English".to_string(),
            target_language: "Korean".to_string(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-3.5-turbo".to_string(),
            temperature: 0.3,
        }
    }
}

impl Config {
    /// 加载配置：配置文件（若存在）+ 环境变量覆盖
    ///
    /// 配置文件路径取自 `VOCAB_CONFIG`，默认为 `config.toml`。
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("VOCAB_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let base = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        let config = base.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// 读取并解析 TOML 配置文件
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// 从 TOML 文本解析配置，缺省项使用默认值
    pub fn from_toml_str(content: &str, path: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_string(),
            source,
        })
    }

    /// 只从环境变量读取（其余使用默认值）
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// 用环境变量覆盖已有配置
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        let api_key = std::env::var("LLM_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .unwrap_or(self.llm_api_key);
        let example_format = match std::env::var("EXAMPLE_FORMAT") {
            Ok(v) => v.parse().map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: "EXAMPLE_FORMAT".to_string(),
                value: v,
                expected_type: "plain | trailing_period".to_string(),
            })?,
            Err(_) => self.example_format,
        };

        Ok(Self {
            batch_size: env_parse("BATCH_SIZE", self.batch_size)?,
            max_attempts: env_parse("MAX_ATTEMPTS", self.max_attempts)?,
            retry_delay_secs: env_parse("RETRY_DELAY_SECS", self.retry_delay_secs)?,
            input_file: std::env::var("INPUT_FILE").unwrap_or(self.input_file),
            output_file: std::env::var("OUTPUT_FILE").unwrap_or(self.output_file),
            warn_file: std::env::var("WARN_FILE").unwrap_or(self.warn_file),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
            verbose_logging: env_parse("VERBOSE_LOGGING", self.verbose_logging)?,
            example_format,
            source_language: std::env::var("SOURCE_LANGUAGE").unwrap_or(self.source_language),
            target_language: std::env::var("TARGET_LANGUAGE").unwrap_or(self.target_language),
            llm_api_key: api_key,
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            temperature: env_parse("LLM_TEMPERATURE", self.temperature)?,
        })
    }

    /// 检查配置是否可用
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(invalid("batch_size", "必须大于 0"));
        }
        if self.max_attempts == 0 {
            return Err(invalid("max_attempts", "必须大于 0"));
        }
        if self.llm_model_name.trim().is_empty() {
            return Err(invalid("llm_model_name", "不能为空"));
        }
        Ok(())
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn env_parse<T: std::str::FromStr>(var_name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value,
            expected_type: std::any::type_name::<T>().to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pipeline_constants() {
        let config = Config::default();
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.retry_delay(), Duration::from_secs(2));
        assert_eq!(config.example_format, ExampleFormat::Plain);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_partial_override() {
        let content = r#"
batch_size = 5
example_format = "trailing_period"
llm_model_name = "gpt-4o-mini"
"#;
        let config = Config::from_toml_str(content, "test.toml").unwrap();
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.example_format, ExampleFormat::TrailingPeriod);
        assert_eq!(config.llm_model_name, "gpt-4o-mini");
        // 未指定的项保持默认
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.target_language, "Korean");
    }

    #[test]
    fn test_toml_parse_error_names_path() {
        let err = Config::from_toml_str("batch_size = \"ten\"", "bad.toml").unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_attempts = 5\n").unwrap();

        let config = Config::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.max_attempts, 5);
    }

    #[test]
    fn test_unreadable_config_is_read_error() {
        // 目录存在但不能当文件读
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_string_lossy().to_string();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFailed { .. }));
        assert!(err.to_string().contains(&path));
    }

    #[test]
    fn test_validate_rejects_zero_batch_and_budget() {
        let config = Config {
            batch_size: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            max_attempts: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
