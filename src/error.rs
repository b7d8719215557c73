use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// LLM 服务错误
///
/// 对调用方来说这些都只是"本批失败"，重试层不区分具体原因。
#[derive(Debug, Error)]
pub enum LlmError {
    /// 批次为空，不发起请求
    #[error("批次不能为空")]
    EmptyBatch,
    /// 构建请求失败
    #[error("构建 LLM 请求失败: {message}")]
    RequestBuildFailed { message: String },
    /// API 调用失败（网络或非成功状态）
    #[error("LLM API调用失败 (模型: {model}): {message}")]
    ApiCallFailed { model: String, message: String },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 返回的条目与本批单词一个都对不上
    #[error("LLM返回的 {returned} 条结果与本批单词无一匹配")]
    UnmatchedReply { returned: usize },
    /// 返回内容不是预期的 JSON 结构
    #[error("无法解析LLM返回的JSON (响应: {snippet}): {source}")]
    MalformedResponse {
        snippet: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("配置文件 {path} 读取失败: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("配置文件 {path} 解析失败: {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置值不合法
    #[error("配置项 {key} 不合法: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 单词表格式不正确
    #[error("单词表格式不正确 ({path}): {message}")]
    WordListInvalid { path: String, message: String },
    /// 序列化结果失败
    #[error("序列化结果失败: {0}")]
    SerializeFailed(#[from] serde_json::Error),
}

// ========== 便捷构造函数 ==========

impl LlmError {
    /// 创建LLM API调用错误
    pub fn api_failed(model: impl Into<String>, source: impl std::fmt::Display) -> Self {
        LlmError::ApiCallFailed {
            model: model.into(),
            message: source.to_string(),
        }
    }

    /// 创建请求构建错误
    pub fn build_failed(source: impl std::fmt::Display) -> Self {
        LlmError::RequestBuildFailed {
            message: source.to_string(),
        }
    }
}

impl FileError {
    /// 创建文件读取错误
    pub fn read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        FileError::ReadFailed {
            path: path.into(),
            source,
        }
    }

    /// 创建单词表格式错误
    pub fn word_list_invalid(path: impl Into<String>, source: impl std::fmt::Display) -> Self {
        FileError::WordListInvalid {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// 创建文件写入错误
    pub fn write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        FileError::WriteFailed {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_error_wraps_into_app_error() {
        let err: AppError = LlmError::api_failed("gpt-3.5-turbo", "connection reset").into();
        let msg = err.to_string();
        assert!(msg.contains("gpt-3.5-turbo"));
        assert!(msg.contains("connection reset"));
    }

    #[test]
    fn test_malformed_response_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = LlmError::MalformedResponse {
            snippet: "{oops".to_string(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}
