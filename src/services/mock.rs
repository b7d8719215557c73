//! 用于测试的模拟请求器
//!
//! - `MockRequester::echo()` - 每个单词都返回完整条目
//! - `MockRequester::failing()` - 每次都失败
//! - `MockRequester::fail_first(n)` - 前 n 次失败，之后成功

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::LlmError;
use crate::models::{BatchReply, ReplyEntry};
use crate::services::BatchRequester;

/// 模拟请求器的行为
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// 按原顺序返回每个单词
    Echo,
    /// 倒序返回每个单词
    EchoReversed,
    /// 总是返回 API 错误
    Failing,
    /// 前 `failures` 次失败，之后按 Echo 返回
    FailFirst { failures: usize },
    /// 返回无法解析的内容
    Malformed,
    /// 返回的单词都不属于本批
    Unrelated,
}

/// 模拟请求器，clone 后共享调用计数
#[derive(Debug, Clone)]
pub struct MockRequester {
    behavior: MockBehavior,
    calls: Arc<AtomicUsize>,
    batch_sizes: Arc<Mutex<Vec<usize>>>,
}

impl MockRequester {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(AtomicUsize::new(0)),
            batch_sizes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn fail_first(failures: usize) -> Self {
        Self::new(MockBehavior::FailFirst { failures })
    }

    /// 已收到的请求次数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 每次请求的批次大小，按调用顺序
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes
            .lock()
            .map(|sizes| sizes.clone())
            .unwrap_or_default()
    }

    /// Echo 行为下某个单词对应的条目
    pub fn entry_for(word: &str) -> ReplyEntry {
        ReplyEntry {
            word: Some(word.into()),
            ipa: Some(format!("/{}/", word).into()),
            translation: Some(format!("{}-번역", word).into()),
            example: Some(format!("I like {}.", word).into()),
            example_translation: Some(format!("{} 예문.", word).into()),
        }
    }

    fn echo_reply(words: &[String]) -> BatchReply {
        BatchReply {
            translations: words.iter().map(|w| Self::entry_for(w)).collect(),
        }
    }
}

#[async_trait]
impl BatchRequester for MockRequester {
    async fn request_batch(&self, words: &[String]) -> Result<BatchReply, LlmError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut sizes) = self.batch_sizes.lock() {
            sizes.push(words.len());
        }

        if words.is_empty() {
            return Err(LlmError::EmptyBatch);
        }

        match self.behavior {
            MockBehavior::Echo => Ok(Self::echo_reply(words)),
            MockBehavior::EchoReversed => {
                let mut reply = Self::echo_reply(words);
                reply.translations.reverse();
                Ok(reply)
            }
            MockBehavior::Failing => Err(LlmError::api_failed("mock", format!("第 {} 次调用失败", call))),
            MockBehavior::FailFirst { failures } if call <= failures => {
                Err(LlmError::api_failed("mock", format!("第 {} 次调用失败", call)))
            }
            MockBehavior::FailFirst { .. } => Ok(Self::echo_reply(words)),
            MockBehavior::Unrelated => Ok(BatchReply {
                translations: words
                    .iter()
                    .map(|w| Self::entry_for(&format!("{}-lemma", w)))
                    .collect(),
            }),
            MockBehavior::Malformed => {
                let text = "I'm sorry, I cannot produce JSON today.";
                BatchReply::from_llm_output(text).map_err(|source| LlmError::MalformedResponse {
                    snippet: text.to_string(),
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|w| w.to_string()).collect()
    }

    #[tokio::test]
    async fn test_fail_first_then_echo() {
        let mock = MockRequester::fail_first(2);
        let batch = words(&["cat"]);

        assert!(mock.request_batch(&batch).await.is_err());
        assert!(mock.request_batch(&batch).await.is_err());
        let reply = mock.request_batch(&batch).await.unwrap();

        assert_eq!(reply.translations.len(), 1);
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn test_clone_shares_counters() {
        let mock = MockRequester::echo();
        let handle = mock.clone();

        mock.request_batch(&words(&["a", "b"])).await.unwrap();
        mock.request_batch(&words(&["c"])).await.unwrap();

        assert_eq!(handle.calls(), 2);
        assert_eq!(handle.batch_sizes(), vec![2, 1]);
    }

    #[tokio::test]
    async fn test_malformed_is_parse_error() {
        let mock = MockRequester::new(MockBehavior::Malformed);
        let err = mock.request_batch(&words(&["cat"])).await.unwrap_err();
        assert!(matches!(err, LlmError::MalformedResponse { .. }));
    }
}
