//! 固定间隔重试
//!
//! 与具体请求无关：任何返回 `Result` 的异步操作都可以套上
//! "最多 N 次，每次失败后等待固定时间，全失败则用兜底值"。

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

/// 重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 最多尝试次数（包括第一次）
    pub max_attempts: u32,
    /// 两次尝试之间的固定等待
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

/// 重试结果
#[derive(Debug)]
pub enum RetryOutcome<T, E> {
    /// 第 `attempts` 次成功
    Succeeded { value: T, attempts: u32 },
    /// 全部失败，`value` 是兜底值
    Exhausted {
        value: T,
        attempts: u32,
        last_error: Option<E>,
    },
}

impl<T, E> RetryOutcome<T, E> {
    pub fn attempts(&self) -> u32 {
        match self {
            RetryOutcome::Succeeded { attempts, .. } | RetryOutcome::Exhausted { attempts, .. } => {
                *attempts
            }
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryOutcome::Exhausted { .. })
    }

    pub fn into_value(self) -> T {
        match self {
            RetryOutcome::Succeeded { value, .. } | RetryOutcome::Exhausted { value, .. } => value,
        }
    }
}

/// 按策略重试 `op`，全部失败时返回 `fallback()` 的结果
///
/// `op` 收到从 1 开始的尝试序号。只在失败且还有剩余次数时等待，
/// 最后一次失败后不再等待。`max_attempts == 0` 时不调用 `op`。
pub async fn retry_or_fallback<T, E, Op, Fut, Fb>(
    policy: RetryPolicy,
    label: &str,
    mut op: Op,
    fallback: Fb,
) -> RetryOutcome<T, E>
where
    Op: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    Fb: FnOnce() -> T,
{
    let mut last_error = None;

    for attempt in 1..=policy.max_attempts {
        match op(attempt).await {
            Ok(value) => {
                return RetryOutcome::Succeeded {
                    value,
                    attempts: attempt,
                }
            }
            Err(e) => {
                if attempt < policy.max_attempts {
                    warn!(
                        "{} 失败 (尝试 {}/{}): {}，等待 {:?} 后重试...",
                        label, attempt, policy.max_attempts, e, policy.delay
                    );
                    sleep(policy.delay).await;
                } else {
                    warn!(
                        "{} 失败 (尝试 {}/{}): {}",
                        label, attempt, policy.max_attempts, e
                    );
                }
                last_error = Some(e);
            }
        }
    }

    RetryOutcome::Exhausted {
        value: fallback(),
        attempts: policy.max_attempts,
        last_error,
    }
}
