//! 返回内容归一化 - 业务能力层
//!
//! 把一批的 `BatchReply` 转成 `WordRecord` 列表。这里从不报错：
//! 缺字段一律填默认值。

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::models::word_record::{NO_EXAMPLE, NO_EXAMPLE_TRANSLATION, NO_IPA, NO_TRANSLATION};
use crate::models::{BatchReply, ExampleFormat, FieldValue, ReplyEntry, WordRecord};

/// 模型用来代替 ə 的占位符
const SCHWA_PLACEHOLDER: char = '@';
const SCHWA: char = 'ə';

/// 按返回条目的顺序生成记录
///
/// 条目缺少 `word` 时，用原批次同位置的单词补上。
pub fn normalize_reply(reply: BatchReply, batch: &[String], format: ExampleFormat) -> Vec<WordRecord> {
    reply
        .translations
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            let fallback_word = batch.get(idx).map(String::as_str).unwrap_or_default();
            normalize_entry(entry, fallback_word, format)
        })
        .collect()
}

/// 归一化单个条目
pub fn normalize_entry(entry: ReplyEntry, fallback_word: &str, format: ExampleFormat) -> WordRecord {
    let word = text_or(entry.word, fallback_word);
    let raw_ipa = text_or(entry.ipa, NO_IPA);
    let ipa = normalize_ipa(&word, &raw_ipa);

    WordRecord::new(
        word,
        ipa,
        text_or(entry.translation, NO_TRANSLATION),
        text_or(entry.example, NO_EXAMPLE),
        text_or(entry.example_translation, NO_EXAMPLE_TRANSLATION),
        format,
    )
}

/// 发音归一化
///
/// 顺序：去空白 → `@` 换成 ə → 冠词 "a" 固定为 ə → 去掉斜杠后加 `[ ... ]`。
/// 仍是默认值时不加括号。
pub fn normalize_ipa(word: &str, raw: &str) -> String {
    let mut ipa = raw.trim().replace(SCHWA_PLACEHOLDER, &SCHWA.to_string());

    // 不定冠词在连读中弱读
    if word.trim().eq_ignore_ascii_case("a") {
        ipa = SCHWA.to_string();
    }
    if ipa == NO_IPA {
        return ipa;
    }

    let stripped = ipa.replace('/', "");
    let stripped = stripped.trim();
    let inner = stripped
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(stripped)
        .trim();

    if inner.is_empty() {
        return NO_IPA.to_string();
    }
    format!("[ {} ]", inner)
}

/// 让记录与原批次一一对应
///
/// 按单词（忽略大小写和首尾空白）匹配返回记录，匹配上的记录换回输入里的原词；
/// 模型漏掉的单词按缺字段处理，多出来的记录丢弃。重复单词按出现次序依次匹配。
pub fn align_to_batch(records: Vec<WordRecord>, batch: &[String], format: ExampleFormat) -> Vec<WordRecord> {
    let mut pool: HashMap<String, Vec<WordRecord>> = HashMap::new();
    for record in records.into_iter().rev() {
        pool.entry(match_key(record.word())).or_default().push(record);
    }

    let aligned: Vec<WordRecord> = batch
        .iter()
        .map(|word| {
            match pool.get_mut(&match_key(word)).and_then(Vec::pop) {
                Some(record) => record.with_word(word.as_str()),
                None => {
                    warn!("⚠️ 返回结果中缺少单词 '{}'，使用默认值", word);
                    normalize_entry(ReplyEntry::for_word(word), word, format)
                }
            }
        })
        .collect();

    let extra: usize = pool.values().map(Vec::len).sum();
    if extra > 0 {
        debug!("丢弃 {} 条不属于本批的返回记录", extra);
    }
    aligned
}

/// 返回记录中是否至少有一条属于本批
pub fn matches_any(records: &[WordRecord], batch: &[String]) -> bool {
    records
        .iter()
        .any(|record| batch.iter().any(|word| match_key(word) == match_key(record.word())))
}

fn match_key(word: &str) -> String {
    word.trim().to_lowercase()
}

fn text_or(value: Option<FieldValue>, default: &str) -> String {
    value
        .map(FieldValue::into_text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn entry(word: &str, ipa: &str) -> ReplyEntry {
        ReplyEntry {
            word: Some(word.into()),
            ipa: Some(ipa.into()),
            translation: Some("번역".into()),
            example: Some("Example.".into()),
            example_translation: Some("예문.".into()),
        }
    }

    #[test]
    fn test_schwa_then_slash_then_bracket() {
        assert_eq!(normalize_ipa("cat", "/k@t/"), "[ kət ]");
        assert_eq!(normalize_ipa("cat", "  /kæt/  "), "[ kæt ]");
    }

    #[test]
    fn test_article_override() {
        assert_eq!(normalize_ipa("a", "/eɪ/"), "[ ə ]");
        assert_eq!(normalize_ipa("A", "whatever"), "[ ə ]");
        assert_eq!(normalize_ipa("a", NO_IPA), "[ ə ]");
    }

    #[test]
    fn test_sentinel_not_bracketed() {
        assert_eq!(normalize_ipa("cat", NO_IPA), NO_IPA);
        assert_eq!(normalize_ipa("cat", "//"), NO_IPA);
    }

    #[test]
    fn test_already_bracketed_not_doubled() {
        assert_eq!(normalize_ipa("dog", "[dɔɡ]"), "[ dɔɡ ]");
    }

    #[test]
    fn test_missing_fields_default() {
        let reply = BatchReply {
            translations: vec![ReplyEntry::for_word("sun")],
        };
        let records = normalize_reply(reply, &batch(&["sun"]), ExampleFormat::Plain);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.word(), "sun");
        assert_eq!(record.ipa(), NO_IPA);
        assert_eq!(record.translation(), NO_TRANSLATION);
        assert_eq!(record.example(), NO_EXAMPLE);
        assert_eq!(record.example_translation(), NO_EXAMPLE_TRANSLATION);
        assert_eq!(
            record.combined_example(),
            "no example available (no example translation available)"
        );
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let reply = BatchReply {
            translations: vec![ReplyEntry {
                word: Some("  ".into()),
                translation: Some("   ".into()),
                ..ReplyEntry::default()
            }],
        };
        let records = normalize_reply(reply, &batch(&["moon"]), ExampleFormat::Plain);
        assert_eq!(records[0].word(), "moon");
        assert_eq!(records[0].translation(), NO_TRANSLATION);
    }

    #[test]
    fn test_response_order_governs() {
        let reply = BatchReply {
            translations: vec![entry("dog", "/dɔɡ/"), entry("cat", "/kæt/")],
        };
        let records = normalize_reply(reply, &batch(&["cat", "dog"]), ExampleFormat::Plain);
        let words: Vec<_> = records.iter().map(WordRecord::word).collect();
        assert_eq!(words, vec!["dog", "cat"]);
    }

    #[test]
    fn test_matches_any() {
        let words = batch(&["Running", "mice"]);
        let lemmas = vec![
            normalize_entry(entry("run", "/rʌn/"), "", ExampleFormat::Plain),
            normalize_entry(entry("mouse", "/maʊs/"), "", ExampleFormat::Plain),
        ];
        assert!(!matches_any(&lemmas, &words));
        assert!(!matches_any(&[], &words));

        let partial = vec![normalize_entry(entry("running ", "/ˈrʌnɪŋ/"), "", ExampleFormat::Plain)];
        assert!(matches_any(&partial, &words));
    }

    #[test]
    fn test_align_reordered_and_partial_reply() {
        let words = batch(&["cat", "dog", "a", "cat"]);
        let records = vec![
            normalize_entry(entry("Dog", "/dɔɡ/"), "", ExampleFormat::Plain),
            normalize_entry(entry("cat", "/kæt/"), "", ExampleFormat::Plain),
            normalize_entry(entry("bird", "/bɜːd/"), "", ExampleFormat::Plain),
        ];

        let aligned = align_to_batch(records, &words, ExampleFormat::Plain);
        assert_eq!(aligned.len(), 4);
        assert_eq!(aligned[0].ipa(), "[ kæt ]");
        assert_eq!(aligned[1].word(), "dog");
        assert_eq!(aligned[1].ipa(), "[ dɔɡ ]");
        // 模型漏掉的冠词仍然得到弱读发音
        assert_eq!(aligned[2].word(), "a");
        assert_eq!(aligned[2].ipa(), "[ ə ]");
        assert_eq!(aligned[2].translation(), NO_TRANSLATION);
        // 第二个 cat 没有对应记录
        assert_eq!(aligned[3].word(), "cat");
        assert_eq!(aligned[3].ipa(), NO_IPA);
    }
}
