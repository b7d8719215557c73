use std::sync::atomic::AtomicBool;
use std::time::Duration;

use vocab_enricher::models::word_record::{FAILED_IPA, FAILED_TRANSLATION};
use vocab_enricher::services::{MockBehavior, MockRequester};
use vocab_enricher::utils::logging;
use vocab_enricher::{App, BatchFlow, BatchProcessor, Config, ExampleFormat, RetryPolicy};

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|w| w.to_string()).collect()
}

fn processor(mock: MockRequester, batch_size: usize) -> BatchProcessor<MockRequester> {
    let flow = BatchFlow::new(
        mock,
        RetryPolicy::new(3, Duration::from_secs(2)),
        ExampleFormat::Plain,
    );
    BatchProcessor::new(flow, batch_size)
}

#[tokio::test]
async fn test_pipeline_end_to_end_with_echo() {
    logging::init(false);

    let mock = MockRequester::echo();
    let input = words(&["a", "cat", "run", "sun"]);

    let result = processor(mock.clone(), 3).process(&input, |_| {}).await;

    assert_eq!(mock.batch_sizes(), vec![3, 1]);
    assert_eq!(result.len(), 4);
    assert!(result.is_complete());

    let a = &result.records[0];
    assert_eq!(a.word(), "a");
    assert_eq!(a.ipa(), "[ ə ]");

    let cat = &result.records[1];
    assert_eq!(cat.ipa(), "[ cat ]");
    assert_eq!(cat.translation(), "cat-번역");
    assert_eq!(cat.combined_example(), "I like cat. (cat 예문.)");
}

#[tokio::test(start_paused = true)]
async fn test_third_attempt_success_through_processor() {
    let mock = MockRequester::fail_first(2);
    let input = words(&["cat", "dog"]);

    let result = processor(mock.clone(), 10).process(&input, |_| {}).await;

    assert_eq!(mock.calls(), 3);
    assert_eq!(result.batches[0].attempts, 3);
    assert!(!result.batches[0].degraded);
    assert_eq!(result.records[1].translation(), "dog-번역");
}

#[tokio::test(start_paused = true)]
async fn test_every_attempt_fails_gives_sentinels() {
    let mock = MockRequester::new(MockBehavior::Failing);
    let input: Vec<String> = (0..23).map(|i| format!("word{}", i)).collect();

    let result = processor(mock.clone(), 10).process(&input, |_| {}).await;

    assert_eq!(result.len(), input.len());
    assert_eq!(mock.calls(), 9);
    for (record, word) in result.records.iter().zip(&input) {
        assert_eq!(record.word(), word);
        assert_eq!(record.ipa(), FAILED_IPA);
        assert_eq!(record.translation(), FAILED_TRANSLATION);
    }
}

#[tokio::test]
async fn test_trailing_period_format() {
    let flow = BatchFlow::new(
        MockRequester::echo(),
        RetryPolicy::default(),
        ExampleFormat::TrailingPeriod,
    );
    let result = BatchProcessor::new(flow, 10)
        .process(&words(&["sun"]), |_| {})
        .await;

    assert_eq!(result.records[0].combined_example(), "I like sun. (sun 예문.).");
}

/// 服务不可达时整条流程仍然完成，并写出结果和失败记录
#[tokio::test]
async fn test_app_with_unreachable_service_writes_fallbacks() {
    let dir = tempfile::tempdir().unwrap();
    let input_file = dir.path().join("words.csv");
    std::fs::write(&input_file, "Word\ncat\ndog\na\n").unwrap();

    let path = |name: &str| dir.path().join(name).to_string_lossy().to_string();
    let config = Config {
        batch_size: 2,
        max_attempts: 1,
        retry_delay_secs: 0,
        input_file: input_file.to_string_lossy().to_string(),
        output_file: path("out.json"),
        warn_file: path("warn.txt"),
        output_log_file: path("output.txt"),
        llm_api_key: "test".to_string(),
        llm_api_base_url: "http://127.0.0.1:9/v1".to_string(),
        ..Config::default()
    };

    let app = App::initialize(config).unwrap();
    let result = app.run(&AtomicBool::new(false)).await.unwrap();

    assert_eq!(result.len(), 3);
    assert!(result.records.iter().all(|r| r.is_fallback()));

    let warn = std::fs::read_to_string(dir.path().join("warn.txt")).unwrap();
    assert_eq!(warn.lines().count(), 2);

    let out: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("out.json")).unwrap())
            .unwrap();
    assert_eq!(out["records"].as_array().unwrap().len(), 3);
    assert_eq!(out["records"][2]["word"], "a");
}

/// 真实 LLM 调用
///
/// 运行方式：`LLM_API_KEY=... cargo test -- --ignored`
#[tokio::test]
#[ignore]
async fn test_live_llm_small_batch() {
    logging::init(true);

    let config = Config::from_env().expect("读取环境变量失败");
    let flow = BatchFlow::from_config(vocab_enricher::LlmService::new(&config), &config);
    let input = words(&["a", "apple", "jump"]);

    let result = BatchProcessor::new(flow, config.batch_size)
        .process(&input, |_| {})
        .await;

    for record in &result.records {
        println!("{}", record);
    }
    assert_eq!(result.len(), 3);
    assert_eq!(result.records[0].ipa(), "[ ə ]");
}
