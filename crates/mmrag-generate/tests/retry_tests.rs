use std::collections::VecDeque;
use std::fs;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;

use mmrag_core::config::GenerationSettings;
use mmrag_core::error::Error;
use mmrag_core::traits::{CompletionApi, CompletionError, CompletionRequest};
use mmrag_generate::{Backoff, ErrorLog, FileErrorLog, FixedDelay, MemoryErrorLog, NoDelay, ResilientGenerator, RetryPolicy};

/// Replays a fixed script of outcomes, then keeps repeating the last one.
#[derive(Clone)]
struct ScriptedApi {
    script: Arc<Mutex<VecDeque<Result<String, CompletionError>>>>,
    last: Result<String, CompletionError>,
    calls: Arc<AtomicU32>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedApi {
    fn new(script: Vec<Result<String, CompletionError>>) -> Self {
        let last = script.last().cloned().unwrap_or_else(|| Err(CompletionError::Fatal("empty script".into())));
        Self {
            script: Arc::new(Mutex::new(script.into())),
            last,
            calls: Arc::new(AtomicU32::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
    fn calls(&self) -> u32 { self.calls.load(Ordering::SeqCst) }
}

impl CompletionApi for ScriptedApi {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.script.lock().unwrap().pop_front().unwrap_or_else(|| self.last.clone())
    }
}

#[derive(Clone, Default)]
struct CountingDelay { waits: Arc<Mutex<Vec<u32>>> }

impl Backoff for CountingDelay {
    fn delay(&self, attempt: u32) -> Duration { Duration::from_millis(u64::from(attempt) * 10) }
    fn wait(&self, attempt: u32) { self.waits.lock().unwrap().push(attempt); }
}

fn transient() -> Result<String, CompletionError> { Err(CompletionError::Transient("503 Service Unavailable".into())) }

fn generator(api: &ScriptedApi, delay: &CountingDelay, log: &MemoryErrorLog, attempts: u32) -> ResilientGenerator {
    ResilientGenerator::new(
        Box::new(api.clone()),
        Box::new(delay.clone()),
        Box::new(log.clone()),
        RetryPolicy { attempts },
        "llama3-70b-8192",
        1000,
    )
    .expect("generator")
}

#[test]
fn succeeds_on_third_attempt_after_two_delays() {
    let api = ScriptedApi::new(vec![transient(), transient(), Ok("The cat sat on the mat.".into())]);
    let delay = CountingDelay::default();
    let log = MemoryErrorLog::new();
    let answer = generator(&api, &delay, &log, 3)
        .generate("Where did the cat sit?", &["The cat sat.".into()], &[])
        .expect("answer");
    assert_eq!(answer, "The cat sat on the mat.");
    assert_eq!(api.calls(), 3);
    assert_eq!(*delay.waits.lock().unwrap(), vec![1, 2]);
    assert!(log.entries().is_empty());
}

#[test]
fn exhausted_retries_fail_after_three_attempts_with_one_log_entry() {
    let api = ScriptedApi::new(vec![transient()]);
    let delay = CountingDelay::default();
    let log = MemoryErrorLog::new();
    let err = generator(&api, &delay, &log, 3).generate("q", &[], &[]).unwrap_err();
    assert!(matches!(err, Error::Generation { attempts: 3, .. }), "got {err:?}");
    assert_eq!(api.calls(), 3);
    assert_eq!(delay.waits.lock().unwrap().len(), 2, "no wait after the final attempt");
    let entries = log.entries();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].contains("503 Service Unavailable"));
    assert!(entries[0].contains("query=\"q\""));
}

#[test]
fn fatal_errors_are_not_retried() {
    let api = ScriptedApi::new(vec![Err(CompletionError::Fatal("400 Bad Request".into())), Ok("unused".into())]);
    let delay = CountingDelay::default();
    let log = MemoryErrorLog::new();
    let err = generator(&api, &delay, &log, 3).generate("q", &[], &[]).unwrap_err();
    assert!(matches!(err, Error::Generation { attempts: 1, .. }));
    assert_eq!(api.calls(), 1);
    assert!(delay.waits.lock().unwrap().is_empty());
    assert_eq!(log.entries().len(), 1);
}

#[test]
fn request_carries_model_limits_and_grounded_prompt() {
    let api = ScriptedApi::new(vec![Ok("ok".into())]);
    let gen = generator(&api, &CountingDelay::default(), &MemoryErrorLog::new(), 3);
    gen.generate("What is shown?", &["chunk one".into(), "chunk two".into()], &["imgs/p1_1.png".into()]).unwrap();
    let requests = api.requests.lock().unwrap();
    let req = &requests[0];
    assert_eq!(req.model, "llama3-70b-8192");
    assert_eq!(req.max_tokens, 1000);
    assert!(req.system_prompt.contains("answers questions based on the provided context"));
    assert!(req.user_prompt.contains("chunk one\nchunk two"));
    assert!(req.user_prompt.contains("Query: What is shown?"));
    assert!(req.user_prompt.contains("imgs/p1_1.png"));
}

#[test]
fn zero_attempt_policy_is_rejected() {
    let api = ScriptedApi::new(vec![Ok("ok".into())]);
    let result = ResilientGenerator::new(
        Box::new(api),
        Box::new(CountingDelay::default()),
        Box::new(MemoryErrorLog::new()),
        RetryPolicy { attempts: 0 },
        "m",
        10,
    );
    assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
}

#[test]
fn file_error_log_appends_one_line_per_entry() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("groq_errors.log");
    let log = FileErrorLog::new(&path);
    log.record("first failure").unwrap();
    log.record("second\nfailure").unwrap();
    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("ERROR first failure"));
    assert!(lines[1].ends_with("ERROR second failure"));
}

#[test]
fn defaults_are_three_attempts_five_seconds_apart() {
    assert_eq!(RetryPolicy::default().attempts, 3);
    assert_eq!(FixedDelay::default().delay(1), Duration::from_secs(5));
    assert_eq!(NoDelay.delay(2), Duration::ZERO);
}

#[test]
fn injected_backoff_decides_the_pause() {
    let gen = generator(&ScriptedApi::new(vec![Ok("ok".into())]), &CountingDelay::default(), &MemoryErrorLog::new(), 3);
    assert_eq!(gen.delay_after(1), Duration::from_millis(10));
    assert_eq!(gen.delay_after(2), Duration::from_millis(20));
}

#[test]
fn configured_retry_delay_drives_the_backoff() {
    let tmp = TempDir::new().unwrap();
    std::env::set_var("MMRAG_RETRY_TEST_KEY", "test-key");
    let settings = GenerationSettings {
        retries: 4,
        retry_delay_secs: 7,
        api_key_env: "MMRAG_RETRY_TEST_KEY".into(),
        error_log: tmp.path().join("errors.log").to_string_lossy().to_string(),
        ..GenerationSettings::default()
    };
    let gen = ResilientGenerator::from_settings(&settings).expect("generator");
    assert_eq!(gen.policy(), RetryPolicy { attempts: 4 });
    assert_eq!(gen.delay_after(1), Duration::from_secs(7));
}
