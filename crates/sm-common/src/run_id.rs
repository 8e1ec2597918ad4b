//! Process-level run ID for a batch invocation.
//!
//! The first call to [`get`] mints a ULID that lives for the whole process.
//! `sm-batch` stamps it on:
//! - the `batch` tracing span, so every log line of one run can be grepped together
//! - `BatchReport::run_id`, so a saved report points back at its logs
//!
//! Because ULIDs sort by creation time, reports from successive runs order
//! chronologically by ID alone.
//!
//! # Example
//! ```
//! use sm_common::run_id;
//!
//! let run = run_id::get();
//! assert_eq!(run, run_id::get());
//!
//! // scratch names (e.g. temporary ontology files in tests) use a fresh one
//! let scratch = format!("ontology-{}.nt", run_id::generate());
//! assert_ne!(scratch, format!("ontology-{run}.nt"));
//! ```

use once_cell::sync::Lazy;
use ulid::Ulid;

static BATCH_RUN_ID: Lazy<Ulid> = Lazy::new(Ulid::new);
static BATCH_RUN_ID_TEXT: Lazy<String> = Lazy::new(|| BATCH_RUN_ID.to_string());

/// このプロセスのバッチ実行 ID（26文字、初回呼び出し時に採番）
pub fn get() -> &'static str {
    BATCH_RUN_ID_TEXT.as_str()
}

/// 採番時刻。ログとレポートの突き合わせ用
pub fn started_at_ms() -> u64 {
    BATCH_RUN_ID.timestamp_ms()
}

/// 使い捨ての ULID を新規発行する
pub fn generate() -> String {
    Ulid::new().to_string()
}
