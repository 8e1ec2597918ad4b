use std::panic;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Log line format selected with `SM_LOG_FORMAT` (`text` | `json`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        match std::env::var("SM_LOG_FORMAT") {
            Ok(value) if value.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Route panics through `tracing` so they land in the same sink as the batch logs.
/// Installed once per process.
pub fn install_tracing_panic_hook(app_name: &'static str) {
    static INSTALLED: OnceLock<()> = OnceLock::new();

    INSTALLED.get_or_init(|| {
        let default_hook = panic::take_hook();
        let include_backtrace = std::env::var("SM_LOG_INCLUDE_BACKTRACE")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        panic::set_hook(Box::new(move |info| {
            let location = info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()));
            let message = info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic payload not string".into());

            tracing::error!(
                application = app_name,
                location = location.as_deref().unwrap_or("unknown"),
                panic_message = %message,
                "panic captured"
            );

            if include_backtrace {
                default_hook(info);
            }
        }));
    });
}

/// stdout はレポート出力に使うため、ログは stderr か `SM_LOG_DIR` のファイルへ出す
fn log_writer(app_name: &'static str) -> BoxMakeWriter {
    let Some(dir) = std::env::var_os("SM_LOG_DIR").map(std::path::PathBuf::from) else {
        return BoxMakeWriter::new(std::io::stderr);
    };

    if let Err(err) = std::fs::create_dir_all(&dir) {
        eprintln!("failed to create SM_LOG_DIR {}: {err}; logging to stderr", dir.display());
        return BoxMakeWriter::new(std::io::stderr);
    }

    let appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    BoxMakeWriter::new(non_blocking)
}

/// Initialize the global subscriber.
///
/// Filtering follows `RUST_LOG` (default `info`). `SM_LOG_FORMAT=json` switches to
/// JSON lines; `SM_LOG_DIR` enables daily-rotated `<dir>/<app>.log` files.
/// Calling this more than once is harmless.
pub fn init_tracing_subscriber(app_name: &'static str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(log_writer(app_name));

    let _ = match LogFormat::from_env() {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
}
