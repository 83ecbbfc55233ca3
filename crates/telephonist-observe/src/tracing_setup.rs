//! Tracing subscriber initialization with structured logging and optional
//! OpenTelemetry trace export.
//!
//! # Usage
//!
//! ```no_run
//! use telephonist_observe::tracing_setup::{TracingOptions, init_tracing};
//!
//! init_tracing(&TracingOptions::default()).unwrap();
//! ```

use std::sync::OnceLock;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Stores the OTel tracer provider so it can be shut down cleanly on exit.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// How the global subscriber is assembled.
#[derive(Debug, Clone)]
pub struct TracingOptions {
    /// Filter used when `RUST_LOG` is unset.
    pub default_filter: String,
    /// Emit newline-delimited JSON instead of human-readable lines.
    pub json: bool,
    /// Bridge spans to OpenTelemetry with a stdout exporter.
    pub otel: bool,
}

impl Default for TracingOptions {
    fn default() -> Self {
        Self {
            default_filter: default_filter(0, false).to_string(),
            json: false,
            otel: false,
        }
    }
}

/// Default filter for a CLI verbosity level.
///
/// `quiet` wins over any `-v` count.
pub fn default_filter(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "info",
        1 => "debug,hyper=info,sqlx=warn",
        _ => "trace",
    }
}

/// Initialize the global tracing subscriber.
///
/// Respects `RUST_LOG`, falling back to `options.default_filter`. Spans log
/// their close with timing, which covers each chat completion call.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been set.
pub fn init_tracing(options: &TracingOptions) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&options.default_filter));

    let text_layer = (!options.json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
    });
    let json_layer = options.json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_events(FmtSpan::CLOSE)
    });

    let otel_layer = options.otel.then(|| {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer("telephonist");

        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);

        tracing_opentelemetry::layer().with_tracer(tracer)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(text_layer)
        .with(json_layer)
        .with(otel_layer)
        .try_init()
}

/// Flush pending traces and shut down the OpenTelemetry tracer provider.
///
/// No-op when OTel was not enabled.
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: OTel tracer provider shutdown error: {e}");
        }
    }
}
