use anyhow::Context;
use prometheus::register_int_counter_vec;
use prometheus::IntCounterVec;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref QUIZ_DRAWS: IntCounterVec = register_int_counter_vec!(
        "quiz_draws_total",
        "Number of quiz draws by outcome",
        &["outcome"]
    )
    .unwrap();
}

/// Installs the global subscriber. `LOG_LEVEL` overrides `default_filter`;
/// `INCLUDE_SPAN_EVENTS=true` also logs span enter/exit.
pub fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    let span_events = match std::env::var("INCLUDE_SPAN_EVENTS") {
        Ok(value) if value.eq_ignore_ascii_case("true") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::NONE,
    };
    let fmt_layer = fmt::layer().with_span_events(span_events);
    let filter_layer = match EnvFilter::try_from_env("LOG_LEVEL") {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .with_context(|| format!("Invalid log filter {default_filter:?}"))?,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()
        .context("Tracing subscriber already installed")
}

/// Prometheus text exposition of every registered metric.
pub fn encode_metrics() -> Result<(String, Vec<u8>), prometheus::Error> {
    use prometheus::{Encoder, TextEncoder};

    let encoder = TextEncoder::new();
    let mut buf = vec![];
    encoder.encode(&prometheus::gather(), &mut buf)?;
    Ok((encoder.format_type().to_owned(), buf))
}
