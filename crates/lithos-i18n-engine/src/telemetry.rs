// SPDX-License-Identifier: Apache-2.0 OR MIT
#![cfg_attr(not(feature = "telemetry"), allow(dead_code))]

#[cfg(feature = "telemetry")]
mod otel {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::OnceLock;
    use std::time::Duration;

    use opentelemetry::global;
    use opentelemetry::metrics::{Counter, Histogram};
    use opentelemetry::trace::SpanKind;
    use opentelemetry::{trace::Span, trace::Tracer, KeyValue};

    const METER_NAME: &str = "lithos_i18n";
    const TRACER_NAME: &str = "lithos_i18n";

    static ENABLED: AtomicBool = AtomicBool::new(false);
    static HANDLES: OnceLock<Handles> = OnceLock::new();

    struct Handles {
        tracer: opentelemetry::global::BoxedTracer,
        extract_hist: Histogram<f64>,
        extract_counter: Counter<u64>,
        message_counter: Counter<u64>,
        skipped_counter: Counter<u64>,
        prune_counter: Counter<u64>,
        prune_hist: Histogram<f64>,
    }

    impl Handles {
        fn new() -> Self {
            let meter = global::meter(METER_NAME);
            let extract_hist = meter
                .f64_histogram("lithos.extract.duration_ms")
                .with_description("Message extraction duration in milliseconds")
                .init();
            let extract_counter = meter
                .u64_counter("lithos.extract.count")
                .with_description("Number of templates scanned for messages")
                .init();
            let message_counter = meter
                .u64_counter("lithos.extract.messages")
                .with_description("Number of messages extracted")
                .init();
            let skipped_counter = meter
                .u64_counter("lithos.extract.skipped")
                .with_description("Number of messages skipped after a decomposition failure")
                .init();
            let prune_counter = meter
                .u64_counter("lithos.prune.count")
                .with_description("Number of templates pruned of translator comments")
                .init();
            let prune_hist = meter
                .f64_histogram("lithos.prune.duration_ms")
                .with_description("Pruning duration in milliseconds")
                .init();
            let tracer = global::tracer(TRACER_NAME);
            Self {
                tracer,
                extract_hist,
                extract_counter,
                message_counter,
                skipped_counter,
                prune_counter,
                prune_hist,
            }
        }
    }

    fn handles() -> &'static Handles {
        HANDLES.get_or_init(Handles::new)
    }

    pub fn enable() {
        ENABLED.store(true, Ordering::Relaxed);
    }

    pub fn disable() {
        ENABLED.store(false, Ordering::Relaxed);
    }

    fn enabled() -> bool {
        ENABLED.load(Ordering::Relaxed)
    }

    pub fn record_extract(source: &str, source_len: usize, duration: Duration, messages: usize) {
        if !enabled() {
            return;
        }
        let hs = handles();
        let duration_ms = duration.as_secs_f64() * 1_000.0;
        let attrs = [
            KeyValue::new("template.name", source.to_string()),
            KeyValue::new("template.length", source_len as i64),
        ];
        hs.extract_counter.add(1, &attrs);
        hs.extract_hist.record(duration_ms, &attrs);
        hs.message_counter.add(messages as u64, &attrs);
        let mut span = hs
            .tracer
            .span_builder("Extractor::extract")
            .with_kind(SpanKind::Internal)
            .start(&hs.tracer);
        span.set_attribute(KeyValue::new("template.name", source.to_string()));
        span.set_attribute(KeyValue::new("template.length", source_len as i64));
        span.set_attribute(KeyValue::new("extract.duration_ms", duration_ms));
        span.set_attribute(KeyValue::new("extract.messages", messages as i64));
        span.end();
    }

    pub fn record_skipped(key: &str) {
        if !enabled() {
            return;
        }
        let attrs = [KeyValue::new("message.key", key.to_string())];
        handles().skipped_counter.add(1, &attrs);
    }

    pub fn record_prune(input_len: usize, output_len: usize, duration: Duration) {
        if !enabled() {
            return;
        }
        let hs = handles();
        let attrs = [
            KeyValue::new("template.length", input_len as i64),
            KeyValue::new("prune.removed", input_len.saturating_sub(output_len) as i64),
        ];
        hs.prune_counter.add(1, &attrs);
        hs.prune_hist
            .record(duration.as_secs_f64() * 1_000.0, &attrs);
    }
}

#[cfg(not(feature = "telemetry"))]
mod otel {
    use std::time::Duration;

    pub fn enable() {}
    pub fn disable() {}
    pub fn record_extract(
        _source: &str,
        _source_len: usize,
        _duration: Duration,
        _messages: usize,
    ) {
    }
    pub fn record_skipped(_key: &str) {}
    pub fn record_prune(_input_len: usize, _output_len: usize, _duration: Duration) {}
}

pub use otel::{disable, enable, record_extract, record_prune, record_skipped};
