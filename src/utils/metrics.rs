use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default, Serialize, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub forecast_total: u64,
    /// Failed forecast requests keyed by stage.
    pub forecast_failures: BTreeMap<String, u64>,
    /// Outbound HTTP attempts keyed by upstream service.
    pub upstream_requests: BTreeMap<String, u64>,
}

#[derive(Debug, Default, Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsSnapshot>>,
}

impl MetricsCollector {
    pub fn global() -> &'static MetricsCollector {
        static INSTANCE: Lazy<MetricsCollector> = Lazy::new(MetricsCollector::new);
        &INSTANCE
    }

    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsSnapshot::default())),
        }
    }

    pub fn record_forecast_request(&self) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.forecast_total += 1;
        }
    }

    pub fn record_forecast_failure(&self, stage: &str) {
        if let Ok(mut guard) = self.inner.lock() {
            *guard.forecast_failures.entry(stage.to_string()).or_insert(0) += 1;
        }
    }

    pub fn record_upstream_request(&self, service: &str) {
        if let Ok(mut guard) = self.inner.lock() {
            *guard.upstream_requests.entry(service.to_string()).or_insert(0) += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

impl MetricsSnapshot {
    /// Prometheus text exposition format.
    pub fn to_prometheus(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(
            out,
            "# HELP forecast_total times the /api/v1/forecast endpoint was called"
        );
        let _ = writeln!(out, "# TYPE forecast_total counter");
        let _ = writeln!(out, "forecast_total {}", self.forecast_total);

        write_labelled(
            &mut out,
            "forecast_failures_total",
            "failed forecast requests by stage",
            "stage",
            &self.forecast_failures,
        );
        write_labelled(
            &mut out,
            "upstream_requests_total",
            "outbound HTTP attempts by upstream service",
            "service",
            &self.upstream_requests,
        );

        out
    }
}

fn write_labelled(
    out: &mut String,
    name: &str,
    help: &str,
    label: &str,
    values: &BTreeMap<String, u64>,
) {
    let _ = writeln!(out, "# HELP {} {}", name, help);
    let _ = writeln!(out, "# TYPE {} counter", name);
    for (key, value) in values {
        let _ = writeln!(out, "{}{{{}=\"{}\"}} {}", name, label, escape_label(key), value);
    }
}

fn escape_label(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
