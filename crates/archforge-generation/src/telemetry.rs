//! Generation telemetry
//!
//! The generator reports through a [`TelemetrySink`]. Sinks never fail the
//! generation they observe: registration or encoding problems are logged and
//! the sample is dropped.

use std::collections::{BTreeMap, HashMap};

use parking_lot::{Mutex, RwLock};
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use tracing::warn;

/// Counter incremented once per generated file
pub const FILES_GENERATED: &str = "archforge_files_generated_total";
/// Histogram of batch wall time in milliseconds
pub const GENERATION_DURATION: &str = "archforge_generation_duration_ms";

const DURATION_BUCKETS_MS: [f64; 10] = [1.0, 2.5, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0];

/// Destination for generation metrics
pub trait TelemetrySink: Send + Sync {
    /// Add one to the counter `name`
    fn increment_counter(&self, name: &str, labels: &[(&str, &str)]);

    /// Record one observation of the histogram `name`
    fn record_histogram(&self, name: &str, value: f64, labels: &[(&str, &str)]);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl TelemetrySink for NoopTelemetry {
    fn increment_counter(&self, _name: &str, _labels: &[(&str, &str)]) {}

    fn record_histogram(&self, _name: &str, _value: f64, _labels: &[(&str, &str)]) {}
}

type SeriesKey = (String, Vec<(String, String)>);

fn series_key(name: &str, labels: &[(&str, &str)]) -> SeriesKey {
    let mut labels: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    labels.sort();
    (name.to_string(), labels)
}

/// Keeps every sample in memory, for tests and dry runs
#[derive(Debug, Default)]
pub struct InMemoryTelemetry {
    counters: RwLock<BTreeMap<SeriesKey, u64>>,
    histograms: RwLock<BTreeMap<SeriesKey, Vec<f64>>>,
}

impl InMemoryTelemetry {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of one counter series
    pub fn counter(&self, name: &str, labels: &[(&str, &str)]) -> u64 {
        self.counters
            .read()
            .get(&series_key(name, labels))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of every series of a counter
    pub fn counter_total(&self, name: &str) -> u64 {
        self.counters
            .read()
            .iter()
            .filter(|((n, _), _)| n == name)
            .map(|(_, v)| *v)
            .sum()
    }

    /// Observations of one histogram series, in recording order
    pub fn histogram(&self, name: &str, labels: &[(&str, &str)]) -> Vec<f64> {
        self.histograms
            .read()
            .get(&series_key(name, labels))
            .cloned()
            .unwrap_or_default()
    }
}

impl TelemetrySink for InMemoryTelemetry {
    fn increment_counter(&self, name: &str, labels: &[(&str, &str)]) {
        *self.counters.write().entry(series_key(name, labels)).or_insert(0) += 1;
    }

    fn record_histogram(&self, name: &str, value: f64, labels: &[(&str, &str)]) {
        self.histograms
            .write()
            .entry(series_key(name, labels))
            .or_default()
            .push(value);
    }
}

/// A registered metric family and the sorted label names it was created with
struct Family<V> {
    metric: V,
    label_names: Vec<String>,
}

impl<V> Family<V> {
    fn accepts(&self, names: &[&str]) -> bool {
        self.label_names.len() == names.len()
            && self.label_names.iter().zip(names).all(|(a, b)| a == b)
    }
}

/// Exposes metrics through a `prometheus::Registry`
///
/// Metric families are registered on first use with the label names of that
/// first sample. Later samples with different label names are dropped.
pub struct PrometheusTelemetry {
    registry: Registry,
    counters: Mutex<HashMap<String, Family<IntCounterVec>>>,
    histograms: Mutex<HashMap<String, Family<HistogramVec>>>,
}

impl Default for PrometheusTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl PrometheusTelemetry {
    /// Sink over a fresh registry
    pub fn new() -> Self {
        Self::with_registry(Registry::new())
    }

    /// Sink over an existing registry
    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            counters: Mutex::new(HashMap::new()),
            histograms: Mutex::new(HashMap::new()),
        }
    }

    /// Underlying registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Prometheus text exposition of everything recorded so far
    pub fn gather_text(&self) -> String {
        TextEncoder::new()
            .encode_to_string(&self.registry.gather())
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to encode metrics");
                String::new()
            })
    }

    fn label_parts<'a>(labels: &'a [(&'a str, &'a str)]) -> (Vec<&'a str>, Vec<&'a str>) {
        let mut sorted = labels.to_vec();
        sorted.sort();
        sorted.into_iter().unzip()
    }

    /// Family for `name`, registering it with `names` on first use
    ///
    /// `None` when registration fails or the family was created with other
    /// label names.
    fn family<'m, V, F>(
        &self,
        families: &'m mut HashMap<String, Family<V>>,
        name: &str,
        names: &[&str],
        create: F,
    ) -> Option<&'m V>
    where
        V: prometheus::core::Collector + Clone + 'static,
        F: FnOnce() -> prometheus::Result<V>,
    {
        if !families.contains_key(name) {
            let created = create().and_then(|metric| {
                self.registry.register(Box::new(metric.clone()))?;
                Ok(metric)
            });
            match created {
                Ok(metric) => {
                    families.insert(
                        name.to_string(),
                        Family {
                            metric,
                            label_names: names.iter().map(|n| n.to_string()).collect(),
                        },
                    );
                }
                Err(e) => {
                    warn!(metric = name, error = %e, "Failed to register metric");
                    return None;
                }
            }
        }

        let family = families.get(name)?;
        if !family.accepts(names) {
            warn!(
                metric = name,
                expected = ?family.label_names,
                found = ?names,
                "Metric labels do not match, sample dropped"
            );
            return None;
        }
        Some(&family.metric)
    }
}

impl TelemetrySink for PrometheusTelemetry {
    fn increment_counter(&self, name: &str, labels: &[(&str, &str)]) {
        let (names, values) = Self::label_parts(labels);
        let mut counters = self.counters.lock();
        let family = self.family(&mut *counters, name, &names, || {
            IntCounterVec::new(Opts::new(name, format!("{} counter", name)), &names)
        });
        if let Some(vec) = family {
            match vec.get_metric_with_label_values(&values) {
                Ok(counter) => counter.inc(),
                Err(e) => warn!(metric = name, error = %e, "Counter labels do not match"),
            }
        }
    }

    fn record_histogram(&self, name: &str, value: f64, labels: &[(&str, &str)]) {
        let (names, values) = Self::label_parts(labels);
        let mut histograms = self.histograms.lock();
        let family = self.family(&mut *histograms, name, &names, || {
            let opts = HistogramOpts::new(name, format!("{} histogram", name))
                .buckets(DURATION_BUCKETS_MS.to_vec());
            HistogramVec::new(opts, &names)
        });
        if let Some(vec) = family {
            match vec.get_metric_with_label_values(&values) {
                Ok(histogram) => histogram.observe(value),
                Err(e) => warn!(metric = name, error = %e, "Histogram labels do not match"),
            }
        }
    }
}
