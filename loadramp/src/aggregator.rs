//! Aggregate phase: turns each rate's report into dataset rows.
use crate::tool::Reporter;
use crate::{ArtifactStore, DatasetWriter, RampError};
use loadramp_core::{AggregateStatistics, LatencyRow, Rate, Report, SuccessRow};
use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};

/// Rows produced for a single rate.
#[derive(Clone, Debug, PartialEq)]
pub struct RateRows {
    pub latency: Vec<LatencyRow>,
    pub success: SuccessRow,
}

pub struct ReportAggregator<P> {
    reporter: P,
    store: ArtifactStore,
    buckets: Vec<Duration>,
}

impl<P: Reporter> ReportAggregator<P> {
    pub fn new(reporter: P, store: ArtifactStore, buckets: Vec<Duration>) -> Self {
        Self {
            reporter,
            store,
            buckets,
        }
    }

    /// Report on every rate in order and write the rows out.
    ///
    /// Any report that can't be obtained or parsed aborts the pass.
    #[instrument(name = "aggregate", skip_all, fields(rates = rates.len()))]
    pub async fn run<L, S>(
        &self,
        rates: &[Rate],
        writer: &mut DatasetWriter<L, S>,
    ) -> Result<AggregateStatistics, RampError>
    where
        L: Write,
        S: Write,
    {
        let mut stats = AggregateStatistics::default();
        for &rate in rates {
            let rows = self.rate_rows(rate).await?;
            writer.write_rate(&rows)?;
            stats.rates += 1;
            stats.latency_rows += rows.latency.len();
        }
        info!(
            "Aggregated {} rates into {} latency rows",
            stats.rates, stats.latency_rows
        );
        Ok(stats)
    }

    pub async fn rate_rows(&self, rate: Rate) -> Result<RateRows, RampError> {
        let raw = self
            .reporter
            .report(&self.store.path(rate), &self.buckets)
            .await?;
        let report =
            Report::from_json(&raw).map_err(|source| RampError::Report { rate, source })?;
        log_report(rate, &report);
        normalize(rate, &report, &self.buckets)
    }
}

/// Scale each bucket's count by `success / total` so a rate's fractions sum to its success ratio.
///
/// Rows come out in ascending latency. Every expected boundary gets a row, zero when the report
/// doesn't mention it; boundaries only the report knows about are kept as well. A report with no
/// responses at all yields fractions of zero.
pub fn normalize(rate: Rate, report: &Report, buckets: &[Duration]) -> Result<RateRows, RampError> {
    let mut histogram: BTreeMap<Duration, u64> = buckets.iter().map(|&b| (b, 0)).collect();
    for (key, &count) in &report.buckets {
        *histogram.entry(parse_bucket(key)?).or_default() += count;
    }

    let total = report.total_count();
    let latency = histogram
        .into_iter()
        .map(|(latency, count)| LatencyRow {
            rate,
            latency,
            fraction: fraction(count, total, report.success),
        })
        .collect();

    Ok(RateRows {
        latency,
        success: SuccessRow {
            rate,
            success: report.success,
        },
    })
}

fn fraction(count: u64, total: u64, success: f64) -> f64 {
    if total == 0 {
        return 0.;
    }
    count as f64 / total as f64 * success
}

fn parse_bucket(key: &str) -> Result<Duration, RampError> {
    if let Ok(nanos) = key.parse::<u64>() {
        return Ok(Duration::from_nanos(nanos));
    }
    match key.parse::<f64>() {
        Ok(nanos) if nanos.is_finite() && nanos >= 0. => Ok(Duration::from_nanos(nanos as u64)),
        _ => Err(RampError::InvalidBucket {
            key: key.to_string(),
        }),
    }
}

fn log_report(rate: Rate, report: &Report) {
    info!(
        %rate,
        success = report.success,
        requests = report.requests,
        throughput = report.throughput,
        "Report for rate {rate}"
    );
    if let Some(codes) = &report.status_codes {
        debug!("Status codes at rate {rate}: {codes:?}");
    }
    if let Some(errors) = report.errors.as_deref().filter(|e| !e.is_empty()) {
        warn!("Rate {rate} reported {} distinct errors: {errors:?}", errors.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;

    fn report(success: f64, buckets: &[(&str, u64)]) -> Report {
        Report {
            success,
            buckets: buckets.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            requests: None,
            throughput: None,
            status_codes: None,
            errors: None,
        }
    }

    fn nanos(values: &[u64]) -> Vec<Duration> {
        values.iter().map(|&n| Duration::from_nanos(n)).collect()
    }

    #[test]
    fn fractions_scale_by_success() {
        let rate = Rate::new(1.);
        let report = report(0.5, &[("0", 3), ("1000", 1)]);
        let rows = normalize(rate, &report, &nanos(&[0, 1000])).unwrap();

        assert_eq!(
            rows.latency,
            [
                LatencyRow {
                    rate,
                    latency: Duration::ZERO,
                    fraction: 0.375
                },
                LatencyRow {
                    rate,
                    latency: Duration::from_nanos(1000),
                    fraction: 0.125
                },
            ]
        );
        assert_eq!(rows.success, SuccessRow { rate, success: 0.5 });
    }

    #[test]
    fn fractions_sum_to_success() {
        let buckets = loadramp_core::buckets();
        let counts: Vec<(String, u64)> = buckets
            .iter()
            .enumerate()
            .map(|(i, b)| (b.as_nanos().to_string(), (i as u64 * 7919) % 13))
            .collect();
        let counts: Vec<(&str, u64)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();

        let rows = normalize(Rate::new(3.), &report(0.8731, &counts), &buckets).unwrap();

        let sum: f64 = rows.latency.iter().map(|row| row.fraction).sum();
        assert!((sum - 0.8731).abs() < 1e-9, "sum {sum}");
        assert_eq!(rows.latency.len(), buckets.len());
    }

    #[test]
    fn empty_histogram_is_all_zero() {
        let report = report(0., &[("0", 0)]);
        let rows = normalize(Rate::new(1.), &report, &nanos(&[0, 1000])).unwrap();
        assert!(rows.latency.iter().all(|row| row.fraction == 0.));
        assert_eq!(rows.latency.len(), 2);
    }

    #[test]
    fn rows_are_sorted_by_latency_not_key() {
        // "1000" < "250" as strings.
        let rows = normalize(
            Rate::new(1.),
            &report(1., &[("1000", 1), ("250", 1), ("0", 2)]),
            &nanos(&[0]),
        )
        .unwrap();
        let latencies: Vec<u128> = rows.latency.iter().map(|r| r.latency.as_nanos()).collect();
        assert_eq!(latencies, [0, 250, 1000]);
        assert_eq!(rows.latency[0].fraction, 0.5);
    }

    #[test]
    fn missing_buckets_are_zero() {
        let report = report(1., &[("1000", 4)]);
        let rows = normalize(Rate::new(1.), &report, &nanos(&[0, 1000, 2000])).unwrap();
        let fractions: Vec<f64> = rows.latency.iter().map(|r| r.fraction).collect();
        assert_eq!(fractions, [0., 1., 0.]);
    }

    #[test]
    fn bucket_keys_must_be_nanoseconds() {
        assert_eq!(parse_bucket("1258").unwrap(), Duration::from_nanos(1258));
        assert_eq!(parse_bucket("1000.0").unwrap(), Duration::from_nanos(1000));
        let err = normalize(Rate::new(1.), &report(1., &[("1ms", 1)]), &[]).unwrap_err();
        assert!(matches!(err, RampError::InvalidBucket { key } if key == "1ms"));
    }

    struct MockReporter {
        reports: HashMap<u64, &'static str>,
    }

    impl Reporter for MockReporter {
        async fn report(
            &self,
            artifact: &Path,
            buckets: &[Duration],
        ) -> Result<Vec<u8>, RampError> {
            assert_eq!(buckets, nanos(&[0, 1000]));
            let name = artifact.file_name().unwrap().to_str().unwrap();
            let millirate: u64 = name
                .trim_start_matches("results_")
                .trim_end_matches(".bin")
                .parse()
                .unwrap();
            Ok(self.reports[&millirate].as_bytes().to_vec())
        }
    }

    fn aggregator(reports: &[(u64, &'static str)]) -> ReportAggregator<MockReporter> {
        ReportAggregator::new(
            MockReporter {
                reports: reports.iter().copied().collect(),
            },
            ArtifactStore::new("/artifacts"),
            nanos(&[0, 1000]),
        )
    }

    async fn aggregate(
        aggregator: &ReportAggregator<MockReporter>,
        rates: &[Rate],
    ) -> (String, String) {
        let mut writer = DatasetWriter::new(Vec::new(), Vec::new());
        aggregator.run(rates, &mut writer).await.unwrap();
        let (latency, success) = writer.finish().unwrap();
        (
            String::from_utf8(latency).unwrap(),
            String::from_utf8(success).unwrap(),
        )
    }

    #[tracing_test::traced_test]
    #[tokio::test]
    async fn writes_blocks_per_rate() {
        let aggregator = aggregator(&[
            (1000, r#"{"success": 0.5, "buckets": {"0": 3, "1000": 1}}"#),
            (2000, r#"{"success": 1, "buckets": {"1000": 2}, "errors": []}"#),
        ]);
        let (latency, success) = aggregate(&aggregator, &[Rate::new(1.), Rate::new(2.)]).await;

        assert_eq!(latency, "1 0 0.375\n1 1000 0.125\n\n2 0 0\n2 1000 1\n\n");
        assert_eq!(success, "1 0.5\n2 1\n");
    }

    #[tracing_test::traced_test]
    #[tokio::test]
    async fn aggregation_is_idempotent() {
        let aggregator = aggregator(&[(
            1000,
            r#"{"success": 0.3, "buckets": {"0": 1, "1000": 2}}"#,
        )]);
        let first = aggregate(&aggregator, &[Rate::new(1.)]).await;
        let second = aggregate(&aggregator, &[Rate::new(1.)]).await;
        assert_eq!(first, second);
    }

    #[tracing_test::traced_test]
    #[tokio::test]
    async fn malformed_report_aborts() {
        let aggregator = aggregator(&[
            (1000, r#"{"success": 1, "buckets": {"0": 1}}"#),
            (2000, r#"{"buckets": {"0": 1}}"#),
        ]);
        let mut writer = DatasetWriter::new(Vec::new(), Vec::new());
        let err = aggregator
            .run(&[Rate::new(1.), Rate::new(2.)], &mut writer)
            .await
            .unwrap_err();
        assert!(matches!(err, RampError::Report { rate, .. } if rate == Rate::new(2.)));
    }
}
