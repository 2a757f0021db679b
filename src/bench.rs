//! Sequential load check against a generation service.

use crate::service::{duration_ms, GenerateVideoRequest, VideoService};
use serde::Serialize;
use std::time::Instant;

/// Prompts used when the caller supplies none.
pub const DEFAULT_BENCH_PROMPTS: [&str; 3] = [
    "A cat playing in a garden",
    "A dog running in the park",
    "A bird flying in the sky",
];

/// Result of one timed request.
#[derive(Debug, Clone, Serialize)]
pub struct BenchSample {
    /// Prompt sent in this request.
    pub prompt: String,
    /// Wall-clock time until the service answered.
    pub duration_ms: u64,
    /// Returned `video_path`, if the request succeeded.
    pub video_path: Option<String>,
    /// Error detail, if it failed.
    pub error: Option<String>,
}

impl BenchSample {
    /// True if the request returned a video.
    pub fn succeeded(&self) -> bool {
        self.video_path.is_some()
    }
}

/// Aggregate numbers over a bench run.
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    /// One entry per request, in send order.
    pub samples: Vec<BenchSample>,
    /// Mean request time.
    pub average_ms: u64,
    /// Fastest request.
    pub min_ms: u64,
    /// Slowest request.
    pub max_ms: u64,
    /// Percentage of requests that returned a video.
    pub success_rate: f64,
}

impl BenchReport {
    fn from_samples(samples: Vec<BenchSample>) -> Self {
        let durations: Vec<u64> = samples.iter().map(|s| s.duration_ms).collect();
        let total: u64 = durations.iter().sum();
        let count = samples.len() as u64;
        let succeeded = samples.iter().filter(|s| s.succeeded()).count();

        Self {
            average_ms: if count == 0 { 0 } else { total / count },
            min_ms: durations.iter().copied().min().unwrap_or(0),
            max_ms: durations.iter().copied().max().unwrap_or(0),
            success_rate: if samples.is_empty() {
                0.0
            } else {
                succeeded as f64 * 100.0 / samples.len() as f64
            },
            samples,
        }
    }
}

/// Sends `count` requests one after another, cycling through `prompts`.
///
/// Failures are recorded, not retried.
pub async fn run_bench<S: VideoService + ?Sized>(
    service: &S,
    prompts: &[String],
    count: usize,
) -> BenchReport {
    let mut samples = Vec::with_capacity(count);
    if prompts.is_empty() {
        return BenchReport::from_samples(samples);
    }

    for (i, prompt) in prompts.iter().cycle().take(count).enumerate() {
        let start = Instant::now();
        let result = service
            .generate_video(&GenerateVideoRequest::new(prompt.clone()))
            .await;
        let duration_ms = duration_ms(start.elapsed());

        let sample = match result {
            Ok(artifact) => BenchSample {
                prompt: prompt.clone(),
                duration_ms,
                video_path: Some(artifact.video_path),
                error: None,
            },
            Err(err) => BenchSample {
                prompt: prompt.clone(),
                duration_ms,
                video_path: None,
                error: Some(err.to_string()),
            },
        };
        tracing::info!(
            request = i + 1,
            duration_ms,
            ok = sample.succeeded(),
            "bench request finished"
        );
        samples.push(sample);
    }

    BenchReport::from_samples(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TtvError;
    use crate::test_utils::{MockReply, MockVideoService};

    fn sample(duration_ms: u64, ok: bool) -> BenchSample {
        BenchSample {
            prompt: "p".into(),
            duration_ms,
            video_path: ok.then(|| "out/a.mp4".to_string()),
            error: (!ok).then(|| "boom".to_string()),
        }
    }

    #[test]
    fn test_report_stats() {
        let report =
            BenchReport::from_samples(vec![sample(100, true), sample(300, false), sample(200, true)]);
        assert_eq!(report.average_ms, 200);
        assert_eq!(report.min_ms, 100);
        assert_eq!(report.max_ms, 300);
        assert!((report.success_rate - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_empty_report() {
        let report = BenchReport::from_samples(Vec::new());
        assert_eq!(report.average_ms, 0);
        assert_eq!(report.success_rate, 0.0);
    }

    #[tokio::test]
    async fn test_run_bench_cycles_prompts() {
        let service = MockVideoService::new([
            MockReply::Path("out/1.mp4"),
            MockReply::Error(TtvError::Api {
                status: 500,
                message: "busy".into(),
            }),
            MockReply::Path("out/3.mp4"),
            MockReply::Path("out/4.mp4"),
        ]);
        let prompts: Vec<String> = DEFAULT_BENCH_PROMPTS.iter().map(|p| p.to_string()).collect();

        let report = run_bench(&service, &prompts, 4).await;

        let sent: Vec<_> = service.requests().into_iter().map(|r| r.prompt).collect();
        assert_eq!(
            sent,
            vec![
                "A cat playing in a garden",
                "A dog running in the park",
                "A bird flying in the sky",
                "A cat playing in a garden",
            ]
        );
        assert_eq!(report.samples.len(), 4);
        assert!(!report.samples[1].succeeded());
        assert_eq!(
            report.samples[1].error.as_deref(),
            Some("API error: 500 - busy")
        );
        assert_eq!(report.success_rate, 75.0);
    }

    #[tokio::test]
    async fn test_run_bench_without_prompts() {
        let service = MockVideoService::new([]);
        let report = run_bench(&service, &[], 3).await;
        assert!(report.samples.is_empty());
        assert_eq!(service.call_count(), 0);
    }
}
