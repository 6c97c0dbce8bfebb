//! Dispatch queue ordering and cool-down behaviour
//!
//! Runs on a paused Tokio clock, so sleeps complete instantly while elapsed
//! times stay exact.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bannerscrape::{
    BannerData, BannerService, DeviceProfile, DispatchQueue, ErrorKind, ExtractionRequest,
    ExtractionResult, JobRunner,
};
use futures::future::join_all;
use tokio::time::Instant;

const COOLDOWN: Duration = Duration::from_secs(3);
const WORK: Duration = Duration::from_secs(1);

#[derive(Default)]
struct RecordingRunner {
    runs: Mutex<Vec<(String, Instant, Instant)>>,
}

impl RecordingRunner {
    fn runs(&self) -> Vec<(String, Instant, Instant)> {
        self.runs.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobRunner for RecordingRunner {
    async fn run(&self, request: ExtractionRequest) -> ExtractionResult {
        if request.raw_artist_url.contains("panic") {
            panic!("renderer crashed");
        }

        let start = Instant::now();
        tokio::time::sleep(WORK).await;
        self.runs
            .lock()
            .unwrap()
            .push((request.raw_artist_url.clone(), start, Instant::now()));

        ExtractionResult::Success(BannerData {
            artist_url: request.raw_artist_url.clone(),
            banner_url: String::new(),
            image_path: String::new(),
            artist_id: request.raw_artist_url,
            device_profile: request.device_profile,
        })
    }
}

fn request(id: &str) -> ExtractionRequest {
    ExtractionRequest::new(id, DeviceProfile::Desktop)
}

#[tokio::test(start_paused = true)]
async fn jobs_run_in_order_with_cooldown_between_them() {
    let runner = Arc::new(RecordingRunner::default());
    let queue = DispatchQueue::new(runner.clone() as Arc<dyn JobRunner>, COOLDOWN);

    let started = Instant::now();
    let results = join_all(["a", "b", "c"].map(|id| queue.submit(request(id)))).await;
    let elapsed = started.elapsed();

    let ids: Vec<_> = results
        .iter()
        .map(|result| match result {
            ExtractionResult::Success(data) => data.artist_id.clone(),
            other => panic!("unexpected failure: {other:?}"),
        })
        .collect();
    assert_eq!(ids, ["a", "b", "c"]);

    let runs = runner.runs();
    let order: Vec<_> = runs.iter().map(|(id, _, _)| id.as_str()).collect();
    assert_eq!(order, ["a", "b", "c"]);

    for pair in runs.windows(2) {
        let (_, _, previous_end) = &pair[0];
        let (_, next_start, _) = &pair[1];
        assert!(*next_start - *previous_end >= COOLDOWN);
    }

    // no cool-down before the first job or after the last one
    assert_eq!(runs[0].1, started);
    assert!(elapsed >= 3 * WORK + 2 * COOLDOWN);
    assert!(elapsed < 3 * WORK + 3 * COOLDOWN);

    assert_eq!(queue.pending(), 0);
    tokio::task::yield_now().await;
    assert!(!queue.is_draining());
}

#[tokio::test(start_paused = true)]
async fn single_job_is_not_delayed() {
    let runner = Arc::new(RecordingRunner::default());
    let queue = DispatchQueue::new(runner, COOLDOWN);

    let started = Instant::now();
    let result = queue.submit(request("solo")).await;

    assert!(result.is_success());
    assert!(started.elapsed() < COOLDOWN);
}

#[tokio::test(start_paused = true)]
async fn panicking_job_fails_without_stopping_the_worker() {
    let runner = Arc::new(RecordingRunner::default());
    let queue = DispatchQueue::new(runner.clone() as Arc<dyn JobRunner>, COOLDOWN);

    let (crashed, next) = tokio::join!(
        queue.submit(request("panic")),
        queue.submit(request("after"))
    );

    assert_eq!(
        crashed.error(),
        Some(&ErrorKind::ProcessingError("renderer crashed".into()))
    );
    assert!(next.is_success());
    assert_eq!(runner.runs().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn invalid_urls_are_rejected_before_queueing() {
    let runner = Arc::new(RecordingRunner::default());
    let service = BannerService::new(DispatchQueue::new(
        runner.clone() as Arc<dyn JobRunner>,
        COOLDOWN,
    ));

    let result = service
        .extract("https://example.com/not-an-artist", DeviceProfile::Mobile)
        .await;

    assert_eq!(result.error(), Some(&ErrorKind::InvalidUrl));
    assert!(runner.runs().is_empty());
    assert_eq!(service.queue().pending(), 0);

    let valid = service
        .extract("spotify:artist:4Z8W4fKeB5YxbusRsdQVPb", DeviceProfile::Mobile)
        .await;
    assert!(valid.is_success());
    assert_eq!(runner.runs().len(), 1);
}
