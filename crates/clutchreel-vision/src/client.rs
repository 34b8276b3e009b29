// crates/clutchreel-vision/src/client.rs
//
// VisionClient (C2): sends each sampled still to a remote multimodal model,
// enforcing bounded concurrency and a global minimum spacing between
// request starts, with a per-frame retry/rotation state machine across a
// model fallback list.
//
// The source describes this as a single-threaded cooperative loop — one
// JS event loop juggling in-flight promises. `ureq` only gives us blocking
// calls, so the concurrency cap and global pacing clock are reimplemented
// with a bounded worker-thread pool instead: a gatekeeper thread per frame
// acquires a counting semaphore before issuing its request, the same
// pattern the media crate uses to bound concurrent probes (see
// `velocut-media`'s `probe_sem`). Every externally-observable contract —
// ordering, concurrency cap, request pacing — is preserved; only the
// mechanism changes.

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use crossbeam_channel::unbounded;

use clutchreel_core::{CancellationToken, Frame, FrameAnalysis, PipelineError, Progress, Result, VisionConfig};

use crate::parse::parse_response;
use crate::prompt::build_request_body;

/// Global request-start pacing clock shared across every in-flight frame.
struct Pacer {
    last_start: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl Pacer {
    fn new(min_interval: Duration) -> Self {
        Self { last_start: Mutex::new(None), min_interval }
    }

    /// Block the caller until at least `min_interval` has elapsed since the
    /// last request start, then record this call as the new last start.
    fn wait_for_slot(&self) {
        let mut last = self.last_start.lock().unwrap();
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                std::thread::sleep(self.min_interval - elapsed);
            }
        }
        *last = Some(Instant::now());
    }
}

/// A counting semaphore bounding how many requests may be in flight.
struct ConcurrencyGate {
    state: Mutex<usize>,
    cvar: Condvar,
    limit: usize,
}

impl ConcurrencyGate {
    fn new(limit: usize) -> Self {
        Self { state: Mutex::new(0), cvar: Condvar::new(), limit: limit.max(1) }
    }

    fn acquire(&self) {
        let mut count = self.state.lock().unwrap();
        while *count >= self.limit {
            count = self.cvar.wait(count).unwrap();
        }
        *count += 1;
    }

    fn release(&self) {
        *self.state.lock().unwrap() -= 1;
        self.cvar.notify_one();
    }
}

enum RequestOutcome {
    Success(String),
    AuthInvalid,
    RateLimited,
    Warming,
    Timeout,
    Other(String),
}

pub struct VisionClient {
    config: VisionConfig,
    credential: String,
    endpoint_base: String,
    agent: ureq::Agent,
}

impl VisionClient {
    pub fn new(config: VisionConfig, credential: impl Into<String>, endpoint_base: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_millis(config.cold_start_timeout_ms))
            .build();
        Self { config, credential: credential.into(), endpoint_base: endpoint_base.into(), agent }
    }

    /// Analyze a single frame, running the full retry/rotation state
    /// machine. Returns `Err` only for the two abort-worthy outcomes —
    /// an invalid credential or cancellation — everything else recoverable
    /// within the retry budget returns `Ok`, degraded or sentinel as needed.
    pub fn analyze(&self, frame: &Frame, cancel: &CancellationToken) -> Result<FrameAnalysis> {
        self.analyze_with(frame, &Pacer::new(self.min_interval()), cancel)
    }

    fn min_interval(&self) -> Duration {
        Duration::from_millis(self.config.request_delay_ms)
    }

    fn analyze_with(&self, frame: &Frame, pacer: &Pacer, cancel: &CancellationToken) -> Result<FrameAnalysis> {
        let models = &self.config.models;
        let max_attempts = self.config.max_retries.saturating_mul(models.len() as u32).max(1);

        let mut model_idx = 0usize;
        let mut models_tried_in_round: std::collections::HashSet<usize> = std::collections::HashSet::new();
        let mut attempt = 0u32;

        loop {
            cancel.check()?;

            if attempt >= max_attempts {
                return Ok(FrameAnalysis::sentinel_failed(frame.timestamp, "retry budget exhausted"));
            }

            pacer.wait_for_slot();
            cancel.check()?;

            let model = &models[model_idx];
            let image_b64 = BASE64.encode(&frame.image_bytes);

            match self.send_request(model, &image_b64) {
                RequestOutcome::Success(text) => {
                    return Ok(parse_response(&text, frame.timestamp, model));
                }
                RequestOutcome::AuthInvalid => {
                    return Err(PipelineError::AuthInvalid);
                }
                RequestOutcome::RateLimited => {
                    models_tried_in_round.insert(model_idx);
                    model_idx = (model_idx + 1) % models.len();
                    attempt += 1;
                    if models_tried_in_round.len() >= models.len() {
                        sleep_cancellable(Duration::from_millis(self.config.all_models_backoff_ms), cancel)?;
                        models_tried_in_round.clear();
                    }
                }
                RequestOutcome::Warming => {
                    sleep_cancellable(Duration::from_millis(self.config.cold_start_retry_delay_ms), cancel)?;
                    attempt += 1;
                }
                RequestOutcome::Timeout => {
                    model_idx = (model_idx + 1) % models.len();
                    attempt += 1;
                }
                RequestOutcome::Other(_msg) => {
                    let round = attempt / models.len() as u32;
                    let backoff_ms = self.config.initial_backoff_ms.saturating_mul(1u64 << round.min(16));
                    sleep_cancellable(Duration::from_millis(backoff_ms), cancel)?;
                    attempt += 1;
                }
            }
        }
    }

    fn send_request(&self, model: &str, image_b64: &str) -> RequestOutcome {
        let url = format!("{}/api/inference-endpoints/models/{}/v1/chat/completions", self.endpoint_base, model);
        let body = build_request_body(model, image_b64);

        match self.agent.post(&url)
            .set("Authorization", &format!("Bearer {}", self.credential))
            .send_json(body)
        {
            Ok(resp) => extract_content(resp),
            Err(ureq::Error::Status(401, _)) => RequestOutcome::AuthInvalid,
            Err(ureq::Error::Status(429, _)) => RequestOutcome::RateLimited,
            Err(ureq::Error::Status(503, _)) => RequestOutcome::Warming,
            Err(ureq::Error::Status(code, resp)) => {
                RequestOutcome::Other(format!("http {code}: {}", resp.status_text()))
            }
            Err(ureq::Error::Transport(t)) => {
                if t.to_string().to_ascii_lowercase().contains("timed out") {
                    RequestOutcome::Timeout
                } else {
                    RequestOutcome::Other(t.to_string())
                }
            }
        }
    }

    /// Analyze every frame, preserving input order and length, spreading
    /// work across up to `config.concurrency` gatekeeper threads sharing one
    /// pacing clock. Aborts the whole batch only on `AuthInvalid` or
    /// cancellation; any other per-frame failure lands as a sentinel at its
    /// slot and the batch continues.
    pub fn analyze_batch(
        &self,
        frames: &[Frame],
        mut on_progress: impl FnMut(Progress),
        cancel: &CancellationToken,
    ) -> Result<Vec<FrameAnalysis>> {
        if frames.is_empty() {
            return Ok(Vec::new());
        }

        let pacer = Arc::new(Pacer::new(self.min_interval()));
        let gate = Arc::new(ConcurrencyGate::new(self.config.concurrency));
        let (tx, rx) = unbounded::<(usize, Result<FrameAnalysis>)>();

        std::thread::scope(|scope| {
            for (idx, frame) in frames.iter().enumerate() {
                cancel.check()?;

                let gate = Arc::clone(&gate);
                let pacer = Arc::clone(&pacer);
                let tx = tx.clone();

                scope.spawn(move || {
                    gate.acquire();
                    let result = self.analyze_with(frame, &pacer, cancel);
                    gate.release();
                    let _ = tx.send((idx, result));
                });
            }
            drop(tx);

            let total = frames.len();
            let mut results: Vec<Option<FrameAnalysis>> = (0..total).map(|_| None).collect();
            let mut completed = 0usize;
            let mut first_fatal: Option<PipelineError> = None;

            for (idx, result) in rx.iter() {
                match result {
                    Ok(analysis) => results[idx] = Some(analysis),
                    Err(e) => {
                        if first_fatal.is_none() {
                            first_fatal = Some(e);
                        }
                        results[idx] = Some(FrameAnalysis::sentinel_failed(frames[idx].timestamp, "aborted"));
                    }
                }
                completed += 1;
                on_progress(Progress::Analyzing { current: completed, total });
            }

            if let Some(e) = first_fatal {
                return Err(e);
            }

            Ok(results.into_iter().map(|r| r.unwrap()).collect())
        })
    }
}

fn extract_content(resp: ureq::Response) -> RequestOutcome {
    #[derive(serde::Deserialize)]
    struct ChatMessage {
        #[serde(default)]
        content: String,
    }
    #[derive(serde::Deserialize)]
    struct ChatChoice {
        message: ChatMessage,
    }
    #[derive(serde::Deserialize)]
    struct ChatCompletion {
        #[serde(default)]
        choices: Vec<ChatChoice>,
    }

    match resp.into_json::<ChatCompletion>() {
        Ok(parsed) => match parsed.choices.into_iter().next() {
            Some(choice) if !choice.message.content.trim().is_empty() => {
                RequestOutcome::Success(choice.message.content)
            }
            _ => RequestOutcome::Other("empty response content".to_string()),
        },
        Err(e) => RequestOutcome::Other(format!("invalid response body: {e}")),
    }
}

fn sleep_cancellable(duration: Duration, cancel: &CancellationToken) -> Result<()> {
    const STEP: Duration = Duration::from_millis(100);
    let mut remaining = duration;
    while remaining > Duration::ZERO {
        cancel.check()?;
        let step = remaining.min(STEP);
        std::thread::sleep(step);
        remaining -= step;
    }
    cancel.check()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pacer_enforces_minimum_spacing() {
        let pacer = Pacer::new(Duration::from_millis(50));
        let start = Instant::now();
        pacer.wait_for_slot();
        pacer.wait_for_slot();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn concurrency_gate_releases_capacity() {
        let gate = ConcurrencyGate::new(1);
        gate.acquire();
        gate.release();
        gate.acquire();
        gate.release();
    }
}
