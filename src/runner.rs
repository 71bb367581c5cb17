//! Drives a [`ConversionJob`] from validation to its final [`JobResult`].
//!
//! The runner is synchronous and processes items strictly in order. It is
//! meant to run on a blocking worker thread (see [`crate::convert`]); the
//! progress callback is the only channel back to the caller while it runs.

use crate::config::JobOptions;
use crate::error::ConvertError;
use crate::jobs::{ConversionJob, FailurePolicy};
use crate::output::{ItemOutcome, JobResult};
use crate::progress::{NoopProgressCallback, ProgressCallback, ProgressUpdate};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Cooperative cancellation flag, checked by the runner before each item.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs jobs with the progress, throttle and cancellation settings of a
/// [`JobOptions`].
pub struct JobRunner {
    progress: ProgressCallback,
    throttle: Option<Duration>,
    cancel: Option<CancelToken>,
}

impl Default for JobRunner {
    fn default() -> Self {
        Self {
            progress: Arc::new(NoopProgressCallback),
            throttle: None,
            cancel: None,
        }
    }
}

impl JobRunner {
    pub fn new(options: &JobOptions) -> Self {
        Self {
            progress: options
                .progress_callback
                .clone()
                .unwrap_or_else(|| Arc::new(NoopProgressCallback)),
            throttle: (options.throttle_ms > 0).then(|| Duration::from_millis(options.throttle_ms)),
            cancel: options.cancel.clone(),
        }
    }

    /// Run `job` to completion, to its first fatal error, or until cancelled.
    ///
    /// Never returns `Err`: every failure ends up in
    /// [`JobResult::terminal_error`].
    pub fn run(&self, job: &mut dyn ConversionJob) -> JobResult {
        let started = Instant::now();
        let mut result = JobResult::new(job.kind());
        info!("Starting {}", job.kind());

        if let Err(e) = self.drive(job, &mut result) {
            warn!("{} failed: {}", job.kind(), e);
            result.terminal_error = Some(e);
        }

        result.duration_ms = started.elapsed().as_millis() as u64;
        info!(
            "{} finished: {}/{} items succeeded, {} skipped, {}ms",
            job.kind(),
            result.items_succeeded,
            result.items_total,
            result.items_skipped,
            result.duration_ms
        );
        self.progress.on_job_complete(&result);
        result
    }

    fn drive(&self, job: &mut dyn ConversionJob, result: &mut JobResult) -> Result<(), ConvertError> {
        job.validate()?;
        let total = job.prepare()?;
        result.items_total = total;
        self.progress.on_job_start(job.kind(), total);
        debug!("{} has {} item(s)", job.kind(), total);

        for index in 0..total {
            if self.is_cancelled() {
                info!("{} cancelled before item {}", job.kind(), index + 1);
                result.cancelled = true;
                return Ok(());
            }

            let label = job.item_label(index);
            self.progress.on_item_start(index, total, &label);
            result.items_processed += 1;

            let outcome = match job.process_item(index) {
                Ok(outcome) => outcome,
                Err(e) => {
                    self.progress.on_item_error(index, &label, &e.to_string());
                    match job.failure_policy() {
                        FailurePolicy::FailFast => {
                            return Err(ConvertError::ItemAborted {
                                item: label,
                                source: Box::new(e),
                            });
                        }
                        FailurePolicy::SkipItem => {
                            warn!("Skipping {}: {}", label, e);
                            ItemOutcome::skipped(index, label, e.to_string())
                        }
                    }
                }
            };

            if outcome.is_skipped() {
                result.items_skipped += 1;
            } else if outcome.succeeded {
                result.items_succeeded += 1;
            }
            if let Some(ref path) = outcome.output {
                result.outputs.push(path.clone());
            }
            self.progress.on_item_complete(&outcome);
            result.outcomes.push(outcome);
            self.progress
                .on_progress(&ProgressUpdate::new(index + 1, total));

            if let Some(pause) = self.throttle {
                if index + 1 < total {
                    std::thread::sleep(pause);
                }
            }
        }

        let written = job.finish()?;
        result.outputs.extend(written);
        Ok(())
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::JobKind;
    use crate::output::JobOutcome;
    use crate::progress::JobProgressCallback;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Items succeed unless listed in `fail` (error) or `skip` (skipped).
    struct ScriptedJob {
        items: usize,
        fail: Vec<usize>,
        skip: Vec<usize>,
        policy: FailurePolicy,
        invalid: bool,
        finished: bool,
        cancel_at: Option<(usize, CancelToken)>,
    }

    impl ScriptedJob {
        fn new(items: usize, policy: FailurePolicy) -> Self {
            Self {
                items,
                fail: Vec::new(),
                skip: Vec::new(),
                policy,
                invalid: false,
                finished: false,
                cancel_at: None,
            }
        }
    }

    impl ConversionJob for ScriptedJob {
        fn kind(&self) -> JobKind {
            JobKind::Compress
        }

        fn failure_policy(&self) -> FailurePolicy {
            self.policy
        }

        fn validate(&self) -> Result<(), ConvertError> {
            if self.invalid {
                Err(ConvertError::MissingInput { what: "output folder" })
            } else {
                Ok(())
            }
        }

        fn prepare(&mut self) -> Result<usize, ConvertError> {
            Ok(self.items)
        }

        fn item_label(&self, index: usize) -> String {
            format!("item {}", index + 1)
        }

        fn process_item(&mut self, index: usize) -> Result<ItemOutcome, ConvertError> {
            if let Some((at, ref token)) = self.cancel_at {
                if index == at {
                    token.cancel();
                }
            }
            if self.fail.contains(&index) {
                return Err(ConvertError::Internal(format!("boom {index}")));
            }
            if self.skip.contains(&index) {
                return Ok(ItemOutcome::skipped(index, self.item_label(index), "missing"));
            }
            Ok(ItemOutcome::produced(
                index,
                self.item_label(index),
                PathBuf::from(format!("out_{index}")),
            ))
        }

        fn finish(&mut self) -> Result<Vec<PathBuf>, ConvertError> {
            self.finished = true;
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct Recorder {
        updates: Mutex<Vec<ProgressUpdate>>,
        errors: Mutex<Vec<String>>,
    }

    impl JobProgressCallback for Recorder {
        fn on_item_error(&self, _index: usize, label: &str, _error: &str) {
            self.errors.lock().unwrap().push(label.to_string());
        }

        fn on_progress(&self, update: &ProgressUpdate) {
            self.updates.lock().unwrap().push(*update);
        }
    }

    fn runner_with(recorder: &Arc<Recorder>) -> JobRunner {
        let options = JobOptions::builder()
            .progress_callback(recorder.clone())
            .build()
            .unwrap();
        JobRunner::new(&options)
    }

    #[test]
    fn all_items_succeed_and_progress_reaches_100() {
        let recorder = Arc::new(Recorder::default());
        let mut job = ScriptedJob::new(4, FailurePolicy::FailFast);
        let result = runner_with(&recorder).run(&mut job);

        assert_eq!(result.outcome(), JobOutcome::Completed);
        assert_eq!(result.items_processed, 4);
        assert_eq!(result.items_succeeded, 4);
        assert_eq!(result.outputs.len(), 4);
        assert!(job.finished);

        let updates = recorder.updates.lock().unwrap();
        let completed: Vec<_> = updates.iter().map(|u| u.completed).collect();
        assert_eq!(completed, vec![1, 2, 3, 4]);
        assert_eq!(updates.last().unwrap().percent, 100.0);
    }

    #[test]
    fn fail_fast_stops_at_first_error() {
        let recorder = Arc::new(Recorder::default());
        let mut job = ScriptedJob::new(5, FailurePolicy::FailFast);
        job.fail = vec![2];
        let result = runner_with(&recorder).run(&mut job);

        assert_eq!(result.outcome(), JobOutcome::Failed);
        assert_eq!(result.items_processed, 3);
        assert_eq!(result.items_succeeded, 2);
        assert!(!job.finished);
        match result.terminal_error {
            Some(ConvertError::ItemAborted { ref item, .. }) => assert_eq!(item, "item 3"),
            ref other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(recorder.updates.lock().unwrap().len(), 2);
        assert_eq!(*recorder.errors.lock().unwrap(), vec!["item 3".to_string()]);
    }

    #[test]
    fn skip_policy_continues_past_errors() {
        let recorder = Arc::new(Recorder::default());
        let mut job = ScriptedJob::new(4, FailurePolicy::SkipItem);
        job.fail = vec![1];
        job.skip = vec![3];
        let result = runner_with(&recorder).run(&mut job);

        assert_eq!(result.outcome(), JobOutcome::Completed);
        assert_eq!(result.items_processed, 4);
        assert_eq!(result.items_succeeded, 2);
        assert_eq!(result.items_skipped, 2);
        assert!(result.outcomes[1].skipped_reason.as_deref().unwrap().contains("boom 1"));
        assert!(job.finished);
        assert_eq!(recorder.updates.lock().unwrap().len(), 4);
    }

    #[test]
    fn validation_error_means_no_items_run() {
        let mut job = ScriptedJob::new(3, FailurePolicy::FailFast);
        job.invalid = true;
        let result = JobRunner::default().run(&mut job);

        assert_eq!(result.items_processed, 0);
        assert_eq!(result.items_total, 0);
        assert!(result.terminal_error.as_ref().unwrap().is_validation());
    }

    #[test]
    fn zero_items_is_nothing_produced() {
        let mut job = ScriptedJob::new(0, FailurePolicy::SkipItem);
        let result = JobRunner::default().run(&mut job);
        assert_eq!(result.outcome(), JobOutcome::NothingProduced);
        assert!(job.finished);
    }

    #[test]
    fn cancellation_is_checked_between_items() {
        let token = CancelToken::new();
        let options = JobOptions::builder().cancel(token.clone()).build().unwrap();
        let mut job = ScriptedJob::new(5, FailurePolicy::FailFast);
        job.cancel_at = Some((1, token));
        let result = JobRunner::new(&options).run(&mut job);

        assert!(result.cancelled);
        assert_eq!(result.outcome(), JobOutcome::Cancelled);
        assert_eq!(result.items_processed, 2);
        assert!(!job.finished);
    }

    #[test]
    fn throttle_is_taken_from_options() {
        let options = JobOptions::builder().throttle_ms(5).build().unwrap();
        let runner = JobRunner::new(&options);
        assert_eq!(runner.throttle, Some(Duration::from_millis(5)));
        assert_eq!(JobRunner::default().throttle, None);
    }
}
