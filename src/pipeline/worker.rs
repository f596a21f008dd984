// Background layout worker with latest-request-wins cancellation

use crate::error::{Result, YuntuError};
use crate::pipeline::{CloudOutput, CloudPipeline, GenerateRequest};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

/// Queued generation job
struct LayoutJob {
    request: GenerateRequest,
    token: CancellationToken,
    reply: oneshot::Sender<Result<CloudOutput>>,
}

/// Runs generation requests one at a time off the async runtime
///
/// Submitting a request cancels the one before it, so a caller that
/// regenerates on every keystroke only pays for the latest input. A
/// superseded request resolves to [`YuntuError::Cancelled`] unless it had
/// already finished.
pub struct LayoutWorker {
    job_tx: Option<mpsc::Sender<LayoutJob>>,
    handle: Option<tokio::task::JoinHandle<()>>,
    latest: Mutex<Option<CancellationToken>>,
}

impl LayoutWorker {
    /// Spawn the worker on the current tokio runtime
    ///
    /// # Arguments
    /// * `pipeline` - Pipeline shared by every job
    /// * `queue_size` - Bound of the job queue; `submit` waits when it is full
    pub fn new(pipeline: CloudPipeline, queue_size: usize) -> Self {
        let (job_tx, job_rx) = mpsc::channel(queue_size.max(1));
        let pipeline = Arc::new(pipeline);

        let handle = Some(tokio::spawn(async move {
            layout_worker(job_rx, pipeline).await;
        }));

        Self {
            job_tx: Some(job_tx),
            handle,
            latest: Mutex::new(None),
        }
    }

    /// Queue a request, cancelling the previous one
    pub async fn submit(
        &self,
        request: GenerateRequest,
    ) -> Result<oneshot::Receiver<Result<CloudOutput>>> {
        let job_tx = self
            .job_tx
            .as_ref()
            .ok_or_else(|| YuntuError::Other(anyhow::anyhow!("Layout worker is shut down")))?;

        let token = CancellationToken::new();
        let previous = self
            .latest
            .lock()
            .map_err(|_| YuntuError::Other(anyhow::anyhow!("Layout worker state poisoned")))?
            .replace(token.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }

        let (reply, reply_rx) = oneshot::channel();
        job_tx
            .send(LayoutJob {
                request,
                token,
                reply,
            })
            .await
            .map_err(|_| YuntuError::Other(anyhow::anyhow!("Layout worker channel closed")))?;

        Ok(reply_rx)
    }

    /// Stop accepting requests and wait for queued ones to resolve
    pub async fn shutdown(mut self) {
        drop(self.job_tx.take());

        if let Some(handle) = self.handle.take() {
            tracing::debug!("Waiting for layout worker to drain...");
            let _ = handle.await;
        }
    }
}

async fn layout_worker(mut job_rx: mpsc::Receiver<LayoutJob>, pipeline: Arc<CloudPipeline>) {
    let mut completed = 0usize;
    let mut cancelled = 0usize;

    while let Some(job) = job_rx.recv().await {
        let LayoutJob {
            request,
            token,
            reply,
        } = job;

        let result = if token.is_cancelled() {
            Err(YuntuError::Cancelled)
        } else {
            let pipeline = pipeline.clone();
            tokio::task::spawn_blocking(move || {
                pipeline.generate_until(&request, || token.is_cancelled())
            })
            .await
            .unwrap_or_else(|e| {
                Err(YuntuError::Other(anyhow::anyhow!(
                    "Layout task failed: {}",
                    e
                )))
            })
        };

        match &result {
            Err(YuntuError::Cancelled) => cancelled += 1,
            _ => completed += 1,
        }

        // Receiver may have been dropped by a caller that stopped waiting
        let _ = reply.send(result);
    }

    tracing::debug!(
        "Layout worker finished: {} completed, {} cancelled",
        completed,
        cancelled
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::extraction::{ExtractionError, KeywordExtractor};
    use crate::weighting::{ExclusionSet, WeightedWord};

    struct Fixed;

    impl KeywordExtractor for Fixed {
        fn extract(
            &self,
            _text: &str,
            _exclusions: &ExclusionSet,
        ) -> std::result::Result<Vec<WeightedWord>, ExtractionError> {
            Ok((0..20)
                .map(|i| WeightedWord::new(format!("word{i}"), 100.0 - i as f64))
                .collect())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn worker() -> LayoutWorker {
        LayoutWorker::new(
            CloudPipeline::with_extractor(Config::default(), Box::new(Fixed)),
            8,
        )
    }

    #[tokio::test]
    async fn test_single_request_completes() {
        let worker = worker();
        let rx = worker
            .submit(GenerateRequest::new("text").with_seed(7))
            .await
            .unwrap();
        let output = rx.await.unwrap().unwrap();
        assert_eq!(output.layout.seed, Some(7));
        assert!(output.layout.placed_count() > 0);
        worker.shutdown().await;
    }

    #[tokio::test]
    async fn test_latest_request_wins() {
        let worker = worker();
        let first = worker
            .submit(GenerateRequest::new("old").with_seed(1))
            .await
            .unwrap();
        let second = worker
            .submit(GenerateRequest::new("new").with_seed(2))
            .await
            .unwrap();

        assert!(matches!(first.await.unwrap(), Err(YuntuError::Cancelled)));
        let output = second.await.unwrap().unwrap();
        assert_eq!(output.layout.seed, Some(2));
        worker.shutdown().await;
    }

    #[tokio::test]
    async fn test_errors_are_delivered() {
        let worker = worker();
        let rx = worker.submit(GenerateRequest::new(" ")).await.unwrap();
        assert!(matches!(rx.await.unwrap(), Err(YuntuError::EmptyInput)));
        worker.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_drains_queue() {
        let worker = worker();
        let rx = worker
            .submit(GenerateRequest::new("text").with_seed(3))
            .await
            .unwrap();
        worker.shutdown().await;
        assert!(rx.await.unwrap().is_ok());
    }
}
