use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use super::{AiError, LanguageModel, generate_weekly_review, parse_tasks_from_text};
use crate::model::task::{ImportItem, Task};

/// Work handed to the background thread
#[derive(Debug, Clone)]
pub enum AiJob {
    Import(String),
    Review(Vec<Task>),
}

/// What came back
#[derive(Debug)]
pub enum AiOutcome {
    Imported(Result<Vec<ImportItem>, AiError>),
    Reviewed(String),
}

struct Tagged {
    generation: u64,
    outcome: AiOutcome,
}

/// Runs AI requests off the UI thread. Every submission bumps the
/// generation; results carrying an older generation are dropped on poll.
pub struct AiWorker {
    model: Arc<dyn LanguageModel>,
    tx: mpsc::Sender<Tagged>,
    rx: mpsc::Receiver<Tagged>,
    generation: u64,
    in_flight: bool,
    dropped: usize,
}

impl AiWorker {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        let (tx, rx) = mpsc::channel();
        AiWorker {
            model,
            tx,
            rx,
            generation: 0,
            in_flight: false,
            dropped: 0,
        }
    }

    /// Start a request, superseding any still running. Returns its generation.
    pub fn submit(&mut self, job: AiJob) -> u64 {
        self.generation += 1;
        self.in_flight = true;
        let generation = self.generation;
        let model = Arc::clone(&self.model);
        let tx = self.tx.clone();

        thread::spawn(move || {
            let outcome = match job {
                AiJob::Import(text) => AiOutcome::Imported(parse_tasks_from_text(&*model, &text)),
                AiJob::Review(tasks) => AiOutcome::Reviewed(generate_weekly_review(&*model, &tasks)),
            };
            // Receiver gone means the app quit; nothing to deliver to
            let _ = tx.send(Tagged {
                generation,
                outcome,
            });
        });
        generation
    }

    /// Forget the running request; its result will be dropped.
    pub fn cancel(&mut self) {
        if self.in_flight {
            self.generation += 1;
            self.in_flight = false;
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Stale results discarded so far
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Non-blocking: the current request's outcome, if it has arrived.
    pub fn poll(&mut self) -> Option<AiOutcome> {
        while let Ok(msg) = self.rx.try_recv() {
            if msg.generation == self.generation && self.in_flight {
                self.in_flight = false;
                return Some(msg.outcome);
            }
            self.dropped += 1;
            tracing::info!(
                generation = msg.generation,
                current = self.generation,
                "dropping stale AI result"
            );
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::fake::FakeModel;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    fn wait_for<T>(mut f: impl FnMut() -> Option<T>) -> T {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(v) = f() {
                return v;
            }
            assert!(Instant::now() < deadline, "timed out waiting for worker");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn import_result_is_delivered() {
        let model = FakeModel::new(|_| {
            Ok(r#"[{"title":"a","quadrant":"Q1","tags":[]},{"title":"b","quadrant":"Q3","tags":[]}]"#.into())
        });
        let mut worker = AiWorker::new(Arc::new(model));
        worker.submit(AiJob::Import("a and b".into()));
        assert!(worker.is_busy());

        let outcome = wait_for(|| worker.poll());
        match outcome {
            AiOutcome::Imported(Ok(items)) => assert_eq!(items.len(), 2),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(!worker.is_busy());
    }

    #[test]
    fn review_result_is_delivered() {
        let model = FakeModel::new(|_| Ok("Nice.".into()));
        let mut worker = AiWorker::new(Arc::new(model));
        worker.submit(AiJob::Review(Vec::new()));
        match wait_for(|| worker.poll()) {
            AiOutcome::Reviewed(text) => assert_eq!(text, "Nice."),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn cancelled_result_is_dropped() {
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let gate = Mutex::new(gate_rx);
        let model = FakeModel::new(move |_| {
            let _ = gate.lock().unwrap().recv();
            Ok("[]".into())
        });
        let mut worker = AiWorker::new(Arc::new(model));
        worker.submit(AiJob::Import("x".into()));
        worker.cancel();
        assert!(!worker.is_busy());

        gate_tx.send(()).unwrap();
        wait_for(|| (worker.poll().is_none() && worker.dropped() == 1).then_some(()));
    }

    #[test]
    fn newer_submission_supersedes_older() {
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let gate = Mutex::new(gate_rx);
        let model = FakeModel::new(move |req| {
            let _ = gate.lock().unwrap().recv();
            Ok(if req.response_schema.is_some() {
                "[]".into()
            } else {
                "review".into()
            })
        });
        let mut worker = AiWorker::new(Arc::new(model));
        let first = worker.submit(AiJob::Import("x".into()));
        let second = worker.submit(AiJob::Review(Vec::new()));
        assert!(second > first);

        gate_tx.send(()).unwrap();
        gate_tx.send(()).unwrap();
        match wait_for(|| worker.poll()) {
            AiOutcome::Reviewed(text) => assert_eq!(text, "review"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
