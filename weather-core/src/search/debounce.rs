use std::{future::Future, time::Duration};

use tokio::task::JoinHandle;

/// A cancellable delayed task. Scheduling again replaces whatever was
/// pending, so only the last call within the quiet period runs.
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` once `delay` has passed without another `schedule` or `cancel`.
    pub fn schedule<F>(&mut self, delay: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    fn counter_action(counter: Arc<AtomicUsize>) -> impl Future<Output = ()> + Send + 'static {
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn only_last_schedule_fires() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new();

        for _ in 0..5 {
            debouncer.schedule(Duration::from_millis(300), counter_action(fired.clone()));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_scheduled());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_and_drop_abort_pending_action() {
        let fired = Arc::new(AtomicUsize::new(0));

        let mut debouncer = Debouncer::new();
        debouncer.schedule(Duration::from_millis(300), counter_action(fired.clone()));
        assert!(debouncer.is_scheduled());
        debouncer.cancel();
        assert!(!debouncer.is_scheduled());

        let mut dropped = Debouncer::new();
        dropped.schedule(Duration::from_millis(300), counter_action(fired.clone()));
        drop(dropped);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
