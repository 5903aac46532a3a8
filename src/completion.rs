// src/completion.rs
use tokio::sync::mpsc;

/// Receiving side of the completion channel. The driver that spawned the
/// tasks counts tokens here; it never needs to know which task sent one.
pub struct CompletionSet {
    rx: mpsc::UnboundedReceiver<()>,
}

/// Sending side, cloned into each spawned task via [`CompletionGuard`]s.
#[derive(Clone)]
pub struct CompletionNotifier {
    tx: mpsc::UnboundedSender<()>,
}

/// Sends exactly one zero-payload token when dropped, so a task signals
/// completion on every exit path, including cancellation and panic unwind.
pub struct CompletionGuard {
    tx: Option<mpsc::UnboundedSender<()>>,
}

impl CompletionSet {
    pub fn new() -> (Self, CompletionNotifier) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx }, CompletionNotifier { tx })
    }

    /// Waits for one completion token. Returns `false` once every notifier
    /// and guard has been dropped and no tokens remain.
    pub async fn wait_one(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }

    /// Drains tokens until the channel closes, i.e. every task is done.
    pub async fn wait_idle(&mut self) {
        while self.rx.recv().await.is_some() {}
    }
}

impl CompletionNotifier {
    pub fn guard(&self) -> CompletionGuard {
        CompletionGuard {
            tx: Some(self.tx.clone()),
        }
    }
}

impl CompletionGuard {
    /// Explicitly signals completion. Equivalent to dropping the guard.
    pub fn complete(self) {}
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            // The receiver may already be gone during teardown.
            let _ = tx.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn guard_signals_once_on_drop() {
        let (mut set, notifier) = CompletionSet::new();
        drop(notifier.guard());
        drop(notifier);
        assert!(set.wait_one().await);
        assert!(!set.wait_one().await);
    }

    #[tokio::test]
    async fn explicit_complete_signals_once() {
        let (mut set, notifier) = CompletionSet::new();
        notifier.guard().complete();
        drop(notifier);
        assert!(set.wait_one().await);
        assert!(!set.wait_one().await);
    }

    #[tokio::test]
    async fn one_token_per_task() {
        let (mut set, notifier) = CompletionSet::new();
        for _ in 0..3 {
            let guard = notifier.guard();
            tokio::spawn(async move {
                let _guard = guard;
            });
        }
        drop(notifier);
        let mut count = 0;
        while set.wait_one().await {
            count += 1;
        }
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn guard_signals_when_task_is_aborted() {
        let (mut set, notifier) = CompletionSet::new();
        let guard = notifier.guard();
        let task = tokio::spawn(async move {
            let _guard = guard;
            std::future::pending::<()>().await;
        });
        task.abort();
        drop(notifier);
        assert!(set.wait_one().await);
        assert!(!set.wait_one().await);
    }
}
