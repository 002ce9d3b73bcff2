//! Request sequencing and the in-flight guard behind `loading`.

use tokio::sync::watch;

/// State types that expose a `loading` flag driven by an in-flight count.
pub(crate) trait RequestState {
    fn request_started(&mut self);
    fn request_settled(&mut self);
}

// ---------------------------------------------------------------------------
// InFlight
// ---------------------------------------------------------------------------

/// Marks one operation as in flight until dropped.
///
/// Dropping settles the operation on every path: success, failure, early
/// return, or the caller abandoning the future.
pub(crate) struct InFlight<'a, S: RequestState> {
    state: &'a watch::Sender<S>,
}

impl<'a, S: RequestState> InFlight<'a, S> {
    pub(crate) fn begin(state: &'a watch::Sender<S>) -> Self {
        state.send_modify(S::request_started);
        Self { state }
    }
}

impl<S: RequestState> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        self.state.send_modify(S::request_settled);
    }
}

// ---------------------------------------------------------------------------
// RequestTracker
// ---------------------------------------------------------------------------

/// Monotonic request counter; only the latest issued load may apply.
pub(crate) struct RequestTracker {
    latest: watch::Sender<u64>,
}

impl RequestTracker {
    pub(crate) fn new() -> Self {
        let (latest, _) = watch::channel(0);
        Self { latest }
    }

    /// Issue the next sequence number, superseding every earlier one.
    pub(crate) fn issue(&self) -> u64 {
        let mut seq = 0;
        self.latest.send_modify(|latest| {
            *latest += 1;
            seq = *latest;
        });
        seq
    }

    pub(crate) fn is_latest(&self, seq: u64) -> bool {
        *self.latest.borrow() == seq
    }

    /// Resolves once a newer request than `seq` has been issued.
    pub(crate) async fn superseded(&self, seq: u64) {
        let mut rx = self.latest.subscribe();
        if rx.wait_for(|latest| *latest != seq).await.is_err() {
            // Sender gone: nothing can supersede this request any more.
            std::future::pending::<()>().await;
        }
    }
}
