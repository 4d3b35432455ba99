//! Connectivity probing with a fixed-delay retry loop.
//!
//! The loop re-enters `Connecting` before every attempt, reports
//! `Offline` after a failed one, and stops at the first `Online`.
//! Exactly one probe is in flight at a time: the next attempt is
//! scheduled only after the previous one has resolved.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use super::api::RelayApi;
use super::types::{ClientEvent, Connectivity};

/// Delay between a failed probe and the next attempt.
pub const RETRY_DELAY: Duration = Duration::from_millis(3000);

/// Probe the relay until it answers, reporting every transition over
/// the event channel. Runs indefinitely until success or until the
/// receiving side goes away.
pub async fn probe_until_online(
    api: Arc<dyn RelayApi>,
    events: mpsc::UnboundedSender<ClientEvent>,
) {
    loop {
        if events
            .send(ClientEvent::Connectivity(Connectivity::Connecting))
            .is_err()
        {
            return;
        }

        if api.probe().await {
            let _ = events.send(ClientEvent::Connectivity(Connectivity::Online));
            return;
        }

        if events
            .send(ClientEvent::Connectivity(Connectivity::Offline))
            .is_err()
        {
            return;
        }
        tokio::time::sleep(RETRY_DELAY).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::time::Instant;

    use crate::client::types::SendOutcome;

    /// Probe results played back in order; sends are never expected.
    struct ScriptedApi {
        results: Mutex<VecDeque<bool>>,
    }

    impl ScriptedApi {
        fn new(results: &[bool]) -> Arc<Self> {
            Arc::new(Self {
                results: Mutex::new(results.iter().copied().collect()),
            })
        }
    }

    #[async_trait]
    impl RelayApi for ScriptedApi {
        async fn probe(&self) -> bool {
            self.results
                .lock()
                .map(|mut queue| queue.pop_front().unwrap_or(false))
                .unwrap_or(false)
        }

        async fn send(&self, _message: &str) -> SendOutcome {
            SendOutcome::Transport {
                message: "no sends in this test".to_string(),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_failures_then_success() {
        let api = ScriptedApi::new(&[false, false, true]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let start = Instant::now();

        let task = tokio::spawn(probe_until_online(api, tx));

        let mut seen = Vec::new();
        while let Some(event) = rx.recv().await {
            let elapsed = start.elapsed();
            seen.push((event, elapsed));
        }
        let _ = task.await;

        let states: Vec<_> = seen.iter().map(|(event, _)| event.clone()).collect();
        assert_eq!(
            states,
            vec![
                ClientEvent::Connectivity(Connectivity::Connecting),
                ClientEvent::Connectivity(Connectivity::Offline),
                ClientEvent::Connectivity(Connectivity::Connecting),
                ClientEvent::Connectivity(Connectivity::Offline),
                ClientEvent::Connectivity(Connectivity::Connecting),
                ClientEvent::Connectivity(Connectivity::Online),
            ]
        );

        // Virtual time: exactly one retry delay between attempts.
        assert_eq!(seen[0].1, Duration::ZERO);
        assert_eq!(seen[2].1, RETRY_DELAY);
        assert_eq!(seen[4].1, RETRY_DELAY * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_success_probes_once() {
        let api = ScriptedApi::new(&[true]);
        let (tx, mut rx) = mpsc::unbounded_channel();

        probe_until_online(api, tx).await;

        let mut states = Vec::new();
        while let Ok(event) = rx.try_recv() {
            states.push(event);
        }
        assert_eq!(
            states,
            vec![
                ClientEvent::Connectivity(Connectivity::Connecting),
                ClientEvent::Connectivity(Connectivity::Online),
            ]
        );
    }
}
