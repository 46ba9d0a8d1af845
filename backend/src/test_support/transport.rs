//! Scripted mail transport for dispatch tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::messages::OutboundMessage;
use crate::domain::ports::{MailTransport, TransportError};

/// Accepts every message unless a per-recipient script says otherwise.
///
/// Scripted results are consumed one per send to that address; once a
/// script runs out, sends succeed. Stalled addresses never complete.
#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<String, VecDeque<Result<(), TransportError>>>>,
    stalled: HashSet<String>,
    latency: Option<Duration>,
    delivered: Mutex<Vec<OutboundMessage>>,
    calls: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl ScriptedTransport {
    pub fn accepting() -> Self {
        Self::default()
    }

    pub fn script(self, to: &str, results: Vec<Result<(), TransportError>>) -> Self {
        match self.scripts.lock() {
            Ok(mut scripts) => {
                scripts.insert(to.to_owned(), results.into());
            }
            Err(_) => panic!("transport script mutex"),
        }
        self
    }

    pub fn failing(self, to: &str, error: TransportError) -> Self {
        self.script(to, vec![Err(error)])
    }

    pub fn stall(mut self, to: &str) -> Self {
        self.stalled.insert(to.to_owned());
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Messages the transport confirmed, in completion order.
    pub fn delivered(&self) -> Vec<OutboundMessage> {
        match self.delivered.lock() {
            Ok(delivered) => delivered.clone(),
            Err(_) => panic!("delivered mutex"),
        }
    }

    pub fn delivered_to(&self) -> Vec<String> {
        self.delivered()
            .into_iter()
            .map(|message| message.to)
            .collect()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    fn next_result(&self, to: &str) -> Result<(), TransportError> {
        match self.scripts.lock() {
            Ok(mut scripts) => scripts
                .get_mut(to)
                .and_then(VecDeque::pop_front)
                .unwrap_or(Ok(())),
            Err(_) => panic!("transport script mutex"),
        }
    }
}

#[async_trait]
impl MailTransport for ScriptedTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let active_now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active_now, Ordering::SeqCst);

        if self.stalled.contains(&message.to) {
            std::future::pending::<()>().await;
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let result = self.next_result(&message.to);
        if result.is_ok() {
            match self.delivered.lock() {
                Ok(mut delivered) => delivered.push(message.clone()),
                Err(_) => panic!("delivered mutex"),
            }
        }
        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
