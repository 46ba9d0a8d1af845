//! Bulk message dispatch.
//!
//! The engine resolves an event's recipients, runs one independent
//! produce → send → record task per recipient behind a semaphore, and folds
//! the outcomes into a [`DispatchReport`]. A failing recipient never stops
//! the others. Transport failures carrying a retry-after hint are retried
//! with jittered exponential backoff; every other failure is final for the
//! call.
//!
//! Each call runs under an overall deadline. When it passes, the report is
//! assembled from the outcomes received so far and every other recipient is
//! reported as a [`FailureKind::Timeout`]. Sends already in flight keep
//! running; recipients that had not started are skipped. A recipient whose
//! task stops without reporting before the deadline is a
//! [`FailureKind::Aborted`].

use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::FutureExt;
use mockable::Clock;
use tokio::sync::{Semaphore, mpsc};
use tokio::time::{Instant, timeout_at};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::messages::{MessageProducer, OutboundMessage, ProduceError};
use crate::domain::ports::{
    EventRepository, MailTransport, ParticipantRepository, TransportError,
};
use crate::domain::repository_errors::{
    map_event_repository_error, map_participant_repository_error,
};
use crate::domain::{Error, Event, Participant};

mod config;
mod recipient;
mod report;
mod retry;

pub use config::DispatchConfig;
pub use recipient::RecipientSelection;
pub use report::{DeliveryFailure, DispatchReport, FailureKind};
pub use retry::{AttemptJitter, BackoffJitter, DispatchSleeper, TokioSleeper};

/// One dispatch call.
pub struct DispatchRequest {
    pub event_id: Uuid,
    pub recipients: RecipientSelection,
    pub producer: Arc<dyn MessageProducer>,
    /// Overrides [`DispatchConfig::deadline`] when set.
    pub deadline: Option<Duration>,
}

/// Port bundle required by the dispatch engine.
pub struct DispatchPorts {
    pub events: Arc<dyn EventRepository>,
    pub participants: Arc<dyn ParticipantRepository>,
    pub transport: Arc<dyn MailTransport>,
}

impl DispatchPorts {
    pub fn new(
        events: Arc<dyn EventRepository>,
        participants: Arc<dyn ParticipantRepository>,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        Self {
            events,
            participants,
            transport,
        }
    }
}

/// Runtime helpers used by the retry policy.
pub struct DispatchRuntime {
    pub sleeper: Arc<dyn DispatchSleeper>,
    pub jitter: Arc<dyn BackoffJitter>,
}

impl Default for DispatchRuntime {
    fn default() -> Self {
        Self {
            sleeper: Arc::new(TokioSleeper),
            jitter: Arc::new(AttemptJitter),
        }
    }
}

struct RecipientOutcome {
    participant_id: Uuid,
    result: Result<(), DeliveryFailure>,
}

/// Domain-owned bulk dispatch engine.
#[derive(Clone)]
pub struct DispatchEngine {
    events: Arc<dyn EventRepository>,
    participants: Arc<dyn ParticipantRepository>,
    transport: Arc<dyn MailTransport>,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn DispatchSleeper>,
    jitter: Arc<dyn BackoffJitter>,
    send_permits: Arc<Semaphore>,
    config: DispatchConfig,
}

impl DispatchEngine {
    /// Build an engine using the Tokio sleeper and default jitter.
    pub fn new(ports: DispatchPorts, clock: Arc<dyn Clock>, config: DispatchConfig) -> Self {
        Self::with_runtime(ports, clock, DispatchRuntime::default(), config)
    }

    /// Build an engine with injected runtime abstractions.
    pub fn with_runtime(
        ports: DispatchPorts,
        clock: Arc<dyn Clock>,
        runtime: DispatchRuntime,
        config: DispatchConfig,
    ) -> Self {
        Self {
            events: ports.events,
            participants: ports.participants,
            transport: ports.transport,
            clock,
            sleeper: runtime.sleeper,
            jitter: runtime.jitter,
            send_permits: Arc::new(Semaphore::new(config.concurrency.max(1))),
            config,
        }
    }

    /// Send one message per selected participant and report the outcome.
    ///
    /// Only call-level problems (unknown event, storage failure while
    /// resolving recipients) are returned as errors.
    pub async fn dispatch(&self, request: DispatchRequest) -> Result<DispatchReport, Error> {
        let DispatchRequest {
            event_id,
            recipients,
            producer,
            deadline,
        } = request;
        let deadline_at = deadline_from_now(deadline.unwrap_or(self.config.deadline));

        let event = self
            .events
            .find_by_id(&event_id)
            .await
            .map_err(map_event_repository_error)?
            .ok_or_else(|| Error::not_found(format!("event {event_id} not found")))?;
        let participants = self
            .participants
            .list_for_event(&event_id, &recipients)
            .await
            .map_err(map_participant_repository_error)?;

        let kind = producer.kind();
        let attempted = participants.len();
        info!(%event_id, %kind, attempted, "dispatch started");
        if participants.is_empty() {
            return Ok(DispatchReport::empty());
        }

        let order: Vec<Uuid> = participants.iter().map(Participant::id).collect();
        let expired = Arc::new(AtomicBool::new(false));
        let mut outcomes = self.spawn_recipients(event, participants, producer, &expired);

        let mut finished = HashSet::with_capacity(attempted);
        let mut deadline_passed = false;
        let mut report = DispatchReport {
            attempted,
            ..DispatchReport::default()
        };
        loop {
            match timeout_at(deadline_at, outcomes.recv()).await {
                Ok(Some(outcome)) => {
                    finished.insert(outcome.participant_id);
                    match outcome.result {
                        Ok(()) => report.sent += 1,
                        Err(failure) => {
                            warn!(
                                %event_id,
                                %kind,
                                participant_id = %failure.participant_id,
                                failure_kind = failure.kind.as_str(),
                                detail = %failure.detail,
                                "recipient delivery failed"
                            );
                            report.failures.push(failure);
                        }
                    }
                }
                Ok(None) => break,
                Err(_) => {
                    expired.store(true, Ordering::SeqCst);
                    deadline_passed = true;
                    warn!(%event_id, %kind, "dispatch deadline reached");
                    break;
                }
            }
        }

        let (missing_kind, missing_detail) = if deadline_passed {
            (FailureKind::Timeout, "dispatch deadline exceeded")
        } else {
            (FailureKind::Aborted, "recipient task ended without an outcome")
        };
        let missing: Vec<Uuid> = order
            .into_iter()
            .filter(|id| !finished.contains(id))
            .collect();
        if !missing.is_empty() && !deadline_passed {
            warn!(
                %event_id,
                %kind,
                lost = missing.len(),
                "recipient tasks ended without an outcome"
            );
        }
        report.failures.extend(
            missing
                .into_iter()
                .map(|id| DeliveryFailure::new(id, missing_kind, missing_detail)),
        );

        info!(
            %event_id,
            %kind,
            attempted = report.attempted,
            sent = report.sent,
            failed = report.failures.len(),
            "dispatch finished"
        );
        Ok(report)
    }

    fn spawn_recipients(
        &self,
        event: Event,
        participants: Vec<Participant>,
        producer: Arc<dyn MessageProducer>,
        expired: &Arc<AtomicBool>,
    ) -> mpsc::UnboundedReceiver<RecipientOutcome> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let event = Arc::new(event);

        for participant in participants {
            let engine = self.clone();
            let event = Arc::clone(&event);
            let producer = Arc::clone(&producer);
            let expired = Arc::clone(expired);
            let sender = sender.clone();

            tokio::spawn(async move {
                let Ok(_permit) = Arc::clone(&engine.send_permits).acquire_owned().await else {
                    return;
                };
                if expired.load(Ordering::SeqCst) {
                    return;
                }
                let participant_id = participant.id();
                let delivery = engine.deliver(&event, &participant, producer.as_ref());
                let result = AssertUnwindSafe(delivery)
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| {
                        Err(DeliveryFailure::new(
                            participant_id,
                            FailureKind::Aborted,
                            "recipient task panicked",
                        ))
                    });
                // The receiver is gone once the deadline has passed.
                let _ = sender.send(RecipientOutcome {
                    participant_id,
                    result,
                });
            });
        }

        receiver
    }

    async fn deliver(
        &self,
        event: &Event,
        participant: &Participant,
        producer: &dyn MessageProducer,
    ) -> Result<(), DeliveryFailure> {
        let participant_id = participant.id();
        let message = producer
            .produce(event, participant)
            .await
            .map_err(|error| match error {
                ProduceError::Render(error) => {
                    DeliveryFailure::new(participant_id, FailureKind::Render, error.to_string())
                }
                ProduceError::Contract { message } => {
                    DeliveryFailure::new(participant_id, FailureKind::Contract, message)
                }
            })?;

        self.send_with_retry(&message).await.map_err(|error| {
            DeliveryFailure::new(participant_id, FailureKind::Transport, error.to_string())
        })?;

        let Some(flag) = producer.delivery_flag() else {
            return Ok(());
        };
        match self
            .participants
            .set_delivery_flag(&participant_id, flag)
            .await
        {
            Ok(true) => Ok(()),
            Ok(false) => Err(DeliveryFailure::new(
                participant_id,
                FailureKind::DeliveryState,
                format!("{} not recorded: participant no longer exists", flag.as_str()),
            )),
            Err(error) => Err(DeliveryFailure::new(
                participant_id,
                FailureKind::DeliveryState,
                format!("{} not recorded: {error}", flag.as_str()),
            )),
        }
    }

    async fn send_with_retry(&self, message: &OutboundMessage) -> Result<u32, TransportError> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            let error = match self.transport.send(message).await {
                Ok(()) => return Ok(attempt),
                Err(error) => error,
            };
            let Some(hint) = error.retry_after().filter(|_| attempt < max_attempts) else {
                return Err(error);
            };

            let base = self.config.retry_base_delay(attempt);
            let delay = self
                .jitter
                .jittered_delay(base, attempt, self.clock.utc())
                .min(self.config.max_backoff)
                .max(hint);
            self.sleeper.sleep(delay).await;
            attempt += 1;
        }
    }
}

/// Saturates to a far-future instant instead of overflowing.
fn deadline_from_now(budget: Duration) -> Instant {
    const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);
    let now = Instant::now();
    now.checked_add(budget)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}
