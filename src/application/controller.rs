//! OrderStageController - drives an order session through its timed flow.
//!
//! Wraps the pure [`OrderSession`] with:
//! - the inbound entry points the presentation layer calls
//! - deferred steps (scripted reply, reveal, auto-advance, settlement) routed
//!   through the [`Scheduler`] port
//! - a `watch` channel of [`SessionSnapshot`]s and a `broadcast` channel of
//!   [`SessionEvent`]s for re-rendering
//!
//! # Teardown
//!
//! Deferred steps hold only a weak reference to the session. Closing (or
//! dropping) the controller cancels every outstanding timer; a timer that still
//! fires finds the session gone or closed and does nothing.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tracing::{debug, info, trace};

use super::events::SessionEvent;
use super::timing::ChoreographyTiming;
use crate::domain::conversation::Origin;
use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::order::{
    Action, ActionOutcome, OrderScript, OrderSession, Rejection, ResetPolicy, SessionSnapshot,
    Transition,
};
use crate::ports::{CancelHandle, Clock, Scheduler};

/// Buffer size of the event channel. Slow subscribers skip ahead.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// How a session is set up.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub script: OrderScript,
    pub reset_policy: ResetPolicy,
    pub timing: ChoreographyTiming,
}

struct Inner {
    session: OrderSession,
    timers: Vec<CancelHandle>,
}

struct Shared {
    session_id: SessionId,
    inner: Mutex<Inner>,
    scheduler: Arc<dyn Scheduler>,
    clock: Arc<dyn Clock>,
    timing: ChoreographyTiming,
    snapshots: watch::Sender<SessionSnapshot>,
    events: broadcast::Sender<SessionEvent>,
}

/// Owner of one order session.
///
/// Dropping the controller tears the session down.
pub struct OrderStageController {
    shared: Arc<Shared>,
}

impl OrderStageController {
    /// Starts a session in `Chat`, seeded with the greeting and product card.
    ///
    /// # Errors
    ///
    /// Returns a validation `DomainError` if the session cannot be seeded.
    pub fn start(
        options: SessionOptions,
        scheduler: Arc<dyn Scheduler>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DomainError> {
        let session = OrderSession::start(options.script, options.reset_policy, clock.now())?;
        let session_id = session.id();
        let (snapshots, _) = watch::channel(session.snapshot());
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        info!(
            session_id = %session_id,
            reset_policy = ?options.reset_policy,
            "Order session started"
        );

        Ok(Self {
            shared: Arc::new(Shared {
                session_id,
                inner: Mutex::new(Inner {
                    session,
                    timers: Vec::new(),
                }),
                scheduler,
                clock,
                timing: options.timing,
                snapshots,
                events,
            }),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inbound actions
    // ─────────────────────────────────────────────────────────────────────────

    /// Sends a chat message. Blank input is ignored.
    pub fn submit_message(&self, text: &str) -> ActionOutcome {
        self.shared.submit_message(text)
    }

    /// Starts the simulated payment from the invoice.
    pub fn initiate_payment(&self) -> ActionOutcome {
        self.shared.initiate_payment()
    }

    /// Steps back one stage. Ignored in `Chat`.
    pub fn go_back(&self) -> ActionOutcome {
        self.shared.go_back()
    }

    /// "Order more" from the success screen.
    pub fn reset_to_chat(&self) -> ActionOutcome {
        self.shared.reset_to_chat()
    }

    /// Tears the session down. Returns false if it was already closed.
    pub fn close(&self) -> bool {
        self.shared.close()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Observation
    // ─────────────────────────────────────────────────────────────────────────

    pub fn session_id(&self) -> SessionId {
        self.shared.session_id
    }

    /// Current state of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.lock().session.snapshot()
    }

    /// Receiver that is marked changed after every applied step.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.shared.snapshots.subscribe()
    }

    /// Receiver for choreography events emitted from now on.
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.shared.events.subscribe()
    }

    /// Number of deferred steps that have not fired or been cancelled.
    pub fn pending_timers(&self) -> usize {
        self.shared
            .lock()
            .timers
            .iter()
            .filter(|t| t.is_pending())
            .count()
    }
}

impl Drop for OrderStageController {
    fn drop(&mut self) {
        self.shared.close();
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, session: &OrderSession) {
        self.snapshots.send_replace(session.snapshot());
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn ignored(&self, action: Action, rejection: Rejection) -> ActionOutcome {
        debug!(
            session_id = %self.session_id,
            action = %action,
            reason = %rejection,
            "Action ignored"
        );
        ActionOutcome::Ignored(rejection)
    }

    fn stage_changed(&self, transition: Transition) {
        info!(
            session_id = %self.session_id,
            from = %transition.from,
            to = %transition.to,
            "Stage changed"
        );
        self.emit(SessionEvent::StageChanged {
            from: transition.from,
            to: transition.to,
        });
    }

    /// Schedules `step` to run after `delay` against this session, if it
    /// still exists by then.
    fn schedule<F>(self: &Arc<Self>, inner: &mut Inner, delay: Duration, step: F)
    where
        F: FnOnce(&Arc<Shared>) + Send + 'static,
    {
        let weak: Weak<Shared> = Arc::downgrade(self);
        let session_id = self.session_id;
        let handle = self.scheduler.schedule(
            delay,
            Box::new(move || match weak.upgrade() {
                Some(shared) => step(&shared),
                None => trace!(session_id = %session_id, "Timer fired after session teardown"),
            }),
        );
        inner.timers.retain(CancelHandle::is_pending);
        inner.timers.push(handle);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Steps
    // ─────────────────────────────────────────────────────────────────────────

    fn submit_message(self: &Arc<Self>, text: &str) -> ActionOutcome {
        let mut guard = self.lock();
        let inner = &mut *guard;
        match inner.session.submit_message(text, self.clock.now()) {
            Ok(id) => {
                info!(session_id = %self.session_id, message_id = %id, "User message submitted");
                self.emit(SessionEvent::MessageAppended {
                    id,
                    origin: Origin::User,
                });
                self.publish(&inner.session);
                self.schedule(inner, self.timing.reveal_delay, |shared| {
                    shared.scroll_to_latest()
                });
                self.schedule(inner, self.timing.reply_delay, |shared| shared.deliver_reply());
                ActionOutcome::Applied
            }
            Err(rejection) => self.ignored(Action::SubmitMessage, rejection),
        }
    }

    fn scroll_to_latest(&self) {
        if !self.lock().session.is_closed() {
            self.emit(SessionEvent::ScrollToLatest);
        }
    }

    fn deliver_reply(self: &Arc<Self>) {
        let mut guard = self.lock();
        let inner = &mut *guard;
        match inner.session.deliver_reply(self.clock.now()) {
            Ok(id) => {
                info!(session_id = %self.session_id, message_id = %id, "Scripted reply delivered");
                self.emit(SessionEvent::MessageAppended {
                    id,
                    origin: Origin::Agent,
                });
                self.publish(&inner.session);
                self.schedule(inner, self.timing.reveal_delay, |shared| shared.reveal_reply());
            }
            Err(rejection) => {
                self.ignored(Action::DeliverReply, rejection);
            }
        }
    }

    fn reveal_reply(self: &Arc<Self>) {
        let mut guard = self.lock();
        let inner = &mut *guard;
        if inner.session.is_closed() {
            return;
        }
        self.emit(SessionEvent::ScrollToLatest);
        self.schedule(inner, self.timing.advance_delay, |shared| shared.auto_advance());
    }

    fn auto_advance(&self) {
        let mut inner = self.lock();
        match inner.session.auto_advance() {
            Ok(transition) => {
                self.stage_changed(transition);
                self.publish(&inner.session);
            }
            Err(rejection) => {
                self.ignored(Action::AutoAdvance, rejection);
            }
        }
    }

    fn initiate_payment(self: &Arc<Self>) -> ActionOutcome {
        let mut guard = self.lock();
        let inner = &mut *guard;
        match inner.session.initiate_payment() {
            Ok(()) => {
                info!(session_id = %self.session_id, "Payment initiated");
                self.emit(SessionEvent::PaymentStarted);
                self.publish(&inner.session);
                self.schedule(inner, self.timing.settlement_delay, |shared| {
                    shared.settle_payment()
                });
                ActionOutcome::Applied
            }
            Err(rejection) => self.ignored(Action::InitiatePayment, rejection),
        }
    }

    fn settle_payment(&self) {
        let mut inner = self.lock();
        match inner.session.settle_payment() {
            Ok(transition) => {
                self.emit(SessionEvent::PaymentSettled);
                match transition {
                    Some(transition) => self.stage_changed(transition),
                    None => debug!(
                        session_id = %self.session_id,
                        stage = %inner.session.stage(),
                        "Payment settled after leaving the invoice"
                    ),
                }
                self.publish(&inner.session);
            }
            Err(rejection) => {
                self.ignored(Action::SettlePayment, rejection);
            }
        }
    }

    fn go_back(&self) -> ActionOutcome {
        let mut inner = self.lock();
        match inner.session.go_back() {
            Ok(transition) => {
                self.stage_changed(transition);
                self.publish(&inner.session);
                ActionOutcome::Applied
            }
            Err(rejection) => self.ignored(Action::GoBack, rejection),
        }
    }

    fn reset_to_chat(&self) -> ActionOutcome {
        let mut inner = self.lock();
        match inner.session.reset_to_chat(self.clock.now()) {
            Ok(transition) => {
                self.stage_changed(transition);
                self.publish(&inner.session);
                ActionOutcome::Applied
            }
            Err(rejection) => self.ignored(Action::ResetToChat, rejection),
        }
    }

    fn close(&self) -> bool {
        let mut guard = self.lock();
        let inner = &mut *guard;
        if !inner.session.close() {
            return false;
        }
        let cancelled = inner.timers.drain(..).filter(|t| t.cancel()).count();
        self.publish(&inner.session);
        self.emit(SessionEvent::SessionClosed);
        debug!(
            session_id = %self.session_id,
            cancelled_timers = cancelled,
            "Order session closed"
        );
        true
    }
}
