//! Order session aggregate.
//!
//! Pure state for one ordering flow: the current stage, the conversation log and
//! the pending-operation guards. Every method applies one step of the flow or
//! returns the [`Rejection`] that kept it from applying. Timing lives in the
//! application layer; nothing here schedules or sleeps.

use super::pending::{PendingOperation, PendingOperations};
use super::rejection::{Action, Rejection};
use super::script::{OrderScript, ResetPolicy};
use super::snapshot::SessionSnapshot;
use super::stage::{OrderStage, Transition};
use crate::domain::conversation::{ConversationLog, Message, Origin};
use crate::domain::foundation::{
    DomainError, MessageId, MessageIdSequence, SessionId, StateMachine, Timestamp,
};

/// One customer's ordering flow.
///
/// # Invariants
///
/// - The log is only ever appended to, except that `reset_to_chat` under
///   [`ResetPolicy::ClearConversation`] swaps in a freshly seeded log
/// - Message ids are issued from a single sequence and never reused
/// - Once closed, every step is rejected
#[derive(Debug)]
pub struct OrderSession {
    id: SessionId,
    stage: OrderStage,
    log: ConversationLog,
    pending: PendingOperations,
    ids: MessageIdSequence,
    script: OrderScript,
    reset_policy: ResetPolicy,
    closed: bool,
}

impl OrderSession {
    /// Starts a session in `Chat`, seeded with the greeting and the product card.
    ///
    /// # Errors
    ///
    /// Returns a validation `DomainError` if the greeting cannot be posted.
    pub fn start(
        script: OrderScript,
        reset_policy: ResetPolicy,
        now: Timestamp,
    ) -> Result<Self, DomainError> {
        let ids = MessageIdSequence::new();
        let log = Self::seed_log(&ids, &script, now)?;
        Ok(Self {
            id: SessionId::new(),
            stage: OrderStage::Chat,
            log,
            pending: PendingOperations::new(),
            ids,
            script,
            reset_policy,
            closed: false,
        })
    }

    /// Builds a log holding exactly the greeting and the product card.
    fn seed_log(
        ids: &MessageIdSequence,
        script: &OrderScript,
        now: Timestamp,
    ) -> Result<ConversationLog, DomainError> {
        let greeting = Message::agent(ids.peek(), script.greeting(), now)?;
        ids.next_id();
        let card = Message::rich_content(ids.next_id(), Origin::Agent, now);
        Ok(ConversationLog::with_seed([greeting, card]))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Steps
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends the trimmed user message and starts waiting for the reply.
    pub fn submit_message(&mut self, text: &str, now: Timestamp) -> Result<MessageId, Rejection> {
        self.ensure_open()?;
        self.ensure_stage(Action::SubmitMessage, OrderStage::accepts_chat_input)?;
        if text.trim().is_empty() {
            return Err(Rejection::BlankInput);
        }
        for op in [PendingOperation::AwaitingReply, PendingOperation::AutoAdvance] {
            if self.pending.is_pending(op) {
                return Err(Rejection::OperationPending(op));
            }
        }

        let message =
            Message::user(self.ids.peek(), text, now).map_err(|_| Rejection::BlankInput)?;
        self.ids.next_id();
        self.pending.begin(PendingOperation::AwaitingReply)?;
        Ok(self.log.append(message))
    }

    /// Appends the scripted reply and arms the move to the invoice.
    pub fn deliver_reply(&mut self, now: Timestamp) -> Result<MessageId, Rejection> {
        self.ensure_open()?;
        if !self.pending.is_pending(PendingOperation::AwaitingReply) {
            return Err(Rejection::NotPending(PendingOperation::AwaitingReply));
        }

        // AwaitingReply is released even if the reply cannot be built.
        self.pending.finish(PendingOperation::AwaitingReply);
        let message = Message::agent(self.ids.peek(), self.script.reply(), now)
            .map_err(|_| Rejection::BlankInput)?;
        self.ids.next_id();
        self.pending.begin(PendingOperation::AutoAdvance)?;
        Ok(self.log.append(message))
    }

    /// Moves from `Chat` to `Invoice` once the reply has been shown.
    pub fn auto_advance(&mut self) -> Result<Transition, Rejection> {
        self.ensure_open()?;
        if !self.pending.finish(PendingOperation::AutoAdvance) {
            return Err(Rejection::NotPending(PendingOperation::AutoAdvance));
        }
        self.ensure_stage(Action::AutoAdvance, OrderStage::accepts_chat_input)?;
        self.move_to(Action::AutoAdvance, OrderStage::Invoice)
    }

    /// Starts settlement from `Invoice`.
    pub fn initiate_payment(&mut self) -> Result<(), Rejection> {
        self.ensure_open()?;
        self.ensure_stage(Action::InitiatePayment, OrderStage::accepts_payment)?;
        self.pending.begin(PendingOperation::Settlement)
    }

    /// Completes settlement.
    ///
    /// The processing flag is released whenever settlement was in flight, before
    /// any stage check. The move to `Success` only happens if the customer is
    /// still on the invoice; `Ok(None)` means the flag was released without one.
    pub fn settle_payment(&mut self) -> Result<Option<Transition>, Rejection> {
        self.ensure_open()?;
        if !self.pending.finish(PendingOperation::Settlement) {
            return Err(Rejection::NotPending(PendingOperation::Settlement));
        }
        if self.stage != OrderStage::Invoice {
            return Ok(None);
        }
        self.move_to(Action::SettlePayment, OrderStage::Success).map(Some)
    }

    /// Steps back one stage: `Success -> Invoice -> Chat`.
    pub fn go_back(&mut self) -> Result<Transition, Rejection> {
        self.ensure_open()?;
        let previous = self
            .stage
            .previous()
            .ok_or(Rejection::NoPredecessor(self.stage))?;
        self.move_to(Action::GoBack, previous)
    }

    /// "Order more": returns from `Success` to `Chat`.
    pub fn reset_to_chat(&mut self, now: Timestamp) -> Result<Transition, Rejection> {
        self.ensure_open()?;
        self.ensure_stage(Action::ResetToChat, OrderStage::accepts_order_more)?;
        let reseeded = match self.reset_policy {
            ResetPolicy::KeepConversation => None,
            ResetPolicy::ClearConversation => Some(
                Self::seed_log(&self.ids, &self.script, now).map_err(|_| Rejection::BlankInput)?,
            ),
        };
        let transition = self.move_to(Action::ResetToChat, OrderStage::Chat)?;
        if let Some(log) = reseeded {
            self.log = log;
        }
        Ok(transition)
    }

    /// Tears the session down. Pending operations are released and every
    /// later step is rejected.
    pub fn close(&mut self) -> bool {
        if self.closed {
            return false;
        }
        self.closed = true;
        self.pending.clear();
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn stage(&self) -> OrderStage {
        self.stage
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn pending(&self) -> &PendingOperations {
        &self.pending
    }

    pub fn awaiting_reply(&self) -> bool {
        self.pending.awaiting_reply()
    }

    pub fn processing_payment(&self) -> bool {
        self.pending.processing_payment()
    }

    pub fn reset_policy(&self) -> ResetPolicy {
        self.reset_policy
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            stage: self.stage,
            messages: self.log.all().cloned().collect(),
            awaiting_reply: self.awaiting_reply(),
            processing_payment: self.processing_payment(),
            closed: self.closed,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn ensure_open(&self) -> Result<(), Rejection> {
        if self.closed {
            return Err(Rejection::SessionClosed);
        }
        Ok(())
    }

    fn ensure_stage(
        &self,
        action: Action,
        allowed: fn(&OrderStage) -> bool,
    ) -> Result<(), Rejection> {
        if !allowed(&self.stage) {
            return Err(Rejection::WrongStage {
                action,
                stage: self.stage,
            });
        }
        Ok(())
    }

    fn move_to(&mut self, action: Action, target: OrderStage) -> Result<Transition, Rejection> {
        let from = self.stage;
        self.stage = from.transition_to(target).map_err(|_| Rejection::WrongStage {
            action,
            stage: from,
        })?;
        Ok(Transition { from, to: target })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn now() -> Timestamp {
        Timestamp::from_unix_millis(1_700_000_000_000)
    }

    fn session() -> OrderSession {
        OrderSession::start(OrderScript::default(), ResetPolicy::default(), now()).unwrap()
    }

    fn session_at_invoice() -> OrderSession {
        let mut s = session();
        s.submit_message("I'll take it", now()).unwrap();
        s.deliver_reply(now()).unwrap();
        s.auto_advance().unwrap();
        s
    }

    fn session_at_success() -> OrderSession {
        let mut s = session_at_invoice();
        s.initiate_payment().unwrap();
        s.settle_payment().unwrap();
        s
    }

    mod start {
        use super::*;

        #[test]
        fn starts_in_chat_with_two_seeded_agent_messages() {
            let s = session();
            assert_eq!(s.stage(), OrderStage::Chat);
            assert_eq!(s.log().len(), 2);
            assert_eq!(s.log().count_from(Origin::Agent), 2);
            assert!(s.pending().is_idle());
        }

        #[test]
        fn deserialized_script_seeds_both_messages_and_replies() {
            let script: OrderScript =
                serde_json::from_str(r#"{"greeting":"Hello","reply":"Coming up"}"#).unwrap();
            let mut s = OrderSession::start(script, ResetPolicy::default(), now()).unwrap();
            assert_eq!(s.log().len(), 2);

            s.submit_message("hi", now()).unwrap();
            s.deliver_reply(now()).unwrap();
            assert!(!s.awaiting_reply());
            assert_eq!(s.log().last().map(Message::text), Some("Coming up"));
        }

        #[test]
        fn second_seed_message_is_the_product_card() {
            let s = session();
            let kinds: Vec<_> = s.log().all().map(Message::kind).collect();
            assert_eq!(
                kinds,
                vec![
                    crate::domain::conversation::MessageKind::Plain,
                    crate::domain::conversation::MessageKind::RichContent
                ]
            );
        }
    }

    mod submit_message {
        use super::*;

        #[test]
        fn appends_trimmed_user_message_and_awaits_reply() {
            let mut s = session();
            let id = s.submit_message("  I'll take it  ", now()).unwrap();
            let last = s.log().last().unwrap();
            assert_eq!(last.id(), id);
            assert_eq!(last.text(), "I'll take it");
            assert!(last.is_user());
            assert!(s.awaiting_reply());
        }

        #[test]
        fn blank_input_changes_nothing() {
            let mut s = session();
            for input in ["", "   ", "\n\t"] {
                assert_eq!(s.submit_message(input, now()), Err(Rejection::BlankInput));
            }
            assert_eq!(s.log().len(), 2);
            assert!(!s.awaiting_reply());
        }

        #[test]
        fn rejected_while_reply_pending() {
            let mut s = session();
            s.submit_message("one", now()).unwrap();
            assert_eq!(
                s.submit_message("two", now()),
                Err(Rejection::OperationPending(PendingOperation::AwaitingReply))
            );
            assert_eq!(s.log().len(), 3);
        }

        #[test]
        fn rejected_while_auto_advance_pending() {
            let mut s = session();
            s.submit_message("one", now()).unwrap();
            s.deliver_reply(now()).unwrap();
            assert_eq!(
                s.submit_message("two", now()),
                Err(Rejection::OperationPending(PendingOperation::AutoAdvance))
            );
        }

        #[test]
        fn rejected_outside_chat() {
            let mut s = session_at_invoice();
            assert_eq!(
                s.submit_message("hello", now()),
                Err(Rejection::WrongStage {
                    action: Action::SubmitMessage,
                    stage: OrderStage::Invoice
                })
            );
        }

        #[test]
        fn blank_rejection_does_not_consume_an_id() {
            let mut s = session();
            let _ = s.submit_message("   ", now());
            let id = s.submit_message("hi", now()).unwrap();
            assert_eq!(id, MessageId::from_raw(3));
        }
    }

    mod reply_and_advance {
        use super::*;

        #[test]
        fn reply_appends_scripted_agent_message() {
            let mut s = session();
            s.submit_message("I'll take it", now()).unwrap();
            s.deliver_reply(now()).unwrap();
            let last = s.log().last().unwrap();
            assert!(last.is_agent());
            assert_eq!(last.text(), OrderScript::default().reply());
            assert!(!s.awaiting_reply());
        }

        #[test]
        fn reply_without_pending_submit_is_rejected() {
            let mut s = session();
            assert_eq!(
                s.deliver_reply(now()),
                Err(Rejection::NotPending(PendingOperation::AwaitingReply))
            );
            assert_eq!(s.log().len(), 2);
        }

        #[test]
        fn duplicate_reply_is_rejected() {
            let mut s = session();
            s.submit_message("x", now()).unwrap();
            s.deliver_reply(now()).unwrap();
            assert!(s.deliver_reply(now()).is_err());
            assert_eq!(s.log().len(), 4);
        }

        #[test]
        fn auto_advance_moves_chat_to_invoice() {
            let mut s = session();
            s.submit_message("x", now()).unwrap();
            s.deliver_reply(now()).unwrap();
            assert_eq!(
                s.auto_advance(),
                Ok(Transition {
                    from: OrderStage::Chat,
                    to: OrderStage::Invoice
                })
            );
            assert!(s.pending().is_idle());
        }

        #[test]
        fn auto_advance_without_reply_is_rejected() {
            let mut s = session();
            assert!(s.auto_advance().is_err());
            assert_eq!(s.stage(), OrderStage::Chat);
        }
    }

    mod payment {
        use super::*;

        #[test]
        fn initiate_sets_processing_flag() {
            let mut s = session_at_invoice();
            s.initiate_payment().unwrap();
            assert!(s.processing_payment());
            assert_eq!(s.stage(), OrderStage::Invoice);
        }

        #[test]
        fn initiate_twice_is_rejected() {
            let mut s = session_at_invoice();
            s.initiate_payment().unwrap();
            assert_eq!(
                s.initiate_payment(),
                Err(Rejection::OperationPending(PendingOperation::Settlement))
            );
        }

        #[test]
        fn initiate_from_chat_is_rejected() {
            let mut s = session();
            assert!(matches!(
                s.initiate_payment(),
                Err(Rejection::WrongStage { .. })
            ));
            assert!(!s.processing_payment());
        }

        #[test]
        fn settle_moves_to_success_and_releases_flag() {
            let mut s = session_at_invoice();
            s.initiate_payment().unwrap();
            let t = s.settle_payment().unwrap();
            assert_eq!(t.map(|t| t.to), Some(OrderStage::Success));
            assert!(!s.processing_payment());
        }

        #[test]
        fn settle_after_leaving_invoice_only_releases_flag() {
            let mut s = session_at_invoice();
            s.initiate_payment().unwrap();
            s.go_back().unwrap();
            assert_eq!(s.settle_payment(), Ok(None));
            assert_eq!(s.stage(), OrderStage::Chat);
            assert!(!s.processing_payment());
        }

        #[test]
        fn settle_without_initiate_is_rejected() {
            let mut s = session_at_invoice();
            assert_eq!(
                s.settle_payment(),
                Err(Rejection::NotPending(PendingOperation::Settlement))
            );
            assert_eq!(s.stage(), OrderStage::Invoice);
        }
    }

    mod navigation {
        use super::*;

        #[test]
        fn back_from_chat_is_noop() {
            let mut s = session();
            assert_eq!(s.go_back(), Err(Rejection::NoPredecessor(OrderStage::Chat)));
            assert_eq!(s.stage(), OrderStage::Chat);
        }

        #[test]
        fn back_from_invoice_yields_chat() {
            let mut s = session_at_invoice();
            s.go_back().unwrap();
            assert_eq!(s.stage(), OrderStage::Chat);
        }

        #[test]
        fn back_from_success_yields_invoice() {
            let mut s = session_at_success();
            s.go_back().unwrap();
            assert_eq!(s.stage(), OrderStage::Invoice);
        }

        #[test]
        fn reset_keeps_log_by_default() {
            let mut s = session_at_success();
            let before = s.log().clone();
            s.reset_to_chat(now()).unwrap();
            assert_eq!(s.stage(), OrderStage::Chat);
            assert_eq!(s.log(), &before);
            assert_eq!(s.log().len(), 4);
        }

        #[test]
        fn reset_is_idempotent() {
            let mut s = session_at_success();
            s.reset_to_chat(now()).unwrap();
            let snapshot = s.snapshot();
            assert!(s.reset_to_chat(now()).is_err());
            assert_eq!(s.snapshot(), snapshot);
        }

        #[test]
        fn reset_from_invoice_is_rejected() {
            let mut s = session_at_invoice();
            assert!(s.reset_to_chat(now()).is_err());
            assert_eq!(s.stage(), OrderStage::Invoice);
        }

        #[test]
        fn clear_policy_reseeds_with_fresh_ids() {
            let mut s = OrderSession::start(
                OrderScript::default(),
                ResetPolicy::ClearConversation,
                now(),
            )
            .unwrap();
            s.submit_message("x", now()).unwrap();
            s.deliver_reply(now()).unwrap();
            s.auto_advance().unwrap();
            s.initiate_payment().unwrap();
            s.settle_payment().unwrap();
            s.reset_to_chat(now()).unwrap();

            assert_eq!(s.log().len(), 2);
            let first = s.log().all().next().unwrap();
            assert!(first.id() > MessageId::from_raw(4));
        }
    }

    mod close {
        use super::*;

        #[test]
        fn close_rejects_all_later_steps() {
            let mut s = session();
            s.submit_message("x", now()).unwrap();
            assert!(s.close());
            assert!(!s.awaiting_reply());
            assert_eq!(s.deliver_reply(now()), Err(Rejection::SessionClosed));
            assert_eq!(s.submit_message("y", now()), Err(Rejection::SessionClosed));
            assert_eq!(s.log().len(), 3);
        }

        #[test]
        fn close_twice_reports_false() {
            let mut s = session();
            assert!(s.close());
            assert!(!s.close());
        }
    }

    #[test]
    fn full_flow_never_skips_invoice() {
        let mut s = session();
        let mut visited = vec![s.stage()];
        s.submit_message("I'll take it", now()).unwrap();
        s.deliver_reply(now()).unwrap();
        visited.push(s.auto_advance().unwrap().to);
        s.initiate_payment().unwrap();
        visited.extend(s.settle_payment().unwrap().map(|t| t.to));
        assert_eq!(
            visited,
            vec![OrderStage::Chat, OrderStage::Invoice, OrderStage::Success]
        );
    }

    proptest! {
        #[test]
        fn non_blank_submit_appends_exactly_one_trimmed_message(text in "\\s*[a-zA-Z0-9'!?][a-zA-Z0-9 '!?]{0,30}\\s*") {
            let mut s = session();
            s.submit_message(&text, now()).unwrap();
            prop_assert_eq!(s.log().len(), 3);
            prop_assert_eq!(s.log().last().unwrap().text(), text.trim());
        }

        #[test]
        fn blank_submit_is_noop(text in "[ \\t\\n]{0,10}") {
            let mut s = session();
            let before = s.snapshot();
            prop_assert_eq!(s.submit_message(&text, now()), Err(Rejection::BlankInput));
            prop_assert_eq!(s.snapshot(), before);
        }
    }
}
