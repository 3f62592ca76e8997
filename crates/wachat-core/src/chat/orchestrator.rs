//! The conversation orchestrator.
//!
//! Sequences one turn strictly in order:
//!
//! 1. persist the user message
//! 2. append it to the transcript
//! 3. build the payload from the prior transcript plus the new user turn
//! 4. call the completion provider
//! 5. persist the assistant message
//! 6. append it to the transcript
//!
//! A failure at 1, 4 or 5 stops the turn where it is. Nothing is rolled back;
//! an orphaned user message with no reply is accepted.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use wachat_types::error::{ChatError, ChatErrorKind};
use wachat_types::llm::{CompletionRequest, CompletionTurn};
use wachat_types::message::{Message, MessageRole, NewMessage};
use wachat_types::session::{Session, UserId};

use crate::llm::provider::CompletionProvider;
use crate::repository::message::MessageRepository;

use super::context_window::{ContextWindowPolicy, FullHistory};
use super::notifier::{Notification, Notifier};
use super::transcript::Transcript;

/// How a call to [`ConversationOrchestrator::send_turn`] ended.
///
/// Informational only. The transcript is the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// No active session.
    Skipped,
    Completed,
    Failed(ChatErrorKind),
}

/// What the orchestrator did after observing the session subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChange {
    /// A user became active (first sign-in or a different user).
    SignedIn,
    /// The session went away; the transcript was cleared.
    SignedOut,
    /// Same user as before (e.g., a token refresh) or nothing new.
    Unchanged,
}

/// Sets the busy flag on creation and clears it on drop.
struct BusyGuard {
    tx: Arc<watch::Sender<bool>>,
}

impl BusyGuard {
    fn enter(tx: &Arc<watch::Sender<bool>>) -> Self {
        tx.send_replace(true);
        Self { tx: Arc::clone(tx) }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.tx.send_replace(false);
    }
}

/// Owns the transcript for the active session.
///
/// The session subscription is handed in at construction and held for the
/// orchestrator's whole lifetime; dropping the orchestrator releases it.
pub struct ConversationOrchestrator<R: MessageRepository, P: CompletionProvider, N: Notifier> {
    repo: R,
    provider: P,
    notifier: N,
    policy: Box<dyn ContextWindowPolicy>,
    model: String,
    session_rx: watch::Receiver<Option<Session>>,
    active_user: Option<UserId>,
    transcript: Transcript,
    busy_tx: Arc<watch::Sender<bool>>,
}

impl<R: MessageRepository, P: CompletionProvider, N: Notifier> ConversationOrchestrator<R, P, N> {
    /// `session_rx` comes from `SessionStore::subscribe()`.
    ///
    /// Starts with an empty transcript and no active user; call
    /// [`sync_session`](Self::sync_session) to pick up the current session.
    pub fn new(
        repo: R,
        provider: P,
        notifier: N,
        session_rx: watch::Receiver<Option<Session>>,
    ) -> Self {
        let (busy_tx, _) = watch::channel(false);
        Self {
            repo,
            provider,
            notifier,
            policy: Box::new(FullHistory),
            model: String::new(),
            session_rx,
            active_user: None,
            transcript: Transcript::new(),
            busy_tx: Arc::new(busy_tx),
        }
    }

    pub fn with_policy(mut self, policy: Box<dyn ContextWindowPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Model override sent with every request. Empty means provider default.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn transcript(&self) -> &[Message] {
        self.transcript.messages()
    }

    pub fn active_user(&self) -> Option<&UserId> {
        self.active_user.as_ref()
    }

    /// The current session as last observed through the subscription.
    pub fn session(&self) -> Option<Session> {
        self.session_rx
            .borrow()
            .as_ref()
            .filter(|s| !s.is_expired())
            .cloned()
    }

    /// Advisory in-flight flag for the presentation layer.
    pub fn busy(&self) -> watch::Receiver<bool> {
        self.busy_tx.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        *self.busy_tx.borrow()
    }

    /// Replace the transcript with `owner`'s full history.
    ///
    /// On failure the transcript is left as it was and a single notification
    /// has already been raised; the error is returned for the caller's logs.
    pub async fn load_transcript(&mut self, owner: &UserId) -> Result<usize, ChatError> {
        match self.repo.select_all(owner).await {
            Ok(rows) => {
                let messages: Vec<Message> = rows.into_iter().map(Message::from).collect();
                let count = messages.len();
                self.transcript.replace(messages);
                debug!(user_id = %owner, count, "transcript loaded");
                Ok(count)
            }
            Err(source) => {
                let err = ChatError::load(source);
                self.report(&err);
                Err(err)
            }
        }
    }

    /// Run one conversational turn for `session`.
    ///
    /// `content` must already be validated (non-blank). With no session, or
    /// an expired one, this does nothing.
    pub async fn send_turn(&mut self, content: &str, session: Option<&Session>) -> TurnOutcome {
        let Some(session) = session.filter(|s| !s.is_expired()) else {
            debug!("send_turn without an active session; ignored");
            return TurnOutcome::Skipped;
        };

        let _busy = BusyGuard::enter(&self.busy_tx);
        match self.run_turn(content, &session.user_id).await {
            Ok(()) => TurnOutcome::Completed,
            Err(err) => {
                self.report(&err);
                TurnOutcome::Failed(err.kind())
            }
        }
    }

    async fn run_turn(&mut self, content: &str, owner: &UserId) -> Result<(), ChatError> {
        let user_message = NewMessage::new(owner.clone(), MessageRole::User, content);
        self.repo
            .insert(&user_message)
            .await
            .map_err(ChatError::write)?;

        let mut turns = self.transcript.to_turns();
        turns.push(CompletionTurn::new(user_message.role, user_message.content.clone()));
        self.transcript.push(user_message.to_message());

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: self.policy.apply(turns),
        };
        debug!(
            user_id = %owner,
            turns = request.messages.len(),
            policy = self.policy.name(),
            provider = self.provider.name(),
            "requesting completion"
        );
        let reply = self.provider.complete(&request).await?;

        let assistant_message = NewMessage::new(owner.clone(), MessageRole::Assistant, reply.content);
        self.repo
            .insert(&assistant_message)
            .await
            .map_err(ChatError::write)?;
        self.transcript.push(assistant_message.to_message());

        info!(
            user_id = %owner,
            model = %reply.model,
            input_tokens = reply.usage.map(|u| u.input_tokens),
            output_tokens = reply.usage.map(|u| u.output_tokens),
            "turn completed"
        );
        Ok(())
    }

    /// Reconcile with the latest value of the session subscription.
    ///
    /// A new or different user reloads the transcript; no user clears it.
    pub async fn sync_session(&mut self) -> SessionChange {
        let observed = self
            .session_rx
            .borrow_and_update()
            .as_ref()
            .filter(|s| !s.is_expired())
            .map(|s| s.user_id.clone());

        if observed == self.active_user {
            return SessionChange::Unchanged;
        }

        // Never show one user's messages to another, even if the reload fails.
        self.transcript.clear();
        match observed {
            Some(user) => {
                info!(user_id = %user, "session active");
                self.active_user = Some(user.clone());
                match self.load_transcript(&user).await {
                    Ok(count) => debug!(user_id = %user, count, "history reloaded"),
                    Err(err) => {
                        debug!(user_id = %user, error = %err, "history reload failed; transcript left empty")
                    }
                }
                SessionChange::SignedIn
            }
            None => {
                info!("session ended; transcript cleared");
                self.active_user = None;
                SessionChange::SignedOut
            }
        }
    }

    /// Wait for the next push on the subscription, then sync.
    ///
    /// `None` once the session store has gone away.
    pub async fn next_session_change(&mut self) -> Option<SessionChange> {
        self.session_rx.changed().await.ok()?;
        Some(self.sync_session().await)
    }

    fn report(&self, err: &ChatError) {
        match err {
            ChatError::Completion(completion) => warn!(
                kind = ?err.kind(),
                error = ?completion,
                detail = completion.detail().unwrap_or_default(),
                "turn failed"
            ),
            other => warn!(kind = ?other.kind(), error = %other, "chat operation failed"),
        }
        self.notifier.notify(Notification::error(err.user_message()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use chrono::Duration;
    use wachat_types::error::RepositoryError;
    use wachat_types::llm::{CompletionError, CompletionReply, CompletionRole};
    use wachat_types::message::StoredMessage;

    use crate::chat::context_window::RecentTurns;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Insert(MessageRole, String),
        Select,
        Complete(usize),
        Notify(String),
    }

    #[derive(Clone, Default)]
    struct Log(Arc<Mutex<Vec<Call>>>);

    impl Log {
        fn push(&self, call: Call) {
            self.0.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<Call> {
            self.0.lock().unwrap().clone()
        }

        fn notifications(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::Notify(m) => Some(m),
                    _ => None,
                })
                .collect()
        }
    }

    #[derive(Clone, Default)]
    struct FakeRepo {
        log: Log,
        rows: Arc<Mutex<Vec<StoredMessage>>>,
        fail_insert: Option<MessageRole>,
        fail_select: bool,
    }

    impl MessageRepository for FakeRepo {
        async fn insert(&self, message: &NewMessage) -> Result<(), RepositoryError> {
            self.log
                .push(Call::Insert(message.role, message.content.clone()));
            if self.fail_insert == Some(message.role) {
                return Err(RepositoryError::Query("disk full".to_string()));
            }
            let mut rows = self.rows.lock().unwrap();
            let seq = rows.len() as i64 + 1;
            rows.push(StoredMessage {
                seq,
                id: message.id,
                owner: message.owner.clone(),
                role: message.role,
                content: message.content.clone(),
                created_at: message.created_at,
            });
            Ok(())
        }

        async fn select_all(&self, owner: &UserId) -> Result<Vec<StoredMessage>, RepositoryError> {
            self.log.push(Call::Select);
            if self.fail_select {
                return Err(RepositoryError::Connection);
            }
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| &r.owner == owner)
                .cloned()
                .collect())
        }
    }

    struct FakeProvider {
        log: Log,
        reply: Result<String, CompletionError>,
        requests: Arc<Mutex<Vec<CompletionRequest>>>,
        busy_watch: Arc<Mutex<Option<watch::Receiver<bool>>>>,
        busy_seen: Arc<Mutex<Vec<bool>>>,
    }

    impl FakeProvider {
        fn replying(log: &Log, reply: Result<String, CompletionError>) -> Self {
            Self {
                log: log.clone(),
                reply,
                requests: Arc::default(),
                busy_watch: Arc::default(),
                busy_seen: Arc::default(),
            }
        }
    }

    impl CompletionProvider for FakeProvider {
        fn name(&self) -> &str {
            "fake"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionReply, CompletionError> {
            self.log.push(Call::Complete(request.messages.len()));
            self.requests.lock().unwrap().push(request.clone());
            if let Some(rx) = self.busy_watch.lock().unwrap().as_ref() {
                self.busy_seen.lock().unwrap().push(*rx.borrow());
            }
            self.reply.clone().map(|content| CompletionReply {
                content,
                model: "fake-1".to_string(),
                usage: None,
            })
        }
    }

    struct RecordingNotifier(Log);

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: Notification) {
            self.0.push(Call::Notify(notification.message));
        }
    }

    type Orchestrator = ConversationOrchestrator<FakeRepo, FakeProvider, RecordingNotifier>;

    struct Harness {
        log: Log,
        rows: Arc<Mutex<Vec<StoredMessage>>>,
        requests: Arc<Mutex<Vec<CompletionRequest>>>,
        session_tx: watch::Sender<Option<Session>>,
        orchestrator: Orchestrator,
    }

    fn harness_with(repo: FakeRepo, reply: Result<String, CompletionError>) -> Harness {
        let log = repo.log.clone();
        let rows = Arc::clone(&repo.rows);
        let provider = FakeProvider::replying(&log, reply);
        let requests = Arc::clone(&provider.requests);
        let (session_tx, session_rx) = watch::channel(None);
        let orchestrator =
            ConversationOrchestrator::new(repo, provider, RecordingNotifier(log.clone()), session_rx);
        Harness {
            log,
            rows,
            requests,
            session_tx,
            orchestrator,
        }
    }

    fn harness(reply: Result<String, CompletionError>) -> Harness {
        harness_with(FakeRepo::default(), reply)
    }

    fn session_for(user: &str) -> Session {
        Session::issue(UserId::new(user).unwrap(), format!("{user}@example.fr"), Duration::hours(1))
    }

    fn roles(messages: &[Message]) -> Vec<MessageRole> {
        messages.iter().map(|m| m.role).collect()
    }

    #[tokio::test]
    async fn user_write_precedes_completion() {
        let mut h = harness(Ok("Salut !".to_string()));
        let session = session_for("ana");

        h.orchestrator.send_turn("Bonjour", Some(&session)).await;

        let calls = h.log.calls();
        let user_writes: Vec<_> = calls
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, Call::Insert(MessageRole::User, _)))
            .collect();
        assert_eq!(user_writes.len(), 1);
        let complete_at = calls
            .iter()
            .position(|c| matches!(c, Call::Complete(_)))
            .unwrap();
        assert!(user_writes[0].0 < complete_at);
    }

    #[tokio::test]
    async fn successful_turn_writes_and_appends_user_then_assistant() {
        let mut h = harness(Ok("Salut ! Comment puis-je vous aider ?".to_string()));
        let session = session_for("ana");

        let outcome = h.orchestrator.send_turn("Bonjour", Some(&session)).await;

        assert_eq!(outcome, TurnOutcome::Completed);
        assert_eq!(
            h.log.calls(),
            vec![
                Call::Insert(MessageRole::User, "Bonjour".to_string()),
                Call::Complete(1),
                Call::Insert(
                    MessageRole::Assistant,
                    "Salut ! Comment puis-je vous aider ?".to_string()
                ),
            ]
        );

        let transcript = h.orchestrator.transcript();
        assert_eq!(roles(transcript), [MessageRole::User, MessageRole::Assistant]);
        assert_eq!(transcript[0].content, "Bonjour");
        assert_eq!(transcript[1].content, "Salut ! Comment puis-je vous aider ?");
        assert!(h.log.notifications().is_empty());
    }

    #[tokio::test]
    async fn payload_is_prior_transcript_plus_new_turn() {
        let mut h = harness(Ok("ok".to_string()));
        let session = session_for("ana");

        h.orchestrator.send_turn("un", Some(&session)).await;
        h.orchestrator.send_turn("deux", Some(&session)).await;
        h.orchestrator.send_turn("trois", Some(&session)).await;

        let requests = h.requests.lock().unwrap();
        let lengths: Vec<_> = requests.iter().map(|r| r.messages.len()).collect();
        assert_eq!(lengths, [1, 3, 5]);

        let last = &requests[2].messages;
        assert_eq!(last.last().unwrap().content, "trois");
        assert_eq!(last.last().unwrap().role, CompletionRole::User);
        assert!(last.iter().all(|t| t.role != CompletionRole::System));
    }

    #[tokio::test]
    async fn no_session_is_a_noop() {
        let mut h = harness(Ok("ok".to_string()));

        let outcome = h.orchestrator.send_turn("hi", None).await;

        assert_eq!(outcome, TurnOutcome::Skipped);
        assert!(h.orchestrator.transcript().is_empty());
        assert!(h.log.calls().is_empty());
    }

    #[tokio::test]
    async fn expired_session_is_a_noop() {
        let mut h = harness(Ok("ok".to_string()));
        let mut session = session_for("ana");
        session.expires_at = session.issued_at;

        let outcome = h.orchestrator.send_turn("hi", Some(&session)).await;

        assert_eq!(outcome, TurnOutcome::Skipped);
        assert!(h.log.calls().is_empty());
    }

    #[tokio::test]
    async fn user_write_failure_stops_before_completion() {
        let repo = FakeRepo {
            fail_insert: Some(MessageRole::User),
            ..FakeRepo::default()
        };
        let mut h = harness_with(repo, Ok("never".to_string()));
        let session = session_for("ana");

        let outcome = h.orchestrator.send_turn("Bonjour", Some(&session)).await;

        assert_eq!(outcome, TurnOutcome::Failed(ChatErrorKind::Persistence));
        assert!(h.orchestrator.transcript().is_empty());
        assert!(!h.log.calls().iter().any(|c| matches!(c, Call::Complete(_))));
        assert_eq!(
            h.log.notifications(),
            [ChatError::write(RepositoryError::Connection).user_message()]
        );
    }

    #[tokio::test]
    async fn rate_limited_keeps_optimistic_user_message() {
        let mut h = harness(Err(CompletionError::RateLimited));
        let session = session_for("ana");

        let outcome = h.orchestrator.send_turn("Bonjour", Some(&session)).await;

        assert_eq!(outcome, TurnOutcome::Failed(ChatErrorKind::Completion));
        assert_eq!(roles(h.orchestrator.transcript()), [MessageRole::User]);

        let stored = h.rows.lock().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].role, MessageRole::User);

        let notes = h.log.notifications();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].contains("temporarily unavailable"));
    }

    #[tokio::test]
    async fn missing_credential_is_reported_once() {
        let mut h = harness(Err(CompletionError::MissingCredential));
        let session = session_for("ana");

        h.orchestrator.send_turn("Bonjour", Some(&session)).await;

        assert_eq!(
            h.log.notifications(),
            [CompletionError::MissingCredential.to_string()]
        );
    }

    #[tokio::test]
    async fn assistant_write_failure_leaves_user_message_only() {
        let repo = FakeRepo {
            fail_insert: Some(MessageRole::Assistant),
            ..FakeRepo::default()
        };
        let mut h = harness_with(repo, Ok("Salut".to_string()));
        let session = session_for("ana");

        let outcome = h.orchestrator.send_turn("Bonjour", Some(&session)).await;

        assert_eq!(outcome, TurnOutcome::Failed(ChatErrorKind::Persistence));
        assert_eq!(roles(h.orchestrator.transcript()), [MessageRole::User]);
        assert_eq!(h.log.notifications().len(), 1);
    }

    #[tokio::test]
    async fn busy_flag_set_during_turn_and_cleared_after() {
        for reply in [Ok("ok".to_string()), Err(CompletionError::Unknown("500".to_string()))] {
            let mut h = harness(reply);
            let watch_slot = Arc::clone(&h.orchestrator.provider.busy_watch);
            let seen = Arc::clone(&h.orchestrator.provider.busy_seen);
            *watch_slot.lock().unwrap() = Some(h.orchestrator.busy());
            let session = session_for("ana");

            assert!(!h.orchestrator.is_busy());
            h.orchestrator.send_turn("Bonjour", Some(&session)).await;

            assert_eq!(*seen.lock().unwrap(), [true]);
            assert!(!h.orchestrator.is_busy());
        }
    }

    #[tokio::test]
    async fn busy_flag_clears_after_write_failure() {
        let repo = FakeRepo {
            fail_insert: Some(MessageRole::User),
            ..FakeRepo::default()
        };
        let mut h = harness_with(repo, Ok("ok".to_string()));
        let mut busy = h.orchestrator.busy();
        let session = session_for("ana");

        h.orchestrator.send_turn("Bonjour", Some(&session)).await;

        assert!(!*busy.borrow_and_update());
    }

    #[tokio::test]
    async fn load_empty_history_yields_empty_transcript() {
        let mut h = harness(Ok("ok".to_string()));

        let count = h
            .orchestrator
            .load_transcript(&UserId::new("ana").unwrap())
            .await
            .unwrap();

        assert_eq!(count, 0);
        assert!(h.orchestrator.transcript().is_empty());
        assert!(h.log.notifications().is_empty());
    }

    #[tokio::test]
    async fn load_failure_leaves_transcript_and_notifies() {
        let repo = FakeRepo::default();
        let rows = Arc::clone(&repo.rows);
        let mut h = harness_with(repo, Ok("ok".to_string()));
        let session = session_for("ana");
        h.orchestrator.send_turn("Bonjour", Some(&session)).await;
        assert_eq!(h.orchestrator.transcript().len(), 2);

        let failing = FakeRepo {
            log: h.log.clone(),
            rows,
            fail_select: true,
            ..FakeRepo::default()
        };
        h.orchestrator.repo = failing;

        let result = h.orchestrator.load_transcript(&session.user_id).await;

        assert!(matches!(result, Err(ChatError::Persistence { .. })));
        assert_eq!(h.orchestrator.transcript().len(), 2);
        assert_eq!(
            h.log.notifications(),
            [ChatError::load(RepositoryError::Connection).user_message()]
        );
    }

    #[tokio::test]
    async fn reload_keeps_ids_and_order() {
        let mut h = harness(Ok("Salut".to_string()));
        let session = session_for("ana");
        h.orchestrator.send_turn("Bonjour", Some(&session)).await;
        h.orchestrator.send_turn("Ça va ?", Some(&session)).await;
        let live: Vec<_> = h.orchestrator.transcript().to_vec();

        h.orchestrator.load_transcript(&session.user_id).await.unwrap();

        assert_eq!(h.orchestrator.transcript(), live.as_slice());
        assert!(
            h.orchestrator
                .transcript()
                .iter()
                .all(|m| matches!(m.role, MessageRole::User | MessageRole::Assistant))
        );
    }

    #[tokio::test]
    async fn load_is_scoped_to_owner() {
        let mut h = harness(Ok("Salut".to_string()));
        h.orchestrator.send_turn("de ana", Some(&session_for("ana"))).await;
        h.orchestrator.send_turn("de bob", Some(&session_for("bob"))).await;

        h.orchestrator
            .load_transcript(&UserId::new("bob").unwrap())
            .await
            .unwrap();

        assert_eq!(h.orchestrator.transcript().len(), 2);
        assert_eq!(h.orchestrator.transcript()[0].content, "de bob");
    }

    #[tokio::test]
    async fn context_policy_trims_payload() {
        let mut h = harness(Ok("ok".to_string()));
        h.orchestrator = h.orchestrator.with_policy(Box::new(RecentTurns::new(2)));
        let session = session_for("ana");

        for text in ["un", "deux", "trois"] {
            h.orchestrator.send_turn(text, Some(&session)).await;
        }

        let requests = h.requests.lock().unwrap();
        let last = &requests[2].messages;
        assert_eq!(last.len(), 2);
        assert_eq!(last[1].content, "trois");
        assert_eq!(h.orchestrator.transcript().len(), 6);
    }

    #[tokio::test]
    async fn model_override_is_forwarded() {
        let mut h = harness(Ok("ok".to_string()));
        h.orchestrator = h.orchestrator.with_model("gpt-4o-mini");
        h.orchestrator.send_turn("Bonjour", Some(&session_for("ana"))).await;
        assert_eq!(h.requests.lock().unwrap()[0].model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn sign_in_loads_history_and_sign_out_clears() {
        let mut h = harness(Ok("Salut".to_string()));
        let session = session_for("ana");
        h.orchestrator.send_turn("Bonjour", Some(&session)).await;
        h.orchestrator = {
            let repo = h.orchestrator.repo.clone();
            let provider = FakeProvider::replying(&h.log, Ok("ok".to_string()));
            ConversationOrchestrator::new(
                repo,
                provider,
                RecordingNotifier(h.log.clone()),
                h.session_tx.subscribe(),
            )
        };
        assert!(h.orchestrator.transcript().is_empty());

        h.session_tx.send_replace(Some(session.clone()));
        assert_eq!(h.orchestrator.sync_session().await, SessionChange::SignedIn);
        assert_eq!(h.orchestrator.transcript().len(), 2);
        assert_eq!(h.orchestrator.active_user(), Some(&session.user_id));

        h.session_tx.send_replace(None);
        assert_eq!(h.orchestrator.sync_session().await, SessionChange::SignedOut);
        assert!(h.orchestrator.transcript().is_empty());
        assert!(h.orchestrator.active_user().is_none());
    }

    #[tokio::test]
    async fn sign_in_with_failing_reload_stays_empty_and_notifies() {
        let repo = FakeRepo {
            fail_select: true,
            ..FakeRepo::default()
        };
        let mut h = harness_with(repo, Ok("ok".to_string()));
        let session = session_for("ana");

        h.session_tx.send_replace(Some(session.clone()));
        assert_eq!(h.orchestrator.sync_session().await, SessionChange::SignedIn);

        assert!(h.orchestrator.transcript().is_empty());
        assert_eq!(h.orchestrator.active_user(), Some(&session.user_id));
        assert_eq!(h.log.calls().iter().filter(|c| **c == Call::Select).count(), 1);
        assert_eq!(
            h.log.notifications(),
            [ChatError::load(RepositoryError::Connection).user_message()]
        );
    }

    #[tokio::test]
    async fn raw_text_is_stored_and_sent_unchanged() {
        let mut h = harness(Ok("ok".to_string()));
        let raw = "    let x = 1;\n";

        h.orchestrator.send_turn(raw, Some(&session_for("ana"))).await;

        assert_eq!(h.orchestrator.transcript()[0].content, raw);
        assert_eq!(h.rows.lock().unwrap()[0].content, raw);
        assert_eq!(h.requests.lock().unwrap()[0].messages[0].content, raw);
    }

    #[tokio::test]
    async fn token_refresh_does_not_reload() {
        let mut h = harness(Ok("ok".to_string()));
        let session = session_for("ana");
        h.session_tx.send_replace(Some(session.clone()));
        h.orchestrator.sync_session().await;
        let selects_before = h.log.calls().iter().filter(|c| **c == Call::Select).count();

        let refreshed = Session::issue(session.user_id.clone(), session.email.clone(), Duration::hours(2));
        h.session_tx.send_replace(Some(refreshed));

        assert_eq!(
            h.orchestrator.next_session_change().await,
            Some(SessionChange::Unchanged)
        );
        let selects_after = h.log.calls().iter().filter(|c| **c == Call::Select).count();
        assert_eq!(selects_before, selects_after);
    }

    #[tokio::test]
    async fn switching_user_replaces_transcript() {
        let mut h = harness(Ok("ok".to_string()));
        let ana = session_for("ana");
        h.session_tx.send_replace(Some(ana.clone()));
        h.orchestrator.sync_session().await;
        h.orchestrator.send_turn("de ana", Some(&ana)).await;

        let bob = session_for("bob");
        h.session_tx.send_replace(Some(bob.clone()));
        assert_eq!(h.orchestrator.sync_session().await, SessionChange::SignedIn);
        assert!(h.orchestrator.transcript().is_empty());
        assert_eq!(h.orchestrator.active_user(), Some(&bob.user_id));
    }

    #[tokio::test]
    async fn next_session_change_ends_when_store_dropped() {
        let mut h = harness(Ok("ok".to_string()));
        drop(h.session_tx);
        assert_eq!(h.orchestrator.next_session_change().await, None);
    }

    #[tokio::test]
    async fn dropping_orchestrator_releases_subscription() {
        let h = harness(Ok("ok".to_string()));
        assert_eq!(h.session_tx.receiver_count(), 1);
        drop(h.orchestrator);
        assert_eq!(h.session_tx.receiver_count(), 0);
    }
}
