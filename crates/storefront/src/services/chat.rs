//! Simulated live-support chat.
//!
//! Each session keeps an append-only message log. Every non-blank user
//! message is appended immediately and schedules one canned support reply
//! after a random delay. Replies are independent tokio tasks, so several can
//! be pending at once and may land in any order relative to each other.
//!
//! Pending replies are owned by their session: closing or dropping the
//! session aborts them, so nothing is ever appended to a torn-down log.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, instrument};

use delta_gear_core::{ChatMessage, ChatMessageId, ChatSender, ChatSessionId};

/// First message of every session.
pub const GREETING: &str = "Hello! 👋 Welcome to Delta Gear support. How can I help you today?";

/// Replies the support "agent" picks from.
pub const CANNED_RESPONSES: [&str; 7] = [
    "Thanks for your question! Let me help you with that. 😊",
    "That's a great question about our gaming devices! Here's what I can tell you...",
    "I'd be happy to help you find the perfect gaming setup for your needs!",
    "Our tech team has provided detailed specifications for that model. Let me share them with you!",
    "We offer free worldwide shipping and a 30-day return policy on all our products!",
    "Our gaming laptops feature desktop-class GPUs for the ultimate performance!",
    "Would you like me to connect you with our technical specialists for detailed specs?",
];

/// Capacity of each session's event channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Errors from chat operations.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// The session has been closed.
    #[error("chat session is closed")]
    SessionClosed,
}

/// Chat timing and content.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    /// Shortest reply delay (inclusive).
    pub reply_delay_min: Duration,
    /// Longest reply delay (exclusive).
    pub reply_delay_max: Duration,
    /// Opening support message.
    pub greeting: String,
    /// Reply pool.
    pub responses: Vec<String>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            reply_delay_min: Duration::from_millis(1000),
            reply_delay_max: Duration::from_millis(3000),
            greeting: GREETING.to_string(),
            responses: CANNED_RESPONSES.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Seedable source for reply delays and reply text.
#[derive(Debug)]
pub struct ReplyPicker {
    rng: StdRng,
}

impl ReplyPicker {
    /// Picker seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic picker for tests and reproducible demos.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw a delay uniformly from `[min, max)`.
    ///
    /// Returns `min` when the range is empty.
    pub fn delay(&mut self, min: Duration, max: Duration) -> Duration {
        if max <= min {
            return min;
        }
        let nanos = self.rng.random_range(min.as_nanos()..max.as_nanos());
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    /// Pick one reply uniformly, or `None` if the pool is empty.
    pub fn reply<'a>(&mut self, responses: &'a [String]) -> Option<&'a str> {
        responses.choose(&mut self.rng).map(String::as_str)
    }
}

/// Whether a session is waiting on a support reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatState {
    Idle,
    AwaitingReply,
}

/// Change notifications for subscribers of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A message was appended to the log.
    MessageAppended { message: ChatMessage },
    /// The support typing indicator turned on or off.
    TypingChanged { typing: bool },
}

struct SessionState {
    messages: Vec<ChatMessage>,
    next_message_id: ChatMessageId,
    next_reply_key: u64,
    pending_replies: HashMap<u64, JoinHandle<()>>,
    last_activity: Instant,
    closed: bool,
}

impl SessionState {
    fn append(&mut self, text: &str, sender: ChatSender) -> ChatMessage {
        let message = ChatMessage::new(self.next_message_id, text, sender);
        self.next_message_id = self.next_message_id.next();
        self.messages.push(message.clone());
        message
    }

    fn state(&self) -> ChatState {
        if self.pending_replies.is_empty() {
            ChatState::Idle
        } else {
            ChatState::AwaitingReply
        }
    }
}

struct SessionShared {
    state: Mutex<SessionState>,
    events: broadcast::Sender<ChatEvent>,
}

impl SessionShared {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: ChatEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

/// One visitor's chat conversation.
pub struct ChatSession {
    id: ChatSessionId,
    shared: Arc<SessionShared>,
    settings: Arc<ChatSettings>,
    picker: Arc<Mutex<ReplyPicker>>,
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("id", &self.id)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl ChatSession {
    fn open(settings: Arc<ChatSettings>, picker: Arc<Mutex<ReplyPicker>>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let mut state = SessionState {
            messages: Vec::new(),
            next_message_id: ChatMessageId::FIRST,
            next_reply_key: 0,
            pending_replies: HashMap::new(),
            last_activity: Instant::now(),
            closed: false,
        };
        state.append(&settings.greeting, ChatSender::Support);

        Self {
            id: ChatSessionId::generate(),
            shared: Arc::new(SessionShared {
                state: Mutex::new(state),
                events,
            }),
            settings,
            picker,
        }
    }

    /// Session identifier.
    #[must_use]
    pub const fn id(&self) -> ChatSessionId {
        self.id
    }

    /// Snapshot of the message log in insertion order.
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.shared.lock().messages.clone()
    }

    /// Idle, or awaiting at least one reply.
    #[must_use]
    pub fn state(&self) -> ChatState {
        self.shared.lock().state()
    }

    /// Number of replies scheduled but not yet delivered.
    #[must_use]
    pub fn pending_replies(&self) -> usize {
        self.shared.lock().pending_replies.len()
    }

    /// Whether the session has been torn down.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.shared.lock().closed
    }

    /// Subscribe to appended messages and typing changes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.shared.events.subscribe()
    }

    /// Send a visitor message and schedule a support reply.
    ///
    /// Blank input (after trimming) is ignored and returns `Ok(None)`.
    /// Otherwise the message is appended as sent and returned.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::SessionClosed`] if the session was torn down.
    #[instrument(skip(self, text), fields(session_id = %self.id))]
    pub fn send(&self, text: &str) -> Result<Option<ChatMessage>, ChatError> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let (delay, reply) = {
            let mut picker = self.picker.lock().unwrap_or_else(PoisonError::into_inner);
            let delay = picker.delay(self.settings.reply_delay_min, self.settings.reply_delay_max);
            let reply = picker
                .reply(&self.settings.responses)
                .map(str::to_owned);
            (delay, reply)
        };

        let mut state = self.shared.lock();
        if state.closed {
            return Err(ChatError::SessionClosed);
        }

        let message = state.append(text, ChatSender::User);
        state.last_activity = Instant::now();
        self.shared.emit(ChatEvent::MessageAppended {
            message: message.clone(),
        });

        if let Some(reply) = reply {
            let was_idle = state.pending_replies.is_empty();
            let key = state.next_reply_key;
            state.next_reply_key += 1;
            let handle = tokio::spawn(deliver_reply(
                Arc::downgrade(&self.shared),
                key,
                delay,
                reply,
            ));
            state.pending_replies.insert(key, handle);
            if was_idle {
                self.shared.emit(ChatEvent::TypingChanged { typing: true });
            }
            debug!(delay_ms = delay.as_millis(), "Support reply scheduled");
        }

        drop(state);
        Ok(Some(message))
    }

    /// Whether the session has had no activity for `ttl` and no reply is pending.
    #[must_use]
    pub fn is_idle_for(&self, ttl: Duration) -> bool {
        let state = self.shared.lock();
        state.pending_replies.is_empty() && state.last_activity.elapsed() >= ttl
    }

    /// Tear the session down, cancelling every pending reply.
    ///
    /// Closing twice is a no-op.
    pub fn close(&self) {
        let mut state = self.shared.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        let cancelled = state.pending_replies.len();
        for (_, handle) in state.pending_replies.drain() {
            handle.abort();
        }
        drop(state);
        info!(session_id = %self.id, cancelled, "Chat session closed");
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Wait out the delay, then append the reply unless the session is gone.
async fn deliver_reply(shared: Weak<SessionShared>, key: u64, delay: Duration, reply: String) {
    tokio::time::sleep(delay).await;

    let Some(shared) = shared.upgrade() else {
        return;
    };
    let mut state = shared.lock();
    if state.closed || state.pending_replies.remove(&key).is_none() {
        return;
    }

    let message = state.append(&reply, ChatSender::Support);
    state.last_activity = Instant::now();

    // Emit under the lock so events keep log order
    shared.emit(ChatEvent::MessageAppended { message });
    if state.pending_replies.is_empty() {
        shared.emit(ChatEvent::TypingChanged { typing: false });
    }
    drop(state);
}

/// Live chat sessions keyed by id.
pub struct ChatRegistry {
    settings: Arc<ChatSettings>,
    picker: Arc<Mutex<ReplyPicker>>,
    sessions: RwLock<HashMap<ChatSessionId, Arc<ChatSession>>>,
}

impl ChatRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new(settings: ChatSettings, picker: ReplyPicker) -> Self {
        Self {
            settings: Arc::new(settings),
            picker: Arc::new(Mutex::new(picker)),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Open a new session with the greeting already in its log.
    pub fn open(&self) -> Arc<ChatSession> {
        let session = Arc::new(ChatSession::open(
            Arc::clone(&self.settings),
            Arc::clone(&self.picker),
        ));
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.id(), Arc::clone(&session));
        info!(session_id = %session.id(), "Chat session opened");
        session
    }

    /// Look up a live session.
    #[must_use]
    pub fn get(&self, id: ChatSessionId) -> Option<Arc<ChatSession>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Remove and tear down a session. Returns `false` if it was unknown.
    pub fn close(&self, id: ChatSessionId) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        removed.is_some_and(|session| {
            session.close();
            true
        })
    }

    /// Close and forget every session idle for at least `ttl`.
    ///
    /// Returns the number of sessions removed.
    pub fn sweep_idle(&self, ttl: Duration) -> usize {
        if self.is_empty() {
            return 0;
        }

        let expired: Vec<Arc<ChatSession>> = {
            let mut sessions = self
                .sessions
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let ids: Vec<ChatSessionId> = sessions
                .iter()
                .filter(|(_, session)| session.is_idle_for(ttl))
                .map(|(id, _)| *id)
                .collect();
            ids.iter().filter_map(|id| sessions.remove(id)).collect()
        };

        for session in &expired {
            session.close();
        }
        if !expired.is_empty() {
            info!(removed = expired.len(), remaining = self.len(), "Idle chat sessions swept");
        }
        expired.len()
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no sessions are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
