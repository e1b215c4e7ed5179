//! Core business logic for the authentication system.
//!
//! The [`SessionStore`] is the single owner of the current [`Session`]. It
//! restores a persisted session at boot, signs identities in and out through
//! the authentication backend, asks the [`RoleResolver`] for their role, and
//! publishes every settled state on a watch channel. Consumers never mutate
//! the session; they subscribe to it.
//!
//! Every operation draws a ticket in start order. A result only lands if no
//! later-started operation has landed before it; an operation that fails
//! lands nothing and supersedes nothing.

use std::{collections::BTreeSet, sync::Arc};

use adapters::{AuthBackend, AuthEvent, Identity, Role};
use parking_lot::Mutex;
use tokio::{
    sync::{broadcast::error::RecvError, watch, OnceCell},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use super::{errors::AuthError, models::Session, resolver::RoleResolver};

/// Reserved for the boot-time restore so anything started later outranks it.
const RESTORE_TICKET: u64 = 1;

#[derive(Debug)]
struct Tickets {
    next: u64,
    /// Ticket of the last result that landed; 0 until the first one does.
    committed: u64,
    in_flight: BTreeSet<u64>,
}

impl Tickets {
    fn new() -> Self {
        Self {
            next: RESTORE_TICKET + 1,
            committed: 0,
            in_flight: BTreeSet::new(),
        }
    }

    /// Whether the session is still unknown or an operation that can still
    /// land is running.
    fn loading(&self) -> bool {
        self.committed == 0 || self.in_flight.range(self.committed + 1..).next().is_some()
    }
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

struct Inner {
    backend: Arc<dyn AuthBackend>,
    resolver: RoleResolver,
    state: watch::Sender<Session>,
    tickets: Mutex<Tickets>,
    init: OnceCell<()>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn AuthBackend>, resolver: RoleResolver) -> Self {
        let (state, _) = watch::channel(Session::pending());
        Self {
            inner: Arc::new(Inner {
                backend,
                resolver,
                state,
                tickets: Mutex::new(Tickets::new()),
                init: OnceCell::new(),
            }),
        }
    }

    pub fn snapshot(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    /// Receives every settled transition.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    pub fn has_role(&self, required: Role) -> bool {
        self.inner.state.borrow().has_role(required)
    }

    /// Restores a persisted session. Concurrent and repeated calls share the
    /// single restoration.
    pub async fn initialize(&self) -> Session {
        self.inner.init.get_or_init(|| self.restore()).await;
        self.snapshot()
    }

    async fn restore(&self) {
        self.inner.tickets.lock().in_flight.insert(RESTORE_TICKET);
        let restored = match self.inner.backend.current_session().await {
            Ok(Some(identity)) => {
                let role = self.inner.resolver.resolve(&identity).await;
                info!(email = %identity.email, role = ?role, "Restored previous session");
                Session::signed_in(identity, role)
            }
            Ok(None) => {
                debug!("No previous session to restore");
                Session::signed_out()
            }
            Err(err) => {
                let err = AuthError::SessionRestoreFailed(err);
                warn!(error = %err, "Starting signed out");
                Session::signed_out()
            }
        };

        if !self.commit(RESTORE_TICKET, restored) {
            debug!("Session restore superseded by a newer operation");
            self.settle(RESTORE_TICKET);
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let ticket = self.begin();
        match self.inner.backend.sign_in(email, password).await {
            Ok(identity) => Ok(self.finish_sign_in(ticket, identity).await),
            Err(err) => Err(self.fail(ticket, err)),
        }
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let ticket = self.begin();
        match self.inner.backend.sign_up(email, password).await {
            Ok(identity) => Ok(self.finish_sign_in(ticket, identity).await),
            Err(err) => Err(self.fail(ticket, err)),
        }
    }

    /// Clears identity and role. Listeners are not notified when already
    /// signed out, but the backend is always told to drop its session.
    pub async fn sign_out(&self) {
        let settled_out = {
            let current = self.inner.state.borrow();
            current.identity().is_none() && !current.is_loading()
        };
        if settled_out {
            if let Err(err) = self.inner.backend.sign_out().await {
                warn!(error = %err, "Backend sign-out failed");
            }
            return;
        }

        let ticket = self.begin();
        if let Err(err) = self.inner.backend.sign_out().await {
            warn!(error = %err, "Backend sign-out failed, clearing local session anyway");
        }
        if self.commit(ticket, Session::signed_out()) {
            info!("Signed out");
        } else {
            self.settle(ticket);
        }
    }

    /// Applies sign-in/sign-out events that did not originate from this store,
    /// such as a session revoked elsewhere.
    pub fn watch_backend(&self) -> JoinHandle<()> {
        let store = self.clone();
        let mut events = self.inner.backend.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => store.apply_external(event).await,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Missed authentication events, re-reading session");
                        store.resync().await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    /// Re-reads the backend's session after an event that does not match the
    /// current state. What lands is what the backend holds now.
    async fn apply_external(&self, event: AuthEvent) {
        let current_id = self.inner.state.borrow().identity().map(|i| i.id);
        match &event {
            AuthEvent::SignedOut if current_id.is_none() => return,
            AuthEvent::SignedIn(identity) if current_id == Some(identity.id) => return,
            _ => {}
        }

        self.resync().await;
    }

    async fn resync(&self) {
        // Our own operations announce themselves; their outcome is settled by
        // the operation itself.
        let Some(ticket) = self.begin_if_idle() else {
            debug!("Ignoring authentication event during a session operation");
            return;
        };

        let next = match self.inner.backend.current_session().await {
            Ok(Some(identity)) => {
                let role = self.inner.resolver.resolve(&identity).await;
                Session::signed_in(identity, role)
            }
            Ok(None) => Session::signed_out(),
            Err(err) => {
                warn!(error = %err, "Failed to re-read session after backend event");
                self.settle(ticket);
                return;
            }
        };

        if self.commit(ticket, next) {
            info!("Session changed by the authentication backend");
        } else {
            self.settle(ticket);
        }
    }

    async fn finish_sign_in(&self, ticket: u64, identity: Identity) -> Session {
        let role = self.inner.resolver.resolve(&identity).await;
        let next = Session::signed_in(identity, role);
        if self.commit(ticket, next.clone()) {
            info!(
                email = %next.identity().map(|i| i.email.as_str()).unwrap_or_default(),
                role = ?role,
                "Signed in"
            );
            return next;
        }

        debug!("Sign-in superseded by a newer operation");
        // The backend opened a session the store will never show; drop it so
        // it cannot be restored or replayed later.
        if self.inner.state.borrow().identity().is_none() {
            if let Err(err) = self.inner.backend.sign_out().await {
                warn!(error = %err, "Failed to close superseded backend session");
            }
        }
        self.settle(ticket);
        self.snapshot()
    }

    fn fail(&self, ticket: u64, err: adapters::AdapterError) -> AuthError {
        self.settle(ticket);
        let err = AuthError::from(err);
        warn!(error = %err, "Authentication attempt failed");
        err
    }

    fn begin(&self) -> u64 {
        let mut tickets = self.inner.tickets.lock();
        let ticket = tickets.next;
        tickets.next += 1;
        tickets.in_flight.insert(ticket);
        self.publish_loading(true);
        ticket
    }

    /// Draws a ticket only when the session is known and nothing is running.
    fn begin_if_idle(&self) -> Option<u64> {
        let mut tickets = self.inner.tickets.lock();
        if tickets.committed == 0 || !tickets.in_flight.is_empty() {
            return None;
        }
        let ticket = tickets.next;
        tickets.next += 1;
        tickets.in_flight.insert(ticket);
        self.publish_loading(true);
        Some(ticket)
    }

    /// Lands `next` unless a later-started operation already landed. A
    /// rejected ticket stays in flight until [`Self::settle`].
    fn commit(&self, ticket: u64, mut next: Session) -> bool {
        let mut tickets = self.inner.tickets.lock();
        if ticket <= tickets.committed {
            return false;
        }
        tickets.in_flight.remove(&ticket);
        tickets.committed = ticket;
        next.set_loading(tickets.loading());
        self.inner.state.send_replace(next);
        true
    }

    /// Retires a ticket that landed nothing, keeping the current identity.
    fn settle(&self, ticket: u64) {
        let mut tickets = self.inner.tickets.lock();
        tickets.in_flight.remove(&ticket);
        self.publish_loading(tickets.loading());
    }

    fn publish_loading(&self, loading: bool) {
        self.inner.state.send_if_modified(|session| {
            if session.is_loading() == loading {
                return false;
            }
            session.set_loading(loading);
            true
        });
    }
}
