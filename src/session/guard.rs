use std::{
    sync::{
        Arc, Mutex, Weak,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use garde::Validate;
use tokio::{sync::watch, task::JoinHandle};

use super::{
    AuthError, AuthTransport,
    clock::{Clock, SystemClock},
    notify::{ExpiryNotifier, LogNotifier},
    store::TokenStore,
    token::{Claims, decode_claims},
};
use crate::{
    error::AppError,
    models::admin::{AdminProfile, LoginRequest, RegisterRequest},
    validation::auth::{report_message, validate_login, validate_password_strength, validate_register},
};

/// How far ahead [`SessionGuard::will_expire_soon`] looks by default.
pub const EXPIRY_WARNING_WINDOW: Duration = Duration::from_secs(5 * 60);

/// What the rest of the application sees of the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated {
        claims: Claims,
        /// Known after a login in this process; absent when the session was
        /// restored from storage.
        admin: Option<AdminProfile>,
    },
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated { .. })
    }
}

/// A successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub claims: Claims,
    pub admin: AdminProfile,
}

struct ArmedTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

struct Inner {
    store: Arc<dyn TokenStore>,
    transport: Arc<dyn AuthTransport>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn ExpiryNotifier>,
    state: watch::Sender<AuthState>,
    timer: Mutex<Option<ArmedTimer>>,
    /// Bumped on every arm, logout and expiry. A timer only acts if the
    /// generation it was armed with is still current.
    generation: AtomicU64,
}

impl Inner {
    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn cancel_timer(&self) {
        if let Ok(mut slot) = self.timer.lock() {
            if let Some(armed) = slot.take() {
                armed.handle.abort();
                tracing::debug!("⏹️ Cancelled expiry timer (generation {})", armed.generation);
            }
        }
    }

    fn install_timer(&self, generation: u64, handle: JoinHandle<()>) {
        if let Ok(mut slot) = self.timer.lock() {
            // A later arm or logout already ran; this timer is dead on arrival.
            if self.generation.load(Ordering::SeqCst) != generation {
                handle.abort();
                return;
            }
            if let Some(previous) = slot.replace(ArmedTimer { generation, handle }) {
                previous.handle.abort();
            }
        }
    }

    fn set_unauthenticated(&self) {
        self.state.send_if_modified(|state| {
            if state.is_authenticated() {
                *state = AuthState::Unauthenticated;
                true
            } else {
                false
            }
        });
    }

    /// Tears the session down: no timer, no token, logged out.
    fn end_session(&self) {
        self.next_generation();
        self.cancel_timer();
        self.store.clear();
        self.set_unauthenticated();
    }

    /// Ends the session only if `token` is still the stored one. A token
    /// saved in the meantime belongs to a newer login and is left alone.
    fn discard(&self, token: &str) {
        if !self.store.clear_if_current(token) {
            tracing::debug!("⏭️ Stored token changed, keeping the newer session");
            return;
        }
        self.next_generation();
        self.cancel_timer();
        self.set_unauthenticated();
    }

    fn fire(&self, generation: u64) {
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("⏭️ Ignoring superseded expiry timer (generation {})", generation);
            return;
        }
        self.next_generation();

        // The running task owns this handle; drop it without aborting.
        if let Ok(mut slot) = self.timer.lock() {
            slot.take();
        }

        tracing::info!("⏰ Session expired, logging out");
        self.notifier.session_expired();
        self.store.clear();
        self.set_unauthenticated();
    }
}

/// Owns the admin token's lifecycle on the client.
///
/// Answers "is the caller authenticated" from the stored token alone, and
/// ends the session by itself when the token's validity window elapses.
/// Cloning yields another handle to the same session.
///
/// Arming the expiry timer spawns onto the current tokio runtime.
#[derive(Clone)]
pub struct SessionGuard {
    inner: Arc<Inner>,
}

/// Builds a [`SessionGuard`] with optional clock and notifier overrides.
pub struct SessionGuardBuilder {
    store: Arc<dyn TokenStore>,
    transport: Arc<dyn AuthTransport>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn ExpiryNotifier>,
}

impl SessionGuardBuilder {
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn ExpiryNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn build(self) -> SessionGuard {
        let (state, _) = watch::channel(AuthState::Unauthenticated);
        SessionGuard {
            inner: Arc::new(Inner {
                store: self.store,
                transport: self.transport,
                clock: self.clock,
                notifier: self.notifier,
                state,
                timer: Mutex::new(None),
                generation: AtomicU64::new(0),
            }),
        }
    }
}

impl SessionGuard {
    /// A guard on the system clock that reports expiry through the log.
    pub fn new(store: Arc<dyn TokenStore>, transport: Arc<dyn AuthTransport>) -> Self {
        Self::builder(store, transport).build()
    }

    pub fn builder(
        store: Arc<dyn TokenStore>,
        transport: Arc<dyn AuthTransport>,
    ) -> SessionGuardBuilder {
        SessionGuardBuilder {
            store,
            transport,
            clock: Arc::new(SystemClock),
            notifier: Arc::new(LogNotifier),
        }
    }

    /// Restores the session from storage at start-up.
    ///
    /// A live stored token puts the guard in `Authenticated` and arms the
    /// expiry timer; anything else leaves it logged out.
    pub fn init(&self) -> AuthState {
        if self.is_authenticated() {
            if let Some(claims) = self.subject_info() {
                tracing::info!("🔓 Restored session for admin {}", claims.id);
                self.inner
                    .state
                    .send_replace(AuthState::Authenticated { claims, admin: None });
                self.arm_auto_logout();
            }
        } else {
            self.inner.set_unauthenticated();
            tracing::debug!("🔒 No live session in storage");
        }
        self.state()
    }

    /// Whether a syntactically valid, unexpired token is stored.
    ///
    /// Fails closed. Discovering an expired or unreadable token deletes it
    /// and logs the session out, so this read can mutate state. A token
    /// replaced by a concurrent login in the meantime is kept.
    pub fn is_authenticated(&self) -> bool {
        let Some(token) = self.inner.store.load() else {
            return false;
        };

        match decode_claims(&token) {
            Ok(claims) if claims.is_live_at(self.inner.clock.now_millis()) => true,
            Ok(claims) => {
                tracing::info!("⌛ Stored token for admin {} has expired", claims.id);
                self.inner.discard(&token);
                false
            }
            Err(e) => {
                tracing::debug!("🗑️ Discarding unreadable token: {}", e);
                self.inner.discard(&token);
                false
            }
        }
    }

    /// The claims of the stored token, without judging expiry.
    pub fn subject_info(&self) -> Option<Claims> {
        let token = self.inner.store.load()?;
        decode_claims(&token).ok()
    }

    /// True when there is no usable token or it expires within `window`.
    pub fn will_expire_soon(&self, window: Duration) -> bool {
        let Some(claims) = self.subject_info() else {
            return true;
        };
        let horizon = self
            .inner
            .clock
            .now_millis()
            .saturating_add(i64::try_from(window.as_millis()).unwrap_or(i64::MAX));
        !claims.is_live_at(horizon)
    }

    /// The stored token, for attaching to requests.
    pub fn token(&self) -> Option<String> {
        self.inner.store.load()
    }

    /// The current state.
    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    /// Watches state transitions.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    /// Schedules the automatic logout for the stored token's expiry.
    ///
    /// Any previously armed timer is cancelled first, so at most one logout
    /// is ever pending. An already expired token logs out immediately.
    pub fn arm_auto_logout(&self) {
        let generation = self.inner.next_generation();
        self.inner.cancel_timer();

        let Some(token) = self.inner.store.load() else {
            tracing::debug!("No token stored, auto logout not armed");
            return;
        };

        let claims = match decode_claims(&token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!("⚠️ Error setting up auto logout: {}", e);
                return;
            }
        };

        let delay_ms = claims
            .expires_at_millis()
            .saturating_sub(self.inner.clock.now_millis());
        if delay_ms <= 0 {
            tracing::info!("⌛ Token already expired, logging out now");
            self.inner.end_session();
            return;
        }

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms.unsigned_abs())).await;
            if let Some(inner) = weak.upgrade() {
                inner.fire(generation);
            }
        });
        self.inner.install_timer(generation, handle);

        tracing::info!(
            "⏲️ Auto logout armed for admin {} in {} ms",
            claims.id,
            delay_ms
        );
    }

    /// Ends the session. Idempotent.
    pub fn logout(&self) {
        self.inner.end_session();
        tracing::info!("👋 Logged out");
    }

    /// Stops the expiry timer without touching the stored token, for
    /// shutting the application down while keeping the session for the
    /// next start.
    pub fn teardown(&self) {
        self.inner.next_generation();
        self.inner.cancel_timer();
    }

    /// Exchanges credentials for a token, stores it and arms auto logout.
    ///
    /// On failure the stored token and the current state are left as they
    /// were.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<Session, AuthError> {
        local_check(validate_login(credentials))?;
        credentials
            .validate()
            .map_err(|report| AuthError::InvalidInput(report_message(&report)))?;

        tracing::info!("🔐 Login attempt for {}", credentials.email);

        let response = self
            .inner
            .transport
            .login(credentials)
            .await
            .map_err(|e| {
                tracing::warn!("❌ Login failed: {}", e);
                AuthError::from(e)
            })?;

        let claims = decode_claims(&response.token)?;
        if !claims.is_live_at(self.inner.clock.now_millis()) {
            return Err(AuthError::Rejected(
                "Server issued an already expired token".to_string(),
            ));
        }

        self.inner.store.save(&response.token)?;
        self.inner.state.send_replace(AuthState::Authenticated {
            claims: claims.clone(),
            admin: Some(response.admin.clone()),
        });
        self.arm_auto_logout();

        tracing::info!("✅ Admin logged in: {}", response.admin.id);

        Ok(Session {
            token: response.token,
            claims,
            admin: response.admin,
        })
    }

    /// Creates an admin account. Does not log in.
    ///
    /// The password must also pass [`validate_password_strength`]; only the
    /// first broken rule is reported.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AdminProfile, AuthError> {
        local_check(validate_register(request))?;
        if let Some(first) = validate_password_strength(&request.password).first() {
            return Err(AuthError::InvalidInput(first.to_string()));
        }
        request
            .validate()
            .map_err(|report| AuthError::InvalidInput(report_message(&report)))?;

        let response = self
            .inner
            .transport
            .register(request)
            .await
            .map_err(|e| {
                tracing::warn!("❌ Registration failed: {}", e);
                AuthError::from(e)
            })?;

        tracing::info!("✅ Admin registered: {}", response.admin.id);
        Ok(response.admin)
    }
}

/// Surfaces a shared validation failure as a form error.
fn local_check(result: crate::error::Result<()>) -> Result<(), AuthError> {
    result.map_err(|e| match e {
        AppError::Validation(message) => AuthError::InvalidInput(message),
        other => AuthError::InvalidInput(other.to_string()),
    })
}
