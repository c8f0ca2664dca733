use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use shop_admin::{
    client::ApiError,
    crypto::jwt::TokenIssuer,
    models::admin::{AdminProfile, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
    session::{
        AuthError, AuthState, AuthTransport, ExpiryNotifier, FileTokenStore, ManualClock,
        MemoryTokenStore, SessionGuard, StoreError, TokenStore,
    },
};
use uuid::Uuid;

const NOW: i64 = 1_700_000_000;
const SECRET: &[u8] = b"session-tests-secret-0123456789ab";

/// Counts how many times a session ended by expiry.
#[derive(Default)]
struct CountingNotifier(AtomicUsize);

impl CountingNotifier {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl ExpiryNotifier for CountingNotifier {
    fn session_expired(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

enum Reply {
    Token(String),
    Status(u16, &'static str),
    Unreachable,
}

/// Answers every login with the scripted reply.
struct ScriptedTransport {
    reply: Mutex<Reply>,
    admin: AdminProfile,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    fn new(reply: Reply) -> Self {
        Self {
            reply: Mutex::new(reply),
            admin: AdminProfile {
                id: Uuid::new_v4(),
                username: "owner".to_string(),
                email: "owner@shop.test".to_string(),
            },
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthTransport for ScriptedTransport {
    async fn login(&self, _credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &*self.reply.lock().unwrap() {
            Reply::Token(token) => Ok(LoginResponse {
                message: "Login successful".to_string(),
                token: token.clone(),
                admin: self.admin.clone(),
            }),
            Reply::Status(status, message) => Err(ApiError::Status {
                status: *status,
                message: message.to_string(),
            }),
            Reply::Unreachable => Err(ApiError::Network("connection refused".to_string())),
        }
    }

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RegisterResponse {
            message: "Admin registered successfully".to_string(),
            admin: AdminProfile {
                id: Uuid::new_v4(),
                username: request.username.clone(),
                email: request.email.clone(),
            },
        })
    }
}

/// A token issued at `NOW` that lives for `ttl_secs`.
fn token_valid_for(ttl_secs: i64) -> String {
    TokenIssuer::new(SECRET, ttl_secs)
        .issue_at(Uuid::new_v4(), NOW)
        .unwrap()
}

struct Harness {
    guard: SessionGuard,
    store: Arc<MemoryTokenStore>,
    transport: Arc<ScriptedTransport>,
    notifier: Arc<CountingNotifier>,
    clock: ManualClock,
}

fn harness(stored: Option<String>, reply: Reply) -> Harness {
    let store = Arc::new(match stored {
        Some(token) => MemoryTokenStore::with_token(token),
        None => MemoryTokenStore::new(),
    });
    let transport = Arc::new(ScriptedTransport::new(reply));
    let notifier = Arc::new(CountingNotifier::default());
    let clock = ManualClock::at_secs(NOW);

    let guard = SessionGuard::builder(store.clone(), transport.clone())
        .clock(Arc::new(clock.clone()))
        .notifier(notifier.clone())
        .build();

    Harness {
        guard,
        store,
        transport,
        notifier,
        clock,
    }
}

fn credentials() -> LoginRequest {
    LoginRequest {
        email: "owner@shop.test".to_string(),
        password: "CorrectHorse9".to_string(),
    }
}

/// Lets spawned timers that are due run to completion.
async fn settle() {
    for _ in 0..3 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn live_token_restores_session_and_expires_on_time() {
    let h = harness(Some(token_valid_for(3600)), Reply::Unreachable);

    let state = h.guard.init();
    assert!(state.is_authenticated());
    assert!(h.guard.is_authenticated());

    tokio::time::sleep(Duration::from_secs(3599)).await;
    settle().await;
    assert!(h.guard.state().is_authenticated());
    assert_eq!(h.notifier.count(), 0);

    tokio::time::sleep(Duration::from_secs(2)).await;
    settle().await;
    assert_eq!(h.guard.state(), AuthState::Unauthenticated);
    assert_eq!(h.notifier.count(), 1);
    assert!(h.store.load().is_none());
    assert!(!h.guard.is_authenticated());
}

#[tokio::test]
async fn expired_token_is_discarded_on_check() {
    let h = harness(Some(token_valid_for(3600)), Reply::Unreachable);
    h.clock.advance_secs(3600);

    assert!(!h.guard.is_authenticated());
    assert!(h.store.load().is_none());
}

#[tokio::test]
async fn token_is_live_until_the_exact_expiry_instant() {
    let h = harness(Some(token_valid_for(60)), Reply::Unreachable);

    h.clock.advance_secs(59);
    assert!(h.guard.is_authenticated());

    h.clock.advance_secs(1);
    assert!(!h.guard.is_authenticated());
}

#[tokio::test]
async fn unreadable_tokens_fail_closed() {
    for garbage in ["not-a-token", "a.b", "a.!!!.c", "a.e30.c"] {
        let h = harness(Some(garbage.to_string()), Reply::Unreachable);
        assert!(!h.guard.is_authenticated(), "{garbage} should not authenticate");
        assert!(h.store.load().is_none(), "{garbage} should have been removed");
        assert_eq!(h.guard.init(), AuthState::Unauthenticated);
    }
}

#[tokio::test(start_paused = true)]
async fn object_id_subject_is_a_live_session() {
    let payload = general_purpose::URL_SAFE_NO_PAD
        .encode(r#"{"id":"64b7f0c2e1a2b3c4d5e6f708","iat":1700000000,"exp":4102444800}"#);
    let token = format!("eyJhbGciOiJIUzI1NiJ9.{payload}.c2lnbmF0dXJl");
    let h = harness(Some(token), Reply::Unreachable);

    assert!(h.guard.is_authenticated());
    match h.guard.init() {
        AuthState::Authenticated { claims, .. } => {
            assert_eq!(claims.id, "64b7f0c2e1a2b3c4d5e6f708");
        }
        other => panic!("expected a restored session, got {other:?}"),
    }
    h.guard.teardown();
}

/// Hands out the stored token once, then behaves as if another login
/// replaced it before the caller acts on what it read.
struct ReplacedOnReadStore {
    inner: MemoryTokenStore,
    replacement: Mutex<Option<String>>,
}

impl TokenStore for ReplacedOnReadStore {
    fn load(&self) -> Option<String> {
        let current = self.inner.load();
        if let Some(next) = self.replacement.lock().unwrap().take() {
            self.inner.save(&next).unwrap();
        }
        current
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        self.inner.save(token)
    }

    fn clear(&self) {
        self.inner.clear();
    }

    fn clear_if_current(&self, expected: &str) -> bool {
        self.inner.clear_if_current(expected)
    }
}

#[tokio::test]
async fn expired_check_keeps_a_token_saved_by_a_newer_login() {
    let fresh = TokenIssuer::new(SECRET, 7200)
        .issue_at(Uuid::new_v4(), NOW + 3600)
        .unwrap();
    let store = Arc::new(ReplacedOnReadStore {
        inner: MemoryTokenStore::with_token(token_valid_for(60)),
        replacement: Mutex::new(Some(fresh.clone())),
    });
    let clock = ManualClock::at_secs(NOW);
    let guard = SessionGuard::builder(store.clone(), Arc::new(ScriptedTransport::new(Reply::Unreachable)))
        .clock(Arc::new(clock.clone()))
        .build();

    clock.advance_secs(3600);
    assert!(!guard.is_authenticated());
    assert_eq!(store.load().as_deref(), Some(fresh.as_str()));
    assert!(guard.is_authenticated());
}

#[tokio::test]
async fn missing_token_is_unauthenticated() {
    let h = harness(None, Reply::Unreachable);
    assert!(!h.guard.is_authenticated());
    assert_eq!(h.guard.init(), AuthState::Unauthenticated);
    assert!(h.guard.subject_info().is_none());
}

#[tokio::test(start_paused = true)]
async fn arming_twice_fires_once() {
    let h = harness(Some(token_valid_for(600)), Reply::Unreachable);

    h.guard.arm_auto_logout();
    h.guard.arm_auto_logout();
    h.guard.arm_auto_logout();

    tokio::time::sleep(Duration::from_secs(601)).await;
    settle().await;

    assert_eq!(h.notifier.count(), 1);
    assert!(h.store.load().is_none());
}

#[tokio::test(start_paused = true)]
async fn logout_cancels_pending_timer_and_is_idempotent() {
    let h = harness(Some(token_valid_for(600)), Reply::Unreachable);
    assert!(h.guard.init().is_authenticated());

    h.guard.logout();
    h.guard.logout();
    assert_eq!(h.guard.state(), AuthState::Unauthenticated);
    assert!(h.store.load().is_none());

    tokio::time::sleep(Duration::from_secs(700)).await;
    settle().await;
    assert_eq!(h.notifier.count(), 0);
}

#[tokio::test(start_paused = true)]
async fn arming_with_an_expired_token_logs_out_immediately() {
    let h = harness(Some(token_valid_for(60)), Reply::Unreachable);
    assert!(h.guard.init().is_authenticated());

    h.clock.advance_secs(120);
    h.guard.arm_auto_logout();

    assert_eq!(h.guard.state(), AuthState::Unauthenticated);
    assert!(h.store.load().is_none());
}

#[tokio::test(start_paused = true)]
async fn arming_without_a_token_does_nothing() {
    let h = harness(None, Reply::Unreachable);
    h.guard.arm_auto_logout();

    tokio::time::sleep(Duration::from_secs(3600 * 24)).await;
    settle().await;
    assert_eq!(h.notifier.count(), 0);
}

#[tokio::test(start_paused = true)]
async fn successful_login_stores_token_and_arms_expiry() {
    let token = token_valid_for(3600);
    let h = harness(None, Reply::Token(token.clone()));
    let mut states = h.guard.subscribe();

    let session = h.guard.login(&credentials()).await.unwrap();
    assert_eq!(session.token, token);
    assert_eq!(h.store.load().as_deref(), Some(token.as_str()));
    assert!(h.guard.is_authenticated());

    assert!(states.has_changed().unwrap());
    match &*states.borrow_and_update() {
        AuthState::Authenticated { claims, admin } => {
            assert_eq!(*claims, session.claims);
            assert_eq!(admin.as_ref(), Some(&h.transport.admin));
        }
        other => panic!("expected an authenticated state, got {other:?}"),
    }

    tokio::time::sleep(Duration::from_secs(3601)).await;
    settle().await;
    assert_eq!(h.notifier.count(), 1);
    assert_eq!(*states.borrow_and_update(), AuthState::Unauthenticated);
}

#[tokio::test]
async fn rejected_login_leaves_session_untouched() {
    let previous = token_valid_for(3600);
    let h = harness(Some(previous.clone()), Reply::Status(401, "Invalid credentials"));
    let before = h.guard.init();

    let err = h.guard.login(&credentials()).await.unwrap_err();
    assert!(matches!(err, AuthError::Rejected(ref msg) if msg == "Invalid credentials"));
    assert_eq!(h.store.load().as_deref(), Some(previous.as_str()));
    assert_eq!(h.guard.state(), before);

    h.guard.teardown();
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let h = harness(None, Reply::Unreachable);
    let err = h.guard.login(&credentials()).await.unwrap_err();
    assert!(matches!(err, AuthError::Network(_)));
    assert!(h.store.load().is_none());
}

#[tokio::test]
async fn malformed_credentials_never_reach_the_server() {
    let h = harness(None, Reply::Token(token_valid_for(3600)));
    let bad = LoginRequest {
        email: "not-an-email".to_string(),
        password: "whatever".to_string(),
    };

    let err = h.guard.login(&bad).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidInput(ref msg) if msg == "Invalid email format"));
    assert_eq!(h.transport.calls(), 0);
}

#[tokio::test]
async fn email_without_a_dotted_domain_never_reaches_the_server() {
    let h = harness(None, Reply::Token(token_valid_for(3600)));
    let err = h
        .guard
        .login(&LoginRequest {
            email: "admin@shop".to_string(),
            password: "CorrectHorse9".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::InvalidInput(ref msg) if msg == "Invalid email format"));
    assert_eq!(h.transport.calls(), 0);
    assert!(h.store.load().is_none());
}

#[tokio::test]
async fn expired_token_from_server_is_rejected() {
    let issued_yesterday = TokenIssuer::new(SECRET, 3600)
        .issue_at(Uuid::new_v4(), NOW - 86_400)
        .unwrap();
    let h = harness(None, Reply::Token(issued_yesterday));

    assert!(matches!(
        h.guard.login(&credentials()).await,
        Err(AuthError::Rejected(_))
    ));
    assert!(h.store.load().is_none());
    assert_eq!(h.guard.state(), AuthState::Unauthenticated);
}

#[tokio::test]
async fn unreadable_token_from_server_is_rejected() {
    let h = harness(None, Reply::Token("garbage".to_string()));
    assert!(matches!(
        h.guard.login(&credentials()).await,
        Err(AuthError::InvalidToken(_))
    ));
    assert!(h.store.load().is_none());
}

#[tokio::test]
async fn register_does_not_log_in() {
    let h = harness(None, Reply::Unreachable);
    let admin = h
        .guard
        .register(&RegisterRequest {
            username: "owner".to_string(),
            email: "owner@shop.test".to_string(),
            password: "CorrectHorse9".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(admin.username, "owner");
    assert!(!h.guard.is_authenticated());
    assert!(h.store.load().is_none());
}

#[tokio::test]
async fn short_password_is_refused_before_registering() {
    let h = harness(None, Reply::Unreachable);
    let err = h
        .guard
        .register(&RegisterRequest {
            username: "owner".to_string(),
            email: "owner@shop.test".to_string(),
            password: "short".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AuthError::InvalidInput(ref msg) if msg == "Password must be at least 8 characters long"
    ));
    assert_eq!(h.transport.calls(), 0);
}

#[tokio::test]
async fn weak_password_reports_the_first_broken_rule() {
    let h = harness(None, Reply::Unreachable);
    let register = |password: &str| RegisterRequest {
        username: "owner".to_string(),
        email: "owner@shop.test".to_string(),
        password: password.to_string(),
    };

    for (password, expected) in [
        ("alllowercase", "Password must contain at least one uppercase letter"),
        ("ALLUPPERCASE", "Password must contain at least one lowercase letter"),
        ("NoDigitsHere", "Password must contain at least one number"),
    ] {
        let err = h.guard.register(&register(password)).await.unwrap_err();
        assert!(
            matches!(err, AuthError::InvalidInput(ref msg) if msg == expected),
            "{password}: {err}"
        );
    }
    assert_eq!(h.transport.calls(), 0);
}

#[tokio::test]
async fn registration_email_is_checked_before_the_server() {
    let h = harness(None, Reply::Unreachable);
    let err = h
        .guard
        .register(&RegisterRequest {
            username: "owner".to_string(),
            email: "owner@shop".to_string(),
            password: "CorrectHorse9".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::InvalidInput(ref msg) if msg == "Invalid email format"));
    assert_eq!(h.transport.calls(), 0);
}

#[tokio::test]
async fn expiry_warning_looks_ahead() {
    let h = harness(Some(token_valid_for(600)), Reply::Unreachable);
    assert!(!h.guard.will_expire_soon(Duration::from_secs(300)));

    h.clock.advance_secs(301);
    assert!(h.guard.will_expire_soon(Duration::from_secs(300)));

    let empty = harness(None, Reply::Unreachable);
    assert!(empty.guard.will_expire_soon(Duration::from_secs(300)));
}

#[tokio::test(start_paused = true)]
async fn teardown_keeps_the_token_for_the_next_start() {
    let h = harness(Some(token_valid_for(600)), Reply::Unreachable);
    assert!(h.guard.init().is_authenticated());

    h.guard.teardown();
    tokio::time::sleep(Duration::from_secs(700)).await;
    settle().await;

    assert_eq!(h.notifier.count(), 0);
    assert!(h.store.load().is_some());
}

#[tokio::test]
async fn file_store_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let token = token_valid_for(3600);
    let clock = ManualClock::at_secs(NOW);

    let first = SessionGuard::builder(
        Arc::new(FileTokenStore::new(dir.path())),
        Arc::new(ScriptedTransport::new(Reply::Token(token.clone()))),
    )
    .clock(Arc::new(clock.clone()))
    .build();
    first.login(&credentials()).await.unwrap();
    first.teardown();

    let second = SessionGuard::builder(
        Arc::new(FileTokenStore::new(dir.path())),
        Arc::new(ScriptedTransport::new(Reply::Unreachable)),
    )
    .clock(Arc::new(clock))
    .build();

    match second.init() {
        AuthState::Authenticated { admin, .. } => assert!(admin.is_none()),
        other => panic!("expected a restored session, got {other:?}"),
    }
    assert_eq!(second.token().as_deref(), Some(token.as_str()));
    second.teardown();
}
