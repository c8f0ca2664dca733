//! Client-side admin session: the stored token, its expiry, and the
//! automatic logout when it lapses.

pub mod clock;
pub mod error;
pub mod guard;
pub mod notify;
pub mod store;
pub mod token;
pub mod transport;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::AuthError;
pub use guard::{AuthState, EXPIRY_WARNING_WINDOW, Session, SessionGuard, SessionGuardBuilder};
pub use notify::{ExpiryNotifier, LogNotifier};
pub use store::{FileTokenStore, MemoryTokenStore, StoreError, TOKEN_KEY, TokenStore};
pub use token::{Claims, TokenDecodeError, decode_claims};
pub use transport::AuthTransport;
