pub mod backend;
pub mod collection;
pub mod credentials;
pub mod error;
pub mod lobby;
pub mod round;
pub mod runtime;
pub mod session;
pub mod setup;
pub mod ticker;

pub use backend::{GameBackend, HttpBackend};
pub use collection::{CollectionDraft, MIN_WORDS};
pub use credentials::{CredentialStore, Credentials};
pub use error::{BackendError, CredentialError, SessionError};
pub use lobby::{Lobby, RoleCard};
pub use round::{evaluate, tally, RoleTally, Round};
pub use runtime::{SessionHandle, SessionRuntime, ANNOUNCEMENT_DELAY};
pub use session::{
    format_elapsed, Elimination, OutcomeReporter, SessionController, SessionSnapshot, SessionState,
};
pub use setup::{max_impostors, RoundSetup};
pub use ticker::{Ticker, TICK_PERIOD};
