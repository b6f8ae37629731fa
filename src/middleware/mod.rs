pub mod session;

pub use session::{SessionSettings, SessionState, SessionUser, session_layer};
