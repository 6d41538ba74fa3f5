mod session;

pub use session::AuthResult;
pub use session::AuthSession;
pub use session::Handoff;
