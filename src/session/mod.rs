//! Session lifecycle: credential storage, request authentication and the
//! forced return to login when the backend rejects a credential.

pub mod guard;
pub mod navigator;
pub mod store;

pub use guard::SessionGuard;
pub use navigator::{Navigator, Route, Router};
pub use store::{CredentialPair, FileSessionStore, SessionStore};
#[cfg(test)]
pub use store::MemorySessionStore;
