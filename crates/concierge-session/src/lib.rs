//! concierge-session: conversation state and request dispatch
//!
//! This crate owns the state of one assistant session. Dispatchers append the
//! user's input, perform a single backend request through a [`Transport`], and
//! reconcile the response (or an apology) into the store. Views derive
//! conversation summaries and agent/source panels from that state.

pub mod dispatch;
pub mod events;
pub mod message;
pub mod session;
pub mod store;
pub mod transport;
pub mod views;

pub use dispatch::{CHAT_APOLOGY, UPLOAD_APOLOGY};
pub use events::SessionEvent;
pub use message::{Message, Role};
pub use session::{DispatchOutcome, Rejection, Session};
pub use store::{SessionState, derive_title};
pub use transport::Transport;
pub use views::{ActiveAgent, Conversation, SourceGroup};
