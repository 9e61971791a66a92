//! State machines behind the Q&A client: who is signed in, which view they may
//! see, and the live conversation with its typing reveal.

pub mod chat;
pub mod error;
pub mod form;
pub mod guard;
pub mod reveal;
pub mod session;

pub use chat::{ChatConfig, ChatSession, Message, PendingAsk, Phase, Role};
pub use error::SessionError;
pub use guard::guard;
pub use reveal::{RevealTick, Revealer};
pub use session::SessionManager;
