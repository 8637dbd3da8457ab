//! Pages

mod chat;

pub use chat::ChatPage;
