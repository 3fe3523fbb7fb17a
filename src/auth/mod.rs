pub mod claims;
mod dto;
pub mod services;
pub mod session;

pub use dto::{LoginForm, TokenResponse};
pub use services::login;
pub use session::{Session, SessionStore};
