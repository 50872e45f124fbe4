//! Headless views. Each holds its own presentation state and returns
//! [`Effect`](crate::Effect)s for the UI binding to apply.

pub mod home;
pub mod login;
pub mod signup;

pub use home::{Editor, HomeView, NoteCard};
pub use login::LoginView;
pub use signup::SignUpView;
