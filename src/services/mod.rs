pub mod auth;
pub mod session;

pub use auth::{
    AuthService, DEMO_USER_EMAIL, DEMO_USER_NAME, DEMO_USER_PASSWORD, hash_password,
    verify_password,
};
pub use session::{
    SESSION_COOKIE, acting_user_id, removal_cookie, session_cookie, session_key, session_user_id,
};
