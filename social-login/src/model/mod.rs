mod facebook;
pub use facebook::{AuthResponse, InitOptions, LoginOptions, LoginResponse, LoginStatus};

mod provider;
pub use provider::{Provider, BASE_URL_FIELD, OAUTH_STATE_TOKEN_FIELD};
