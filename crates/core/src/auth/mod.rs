mod functions;
mod types;

pub use functions::{bearer_header, login_redirect_path, validate_return_to, LOGIN_PATH};
pub use types::{Credentials, Session, SessionId, SessionUser};
