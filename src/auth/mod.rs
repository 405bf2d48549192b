// Authentication module
// Password hashing, JWT issuance/verification and the role gate for protected routes

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::{get_profile_handler, login_handler, signup_handler, update_profile_handler};
pub use middleware::{require_roles, RoleGate};
pub use password::PasswordService;
pub use repository::UserRepository;
pub use service::AuthService;
pub use token::TokenService;
