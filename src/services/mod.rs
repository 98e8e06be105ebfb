//! Business logic services layer

pub mod auth_service;
pub mod todo_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use todo_service::TodoService;
pub use user_service::UserService;
