//! API layer - HTTP endpoints and middleware

pub mod auth;
pub mod health;
pub mod middleware;
pub mod profile;
pub mod router;
pub mod state;
pub mod types;
pub mod users;


pub use middleware::RequireUser;
pub use router::{create_router, API_PREFIX};
pub use state::AppState;
