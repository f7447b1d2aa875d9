pub mod client;
pub mod config;
pub mod discovery;
pub mod error;
pub mod handler;
pub mod state;

pub use config::OidcClientConfig;
pub use error::OidcError;
pub use handler::callback;
pub use state::OidcState;
