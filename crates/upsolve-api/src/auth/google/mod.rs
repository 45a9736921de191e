pub mod client;
pub mod routes;

pub use client::{OpenIdClient, create_oidc_client};
pub use routes::routes;
