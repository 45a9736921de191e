pub mod client;
pub mod routes;

pub use client::GeminiClient;
pub use routes::routes;
