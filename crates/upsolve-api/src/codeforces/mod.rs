pub mod client;
pub mod routes;

pub use client::CodeforcesClient;
pub use routes::routes;
