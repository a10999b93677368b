mod client;

pub use client::{DEFAULT_BASE_URL, DiseaseShClient};
