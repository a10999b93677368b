pub mod disease_api;

pub use disease_api::DiseaseApi;
