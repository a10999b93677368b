pub mod disease_sh;
