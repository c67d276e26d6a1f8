pub mod customers;
pub mod orders;
pub mod products;
pub mod settings;
pub mod stats;
pub mod stock;
