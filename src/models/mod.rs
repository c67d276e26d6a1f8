pub mod customer;
pub mod order;
pub mod order_item;
pub mod product;
pub mod sale;
pub mod session;
pub mod stock;
