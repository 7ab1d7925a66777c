pub mod catalog;
pub mod compat;
pub mod entities;
pub mod extract;
pub mod health;
pub mod links;
