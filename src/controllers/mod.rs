pub mod health;
pub mod studio;
