pub mod alarm;
pub mod health;
pub mod ui;
