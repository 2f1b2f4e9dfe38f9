pub mod decision;
pub mod handlers;
pub mod round;
pub mod stage;
pub mod store;
pub mod tracker;
