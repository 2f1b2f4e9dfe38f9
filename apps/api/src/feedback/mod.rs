pub mod archive;
pub mod assessment;
pub mod handlers;
pub mod submit;
