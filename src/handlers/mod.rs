pub mod gallery;
pub mod portfolio;
pub mod submit;
pub mod vote;
