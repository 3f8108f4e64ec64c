pub mod ranking;
pub mod repository;
pub mod storage;
pub mod submission;
pub mod upload;
pub mod vote;
