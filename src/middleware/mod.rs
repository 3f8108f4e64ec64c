pub mod client_ip;
pub mod security;

pub use client_ip::VoterIp;
