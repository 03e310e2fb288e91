mod common;
mod service;
mod socket;
