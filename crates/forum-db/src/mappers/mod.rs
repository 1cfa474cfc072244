//! Entity <-> model mappers

mod forum;
mod post;
mod private_message;
mod profile;
mod topic;
mod user;
