// ABOUTME: Identity and scope resolution module
// ABOUTME: Derives the project/sprint sets a team lead may see or mutate

pub mod resolver;


pub use resolver::*;
