#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod in_memory;
pub mod rest;
