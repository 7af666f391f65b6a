#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

macro_rules! id {
    ($(#[$meta:meta])* $name: ident) => {
        $(#[$meta])*
        #[derive(
            derive_more::Deref,
            derive_more::Display,
            Debug,
            Default,
            Clone,
            Copy,
            Hash,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
        )]
        pub struct $name(uuid::Uuid);

        impl $name {
            #[must_use]
            pub fn nil() -> Self {
                Self(uuid::Uuid::nil())
            }

            #[must_use]
            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(value: uuid::Uuid) -> Self {
                Self(value)
            }
        }

        impl From<u128> for $name {
            fn from(value: u128) -> Self {
                Self(uuid::Uuid::from_bytes(value.to_be_bytes()))
            }
        }
    };
}

mod asset;
mod assignment;
mod cloning;
mod error;
mod exercise;
mod name;
mod ordering;
mod page;
mod program;
mod service;
mod superset;
mod training;
mod tree;
mod user;

pub use asset::*;
pub use assignment::*;
pub use cloning::*;
pub use error::*;
pub use exercise::*;
pub use name::*;
pub use ordering::*;
pub use page::*;
pub use program::*;
pub use service::*;
pub use superset::*;
pub use training::*;
pub use tree::*;
pub use user::*;
