//! Nearby Core Library
//!
//! Core functionality for Nearby - a minimal location-sharing backend.
//! Users register and log in with salted password hashes, and named
//! positions can be published and queried by proximity.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

mod api;
pub mod config;
pub mod credential;
pub mod location;
pub mod logging;
pub mod storage;

pub use api::{
    CoreError, LoginForm, NearbyCore, PeopleQuery, PersonForm, Reply, SignupForm,
    MISSING_PARAMETERS,
};
