//! Async client for the students API.

pub mod client;

pub use client::{
    ApiErrorBody, ClientError, Created, Health, Message, Student, StudentInput, StudentsClient,
};
