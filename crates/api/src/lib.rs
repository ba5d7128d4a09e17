#![forbid(unsafe_code)]

pub mod contract;
pub mod fake;
pub mod http;

pub use contract::{
    Api, ApiError, AuthApi, CodeApi, FeedbackApi, HrApi, MatchApi, McqApi, ProctorApi, SessionApi,
};
pub use fake::InMemoryApi;
pub use http::{ApiConfig, HttpApi};
