//! In-memory doubles for HTTP-level and use-case-level testing.

mod app_state_builder;
mod mocks;

pub use app_state_builder::TestAppStateBuilder;
pub use mocks::{
    FailingEmailSender, InMemoryAccountRepo, RecordingEmailSender, SentEmail, create_test_account,
};
