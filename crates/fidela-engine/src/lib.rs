//! # Fidela Engine
//!
//! The recurring-task generation and dispatch engine:
//!
//! ```text
//! Scheduler (daily timer or manual "run now")
//!   ├── Generator: Rule Evaluator × Dedup Guard → pending tasks
//!   └── Dispatch:  due pending tasks → Sender → sent/failed + log
//!
//! Broadcast worker (operator-triggered, managed tokio task)
//!   └── every client → paced Sender call → log "promo"
//! ```
//!
//! All pipelines take the store handle and sender explicitly; nothing here
//! holds ambient global state.

pub mod broadcast;
pub mod dispatch;
pub mod generate;
pub mod rules;
pub mod scheduler;

pub use broadcast::{BroadcastHandle, BroadcastReport, Pacing};
pub use dispatch::DispatchReport;
pub use rules::Candidate;
pub use scheduler::RunSummary;

#[cfg(test)]
pub(crate) mod testing {
    //! Shared test double for the Sender boundary.

    use std::sync::Mutex;

    use async_trait::async_trait;
    use fidela_core::error::{FidelaError, Result};
    use fidela_core::traits::Sender;

    /// Records every call; fails on demand.
    pub struct MockSender {
        pub fail: bool,
        pub calls: Mutex<Vec<(String, String, Option<String>)>>,
    }

    impl MockSender {
        pub fn ok() -> Self {
            Self { fail: false, calls: Mutex::new(Vec::new()) }
        }

        pub fn failing() -> Self {
            Self { fail: true, calls: Mutex::new(Vec::new()) }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Sender for MockSender {
        fn name(&self) -> &str {
            "mock"
        }

        async fn send(&self, phone: &str, message: &str, image: Option<&str>) -> Result<()> {
            self.calls.lock().unwrap().push((
                phone.to_string(),
                message.to_string(),
                image.map(String::from),
            ));
            if self.fail {
                Err(FidelaError::Channel("mock send refused".into()))
            } else {
                Ok(())
            }
        }
    }
}
