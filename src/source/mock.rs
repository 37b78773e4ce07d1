//! source::mock
//!
//! Scripted post source for deterministic testing.
//!
//! Pages are served in order; once they run out every request gets an
//! empty page. Failures can be injected on a specific call.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{PostSource, SearchPage, SearchRequest, SourceError};

/// Scripted source.
///
/// Clones share state, so a test can keep a handle for inspecting requests.
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    inner: Arc<Mutex<MockSourceInner>>,
}

#[derive(Debug, Default)]
struct MockSourceInner {
    pages: VecDeque<SearchPage>,
    fail_on: Option<FailOn>,
    requests: Vec<SearchRequest>,
}

/// Which call should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Every call fails.
    Always(SourceError),
    /// The n-th call (1-based) fails; other calls are served normally.
    Call(usize, SourceError),
}

impl MockSource {
    /// Create a source serving `pages` in order.
    pub fn new(pages: Vec<SearchPage>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockSourceInner {
                pages: pages.into(),
                ..Default::default()
            })),
        }
    }

    /// Inject a failure.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.lock().fail_on = Some(fail_on);
        self
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<SearchRequest> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockSourceInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PostSource for MockSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn search_recent(&self, request: SearchRequest) -> Result<SearchPage, SourceError> {
        let mut inner = self.lock();
        inner.requests.push(request);
        let call = inner.requests.len();

        match &inner.fail_on {
            Some(FailOn::Always(err)) => return Err(err.clone()),
            Some(FailOn::Call(n, err)) if *n == call => return Err(err.clone()),
            _ => {}
        }

        Ok(inner.pages.pop_front().unwrap_or_default())
    }
}
