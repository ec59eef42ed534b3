use async_trait::async_trait;
use std::collections::VecDeque;

use super::traits::Feeder;

/// Feeds targets from an in-memory list, e.g. command-line arguments.
pub struct ListFeeder {
    targets: VecDeque<String>,
}

impl ListFeeder {
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl Feeder for ListFeeder {
    async fn next_target(&mut self) -> Option<String> {
        self.targets.pop_front()
    }

    fn total_targets(&self) -> usize {
        self.targets.len()
    }
}
