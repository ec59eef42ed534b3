use async_trait::async_trait;
use std::io::BufRead;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader};

use super::list::ListFeeder;
use super::traits::Feeder;
use crate::errors::DispatchError;

/// Feeds one target per line. Blank lines and `#` comments are skipped.
pub struct LineFeeder {
    inner: ListFeeder,
}

impl LineFeeder {
    pub fn from_reader(reader: impl BufRead) -> Result<Self, DispatchError> {
        let mut targets = Vec::new();
        for line in reader.lines() {
            push_target(&mut targets, &line?);
        }
        Ok(Self::from_targets(targets))
    }

    pub async fn from_async_reader(
        reader: impl AsyncBufRead + Unpin,
    ) -> Result<Self, DispatchError> {
        let mut targets = Vec::new();
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            push_target(&mut targets, &line);
        }
        Ok(Self::from_targets(targets))
    }

    /// `-` reads from stdin.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, DispatchError> {
        let path = path.as_ref();
        if path == Path::new("-") {
            return Self::from_async_reader(BufReader::new(io::stdin())).await;
        }
        Self::from_async_reader(BufReader::new(File::open(path).await?)).await
    }

    fn from_targets(targets: Vec<String>) -> Self {
        Self {
            inner: ListFeeder::new(targets),
        }
    }
}

fn push_target(targets: &mut Vec<String>, line: &str) {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return;
    }
    targets.push(line.to_string());
}

#[async_trait]
impl Feeder for LineFeeder {
    async fn next_target(&mut self) -> Option<String> {
        self.inner.next_target().await
    }

    fn total_targets(&self) -> usize {
        self.inner.total_targets()
    }
}
