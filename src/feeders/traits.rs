use async_trait::async_trait;

#[async_trait]
pub trait Feeder: Send + Sync {
    async fn next_target(&mut self) -> Option<String>;
    fn total_targets(&self) -> usize;
}
