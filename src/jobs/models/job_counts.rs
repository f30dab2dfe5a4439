use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobCounts {
    pub in_queue: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub failed: usize,
}
