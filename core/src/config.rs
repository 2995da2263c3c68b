#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Worker threads for encode jobs (0 = one per logical CPU)
    pub workers: usize,
    /// Prefix for worker thread names
    pub thread_name: String,
    /// Minimum quality change during a drag before a new generation is submitted
    pub debounce_threshold: f32,
    /// Quality used for the initial load
    pub initial_quality: f32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            thread_name: "encode-worker".to_string(),
            debounce_threshold: 0.1,
            initial_quality: 0.5,
        }
    }
}
