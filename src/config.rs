//! Evaluation configuration.

/// Default positional slack (bp) for close-match detection.
pub const DEFAULT_TOLERANCE: u64 = 50;

/// Runtime settings shared by every evaluation stage.
#[derive(Debug, Clone)]
pub struct Config {
    /// Half-width of the window built around each breakpoint for close matching.
    pub tolerance: u64,
    /// GTF attribute holding the gene id.
    pub gene_id_tag: String,
    /// GTF attribute holding the transcript id.
    pub transcript_id_tag: String,
    /// GTF attribute holding the gene name.
    pub gene_name_tag: String,
    /// Worker threads for per-junction work.
    pub threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tolerance: DEFAULT_TOLERANCE,
            gene_id_tag: "gene_id".to_string(),
            transcript_id_tag: "transcript_id".to_string(),
            gene_name_tag: "gene_name".to_string(),
            threads: num_cpus::get(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worker thread count; zero means "all cores".
    pub fn set_threads(&mut self, threads: usize) {
        self.threads = if threads == 0 {
            num_cpus::get()
        } else {
            threads
        };
    }
}
