// Console report adapter - User-facing progress on stdout

use crate::ports::*;
use async_trait::async_trait;
use std::io::{self, Write};
use std::sync::Mutex;
use tracing::{info, warn};

/// Render items as a tree, one branch per line
pub fn render_tree(branches: &[String]) -> String {
    let mut out = String::new();
    for (i, branch) in branches.iter().enumerate() {
        let connector = if i + 1 == branches.len() { "└── " } else { "├── " };
        out.push_str(connector);
        out.push_str(branch);
        out.push('\n');
    }
    out
}

/// Reporter writing progress to a writer (stdout by default)
pub struct ConsoleReportAdapter {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleReportAdapter {
    /// Create new reporter on stdout
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    /// Create reporter on any writer
    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    fn emit(&self, text: &str) {
        // Write errors on the report stream are ignored
        if let Ok(mut out) = self.out.lock() {
            let _ = out.write_all(text.as_bytes());
            let _ = out.flush();
        }
    }
}

impl Default for ConsoleReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportPort for ConsoleReportAdapter {
    async fn step(&self, message: &str) {
        info!("{}", message);
        self.emit(&format!("{}\n", message));
    }

    async fn warning(&self, message: &str) {
        warn!("{}", message);
        self.emit(&format!("{}\n\n", message));
    }

    async fn tree(&self, branches: &[String]) {
        self.emit(&format!("{}\n", render_tree(branches)));
    }

    async fn saved(&self, output_file: &str) {
        info!(output = %output_file, "Output file saved");
        self.emit(&format!("Output file saved as {}\n", output_file));
    }
}
