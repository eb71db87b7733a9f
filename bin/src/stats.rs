use crate::processing::Report;

#[derive(Debug, Default)]
pub(crate) struct ProcessingStats {
    pub(crate) total_files: usize,
    pub(crate) processed: usize,
    pub(crate) failed: usize,
    pub(crate) total_pixels: u64,
    pub(crate) foreground_pixels: u64,
}

impl ProcessingStats {
    pub(crate) fn new(total_files: usize) -> Self {
        Self {
            total_files,
            ..Default::default()
        }
    }

    pub(crate) fn record(&mut self, report: &Report) {
        self.processed += 1;
        self.total_pixels += report.pixels();
        self.foreground_pixels += report.foreground;
    }

    pub(crate) fn record_failure(&mut self) {
        self.failed += 1;
    }

    pub(crate) fn foreground_ratio(&self) -> f64 {
        if self.total_pixels == 0 {
            0.0
        } else {
            self.foreground_pixels as f64 / self.total_pixels as f64
        }
    }

    pub(crate) fn log_progress(&self) {
        log::info!(
            "Progress: {}/{} files processed, {} failed",
            self.processed + self.failed,
            self.total_files,
            self.failed
        );
    }

    pub(crate) fn print_summary(&self) {
        println!("\n=== Processing Summary ===");
        println!("Total files: {}", self.total_files);
        println!("Successfully processed: {}", self.processed);
        println!("Failed: {}", self.failed);
        println!("Foreground pixels: {:.1}%", self.foreground_ratio() * 100.0);
        println!("Success rate: {:.1}%",
                 (self.processed as f64 / self.total_files as f64) * 100.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_reports() {
        let mut stats = ProcessingStats::new(3);
        let report = Report {
            width: 2,
            height: 2,
            foreground: 1,
            output: None,
            preview: None,
        };
        stats.record(&report);
        stats.record(&report);
        stats.record_failure();

        assert_eq!(stats.processed, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.total_pixels, 8);
        assert!((stats.foreground_ratio() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_ratio_is_zero() {
        assert_eq!(ProcessingStats::new(0).foreground_ratio(), 0.0);
    }
}
