//! Status icons for CLI output

/// Status icons for different states
pub struct StatusIcon;

impl StatusIcon {
    /// Success icon (step completed)
    pub const SUCCESS: &'static str = "✓";

    /// Error icon (step failed)
    pub const ERROR: &'static str = "✗";

    /// Skipped icon (step disabled)
    pub const SKIPPED: &'static str = "-";

    /// Get icon for an image step: done, or disabled by annotation
    pub fn get_step_icon(done: bool) -> &'static str {
        if done {
            Self::SUCCESS
        } else {
            Self::SKIPPED
        }
    }

    /// Get status text for the image after generation
    pub fn get_image_status_text(built: bool, pushed: bool) -> &'static str {
        match (built, pushed) {
            (true, true) => "Built and pushed",
            (true, false) => "Built",
            _ => "Not built",
        }
    }
}
