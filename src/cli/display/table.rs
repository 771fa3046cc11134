//! Table rendering for CLI output

use super::colors::table_color_to_colored_str;
use super::{ColorTheme, StatusIcon};
use crate::domain::artifact::GenerationReport;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render every generated artifact as a formatted table
    pub fn render_artifacts(&self, report: &GenerationReport) -> String {
        if report.artifacts.is_empty() {
            return "No artifacts generated".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("KIND").set_alignment(CellAlignment::Left),
                Cell::new("NAME").set_alignment(CellAlignment::Left),
                Cell::new("FILE").set_alignment(CellAlignment::Left),
            ]);

        for artifact in &report.artifacts {
            let file = artifact
                .file
                .strip_prefix(&report.output_dir)
                .unwrap_or(&artifact.file);
            table.add_row(vec![
                Cell::new(&artifact.kind).fg(self.theme.get_kind_color(&artifact.kind)),
                Cell::new(&artifact.name),
                Cell::new(file.display()),
            ]);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Generated Artifacts {} ─╮\n",
            format!("[{}]", report.output_dir.display())
                .bright_black()
                .to_string()
        ));
        output.push_str(&table.to_string());
        output
    }

    /// Render the image build and push outcome on one line
    pub fn render_image_status(&self, report: &GenerationReport) -> String {
        let built = report.image_id.is_some();
        let status = StatusIcon::get_image_status_text(built, report.pushed);
        let line = format!(
            "{} Image {}: {}",
            StatusIcon::get_step_icon(built),
            report.image,
            status
        );
        if built {
            line.green().to_string()
        } else {
            line.bright_black().to_string()
        }
    }

    /// Render a generation failure with the step that raised it
    pub fn render_failure(&self, step: &str, error: &dyn std::fmt::Display) -> String {
        let color = table_color_to_colored_str(self.theme.error);
        format!("{} {} failed: {}", StatusIcon::ERROR, step, error)
            .color(color)
            .to_string()
    }

    /// Render the commands that deploy the generated artifacts
    pub fn render_apply_commands(&self, report: &GenerationReport) -> String {
        let color = table_color_to_colored_str(self.theme.info);
        let mut output = String::from("Run the following command(s) to deploy:\n");
        for command in &report.apply_commands {
            output.push_str(&format!("  {}\n", command.color(color)));
        }
        output
    }
}
