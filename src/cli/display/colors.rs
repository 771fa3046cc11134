//! Color theme for CLI output

use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub error: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            error: TableColor::Red,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    /// Get color for a generated resource kind
    pub fn get_kind_color(&self, kind: &str) -> TableColor {
        match kind {
            "Deployment" | "Job" | "CronJob" | "HorizontalPodAutoscaler" => self.success,
            "Service" | "Ingress" | "Gateway" | "VirtualService" | "Route" => self.info,
            "Secret" | "ConfigMap" | "PersistentVolumeClaim" | "ResourceQuota" => self.warning,
            _ => self.muted,
        }
    }
}

/// Convert comfy_table::Color to colored::Color string representation
pub fn table_color_to_colored_str(color: TableColor) -> &'static str {
    match color {
        TableColor::Green => "green",
        TableColor::Yellow => "yellow",
        TableColor::Red => "red",
        TableColor::Cyan => "cyan",
        TableColor::DarkGrey => "bright black",
        _ => "white",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = ColorTheme::default();
        assert_eq!(theme.success, TableColor::Green);
        assert_eq!(theme.warning, TableColor::Yellow);
        assert_eq!(theme.error, TableColor::Red);
    }

    #[test]
    fn test_get_kind_color() {
        let theme = ColorTheme::default();
        assert_eq!(theme.get_kind_color("Deployment"), TableColor::Green);
        assert_eq!(theme.get_kind_color("Ingress"), TableColor::Cyan);
        assert_eq!(theme.get_kind_color("Secret"), TableColor::Yellow);
        assert_eq!(theme.get_kind_color("Dockerfile"), TableColor::DarkGrey);
    }

    #[test]
    fn test_colored_str() {
        assert_eq!(table_color_to_colored_str(TableColor::Cyan), "cyan");
        assert_eq!(table_color_to_colored_str(TableColor::Blue), "white");
    }
}
