use std::io::{self, Write};

use weather_core::{search::WeatherPanel, theme::Theme};

const RESET: &str = "\x1b[0m";

fn style(theme: Theme) -> &'static str {
    match theme {
        Theme::Cloudy => "\x1b[97;100m",
        Theme::Rainy => "\x1b[97;44m",
        Theme::Sunny => "\x1b[30;103m",
    }
}

/// Terminal styling for the current theme. Styling is released when the
/// scope is dropped.
#[derive(Debug)]
pub struct ThemeScope {
    theme: Option<Theme>,
    color: bool,
}

impl ThemeScope {
    pub fn new(theme: Option<Theme>) -> Self {
        Self { theme, color: std::env::var_os("NO_COLOR").is_none() }
    }

    pub fn set(&mut self, theme: Option<Theme>) {
        self.theme = theme;
    }

    pub fn paint(&self, line: &str) -> String {
        match self.theme {
            Some(theme) if self.color => format!("{}{line}{RESET}", style(theme)),
            _ => line.to_string(),
        }
    }

    pub fn print_panel(&self, panel: &WeatherPanel) {
        for line in panel_lines(panel) {
            println!("{}", self.paint(&line));
        }
    }
}

impl Drop for ThemeScope {
    fn drop(&mut self) {
        if self.color && self.theme.is_some() {
            let mut out = io::stdout();
            let _ = write!(out, "{RESET}");
            let _ = out.flush();
        }
    }
}

/// The weather panel as padded text lines.
pub fn panel_lines(panel: &WeatherPanel) -> Vec<String> {
    let mut lines = vec![
        panel.name.clone(),
        format!("{} ({})", panel.description, panel.icon_url),
    ];
    lines.extend(panel.lines());

    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    lines
        .into_iter()
        .map(|l| {
            let pad = width - l.chars().count();
            format!(" {l}{} ", " ".repeat(pad))
        })
        .collect()
}
