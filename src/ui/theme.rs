use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Styles for the profile listing and status lines
#[derive(Debug, Clone)]
pub struct Theme {
    pub title: Style,
    pub ok: Style,
    pub label: Style,
    pub host: Style,
    pub secret: Style,
}

impl Theme {
    pub fn for_stdout() -> Self {
        if console::Term::stdout().is_term() {
            Self::terminal()
        } else {
            Self::none()
        }
    }

    pub fn terminal() -> Self {
        Self {
            title: Style::new().blue().bold(),
            ok: Style::new().green(),
            label: Style::new().bright_black(),
            host: Style::new().cyan().underline(),
            secret: Style::new().bright_black().italic(),
        }
    }

    /// No styling, for pipes and redirected output
    pub fn none() -> Self {
        let plain = Style::new();
        Self {
            title: plain.clone(),
            ok: plain.clone(),
            label: plain.clone(),
            host: plain.clone(),
            secret: plain,
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::for_stdout)
}
