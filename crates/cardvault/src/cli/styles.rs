use console::Style;
use once_cell::sync::Lazy;

/// Styles used by the renderer. Built once per color decision so tests can
/// render without escape codes.
pub struct Palette {
    pub id: Style,
    pub title: Style,
    pub muted: Style,
    pub label: Style,
    pub stat: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub info: Style,
}

impl Palette {
    pub fn new(use_color: bool) -> Self {
        let style = |s: Style| s.force_styling(use_color);
        Self {
            id: style(Style::new().yellow()),
            title: style(Style::new().bold()),
            muted: style(Style::new().color256(247).italic()),
            label: style(Style::new().cyan()),
            stat: style(Style::new().bold().magenta()),
            success: style(Style::new().green()),
            warning: style(Style::new().yellow()),
            error: style(Style::new().red().bold()),
            info: style(Style::new().dim()),
        }
    }
}

pub static THEME: Lazy<Palette> = Lazy::new(|| Palette::new(console::colors_enabled()));
