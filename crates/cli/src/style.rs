//! Terminal styling for command output.

use console::Style;

pub fn success(msg: &str) -> String {
    let style = Style::new().green();
    format!("{} {}", style.apply_to("✓"), msg)
}

pub fn error(msg: &str) -> String {
    let style = Style::new().red();
    format!("{} {}", style.apply_to("✗"), msg)
}

/// Yellow, for partial results such as unresolved role grants.
pub fn warn(msg: &str) -> String {
    let style = Style::new().yellow();
    format!("{} {}", style.apply_to("⚠"), msg)
}

pub fn header(msg: &str) -> String {
    Style::new().bold().apply_to(msg).to_string()
}

pub fn dim(msg: &str) -> String {
    Style::new().dim().apply_to(msg).to_string()
}

/// "set" / "NOT SET" marker for secrets in the config summary.
pub fn presence(is_set: bool) -> String {
    if is_set {
        Style::new().green().apply_to("set").to_string()
    } else {
        Style::new().red().apply_to("NOT SET").to_string()
    }
}
