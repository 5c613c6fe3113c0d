//! cy2pw CLI UI primitives.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Color palette
pub mod colors {
    use console::Color;

    pub const CYAN: Color = Color::Color256(51);
    pub const MAGENTA: Color = Color::Color256(201);
    pub const VIOLET: Color = Color::Color256(135);
    pub const NEON_GREEN: Color = Color::Color256(82);
    pub const AMBER: Color = Color::Color256(214);
    pub const DIM: Color = Color::Color256(240);
}

pub mod symbols {
    pub const DIAMOND: &str = "\u{25C6}"; // ◆
    pub const DIAMOND_OUTLINE: &str = "\u{25C7}"; // ◇
    pub const TARGET_FILLED: &str = "\u{25C9}"; // ◉
    pub const TRIANGLE: &str = "\u{25B8}"; // ▸
    pub const PROGRESS_FILLED: &str = "\u{25B0}"; // ▰
    pub const PROGRESS_EMPTY: &str = "\u{25B1}"; // ▱
    pub const DOT: &str = "\u{00B7}"; // ·
}

/// Print a success message
pub fn success(msg: &str) {
    println!("  {} {}", style(symbols::TARGET_FILLED).fg(colors::NEON_GREEN), msg);
}

/// Print a warning
pub fn warn(msg: &str) {
    println!("  {} {}", style(symbols::DIAMOND).fg(colors::AMBER), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    println!("  {} {}", style(symbols::DIAMOND_OUTLINE).fg(colors::CYAN), msg);
}

/// Print a dim/secondary message
pub fn dim(msg: &str) {
    println!("  {}", style(msg).fg(colors::DIM));
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner()
        .tick_chars("\u{25CE}\u{25C9}\u{25CE}\u{25C9}") // ◎◉◎◉
        .template("  {spinner:.cyan} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(150));
    pb
}

/// Print a divider line
pub fn divider() {
    println!();
    let line = "\u{254C}".repeat(53); // ╌
    println!("  {}", style(line).fg(colors::DIM));
    println!();
}

/// Print a box header
pub fn box_header(title: &str) {
    let width = 55;
    let title_padded = format!(" {} ", title);
    let title_len = title_padded.chars().count();
    let dashes = width - title_len.min(width - 4) - 4;

    println!(
        "  {}{}{}{}",
        style("\u{256D}\u{2500}").fg(colors::CYAN), // ╭─
        style(title_padded).fg(colors::CYAN).bold(),
        style("\u{2500}".repeat(dashes)).fg(colors::CYAN),
        style("\u{256E}").fg(colors::CYAN) // ╮
    );
}

/// Print a box line
pub fn box_line(content: &str) {
    let width: usize = 53;
    let content_len = content.chars().count();
    let padding = width.saturating_sub(content_len);
    println!(
        "  {} {}{}{}",
        style("\u{2502}").fg(colors::CYAN), // │
        content,
        " ".repeat(padding),
        style("\u{2502}").fg(colors::CYAN)
    );
}

/// Print a box footer
pub fn box_footer() {
    let width = 55;
    println!(
        "  {}{}{}",
        style("\u{2570}").fg(colors::CYAN), // ╰
        style("\u{2500}".repeat(width - 2)).fg(colors::CYAN),
        style("\u{256F}").fg(colors::CYAN) // ╯
    );
}

/// Eight-cell bar for `converted` out of `total`.
pub fn conversion_bar(converted: usize, total: usize) -> String {
    let filled = if total == 0 { 8 } else { (converted * 8) / total };
    let filled = filled.min(8);
    format!(
        "{}{}",
        symbols::PROGRESS_FILLED.repeat(filled),
        symbols::PROGRESS_EMPTY.repeat(8 - filled)
    )
}

/// Print one converted spec: output name, counts and a bar.
pub fn file_line(output: &str, converted: usize, commands: usize, todos: usize) {
    let todos = if todos == 0 {
        String::new()
    } else {
        format!("   {}", style(format!("{todos} TODO")).fg(colors::AMBER))
    };
    println!(
        "  {}   {:32} {:>3}/{:<3} {}{}",
        style(symbols::TRIANGLE).fg(colors::CYAN),
        style(output).bold(),
        converted,
        commands,
        style(conversion_bar(converted, commands)).fg(colors::VIOLET),
        todos
    );
}

/// Print file tree item
pub fn tree_item(prefix: &str, name: &str, description: Option<&str>, is_last: bool) {
    let connector = if is_last {
        "\u{2570}\u{2500}\u{2500}" // ╰──
    } else {
        "\u{251C}\u{2500}\u{2500}" // ├──
    };

    match description {
        Some(desc) => println!(
            "  {}{}  {}   {}",
            style(prefix).fg(colors::DIM),
            style(connector).fg(colors::DIM),
            style(name).fg(colors::CYAN),
            style(desc).dim()
        ),
        None => println!(
            "  {}{}  {}",
            style(prefix).fg(colors::DIM),
            style(connector).fg(colors::DIM),
            style(name).fg(colors::CYAN)
        ),
    }
}

/// Print timing information
pub fn timing(label: &str, duration_ms: u128) {
    println!(
        "  {} {} in {}ms",
        style(symbols::DIAMOND_OUTLINE).fg(colors::CYAN),
        label,
        duration_ms
    );
}

/// Print "Nope" error header (for check failures)
pub fn nope_header() {
    println!();
    println!(
        "  {} {}",
        style(symbols::DIAMOND).fg(colors::MAGENTA).bold(),
        style("Nope.").fg(colors::MAGENTA).bold()
    );
    println!();
}

/// Print "Looking good" success for check
pub fn looking_good() {
    println!(
        "  {} {}",
        style(symbols::TARGET_FILLED).fg(colors::NEON_GREEN),
        style("Looking good.").bold()
    );
}
