//! # Output Formatting
//!
//! Provides formatted output functions with colors, emojis, and consistent
//! styling for user-facing messages and terminal output.

use owo_colors::OwoColorize;
use {clap, emojis};

/// Enum representing different color modes for output
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
  /// Enable colored output
  Yes,
  /// Enable colored output (alias for Yes)
  Always,
  /// Automatically detect if colors should be used based on terminal
  /// capabilities
  Auto,
  /// Disable colored output
  No,
  /// Disable colored output (alias for No)
  Never,
}

/// Helper function to safely get an emoji or fallback to a default character
pub fn get_emoji_or_default(name: &str, default: &str) -> String {
  match emojis::get_by_shortcode(name) {
    Some(emoji) => emoji.to_string(),
    None => default.to_string(),
  }
}

/// Print a success message
pub fn print_success(message: &str) {
  let check = get_emoji_or_default("check_mark", "✓");
  println!("{} {}", check.green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
  let cross = get_emoji_or_default("cross_mark", "✗");
  eprintln!("{} {}", cross.red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
  let warning = get_emoji_or_default("warning", "⚠");
  println!("{} {}", warning.yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
  let info = get_emoji_or_default("information", "ℹ");
  println!("{} {}", info.blue().bold(), message);
}

/// Print a section header
pub fn print_header(header: &str) {
  println!("\n{}", header.blue().bold());
}

/// Format a repository reference
pub fn format_repo_name(name: &str) -> String {
  name.bright_cyan().bold().to_string()
}

/// Format an issue number as `#N`
pub fn format_issue_number(number: u32) -> String {
  format!("#{number}").bright_black().to_string()
}

/// Format a GitHub login
pub fn format_login(login: &str) -> String {
  login.bright_green().to_string()
}

/// Format a command or command example
pub fn format_command(cmd: &str) -> String {
  cmd.purple().to_string()
}

/// Format a GitHub issue state
pub fn format_issue_state(state: &str) -> String {
  match state {
    "open" => state.green().to_string(),
    "closed" => state.purple().to_string(),
    _ => state.to_string(),
  }
}

/// Parse a six digit hex color, with or without a leading `#`
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
  let hex = hex.trim().trim_start_matches('#');
  if hex.len() != 6 || !hex.is_ascii() {
    return None;
  }

  let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
  Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Text color readable on top of the given background.
///
/// Uses the YIQ brightness formula: backgrounds scoring 128 or more get black
/// text, darker ones white.
pub fn contrast_text_color(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
  let yiq = (u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000;
  if yiq >= 128 { (0, 0, 0) } else { (255, 255, 255) }
}

/// Format a label as a badge on its own background color.
///
/// Labels with an unusable color fall back to plain bracketed text.
pub fn format_label(name: &str, color: &str) -> String {
  match parse_hex_color(color) {
    Some((r, g, b)) => {
      let (fr, fg, fb) = contrast_text_color(r, g, b);
      format!(" {name} ").on_truecolor(r, g, b).truecolor(fr, fg, fb).to_string()
    }
    None => format!("[{name}]"),
  }
}
