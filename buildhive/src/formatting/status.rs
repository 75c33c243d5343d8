//! Status indicators and banners.

use owo_colors::OwoColorize;

/// Prints a success line.
pub fn print_success(message: &str) {
    println!("  {} {}", "✓".green(), message.green().bold());
}

/// Prints an error line.
pub fn print_error(message: &str) {
    println!("  {} {}", "✗".red(), message.red().bold());
}

/// Prints a warning line.
pub fn print_warning(message: &str) {
    println!("  {} {}", "⚠".yellow(), message.yellow().bold());
}

/// Prints a success banner for the end of a run.
pub fn print_success_banner(message: &str) {
    println!();
    println!("{}", "═".repeat(60).green());
    println!("  {}", message.green().bold());
    println!("{}", "═".repeat(60).green());
}

/// Prints a failure banner for the end of a run.
pub fn print_fail_banner(message: &str) {
    println!();
    println!("{}", "═".repeat(60).red());
    println!("  {}", message.red().bold());
    println!("{}", "═".repeat(60).red());
}
