//! CLI output formatting: status lines, banners, progress.

mod output;
mod progress;
mod status;

pub use output::{format_bytes, format_duration, print_summary_box};
pub use progress::create_archive_bar;
pub use status::{
    print_error, print_fail_banner, print_success, print_success_banner, print_warning,
};
