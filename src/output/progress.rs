use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bright_green, bright_red, bright_yellow};

/// Spinner shown on stderr while a document is being fetched.
pub struct FetchProgress {
    pb: ProgressBar,
    label: String,
}

impl FetchProgress {
    pub fn start(kind: &str, id: &str) -> Self {
        let label = format!("{kind} {id}");
        let pb = create_spinner(bright_yellow(format!("Fetching {label}")).to_string());
        Self { pb, label }
    }

    pub fn finish(self, found: bool) {
        let message = if found {
            bright_green(format!("Fetched {} ✓", self.label))
        } else {
            bright_red(format!("No data for {} ✗", self.label))
        };
        self.pb.finish_with_message(message.to_string());
        eprintln!();
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::default_spinner().template("  {msg} {spinner}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
