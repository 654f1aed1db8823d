use std::io::Write;

use chrono::Utc;

use next_actions::config::WatchConfig;
use next_actions::core::action::sorted_by_due_by;
use next_actions::core::notify;
use next_actions::feed::{FeedClient, FeedController, TitleSink};

enum LaunchMode {
    Watch,
    Once,
}

/// Writes the derived title into the terminal's title bar (OSC 0).
struct TerminalTitle;

impl TitleSink for TerminalTitle {
    fn apply(&mut self, title: &str) {
        print!("\x1b]0;{}\x07", title);
        let _ = std::io::stdout().flush();
    }
}

#[tokio::main]
async fn main() {
    // Logging goes to the systemd user journal
    // (`journalctl --user -t next-actions -f`).
    systemd_journal_logger::JournalLog::new()
        .unwrap()
        .with_syslog_identifier("next-actions".to_string())
        .install()
        .unwrap();
    log::set_max_level(log::LevelFilter::Info);

    let config = match WatchConfig::from_environment() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    if config.debug_logging {
        log::set_max_level(log::LevelFilter::Debug);
    }

    let launch_mode = {
        let args: Vec<String> = std::env::args().collect();
        if args.iter().any(|a| a == "--once") {
            LaunchMode::Once
        } else {
            LaunchMode::Watch
        }
    };

    let client = FeedClient::new(&config.feed_url);

    match launch_mode {
        LaunchMode::Once => run_once(&client).await,
        LaunchMode::Watch => {
            log::info!(
                "Watching {} every {}s",
                config.feed_url,
                config.poll_interval.as_secs()
            );
            let controller = FeedController::new(client, TerminalTitle);
            tokio::select! {
                _ = controller.run(config.poll_interval) => {}
                _ = tokio::signal::ctrl_c() => {
                    log::info!("Shutting down");
                }
            }
        }
    }
}

/// Fetch one cycle and print the ordered list, overdue actions marked `!`
/// and due-soon actions marked `*`.
async fn run_once(client: &FeedClient) {
    let outcome = client.fetch().await;
    let now = Utc::now();

    for message in &outcome.error_messages {
        println!("{}", message);
    }

    for action in sorted_by_due_by(&outcome.actions) {
        let marker = if action.is_overdue(now) {
            "!"
        } else if action.is_due_soon(now) {
            "*"
        } else {
            " "
        };
        let due = match action.due_by {
            Some(due_by) => due_by.format("%Y-%m-%d %H:%M").to_string(),
            None => "no due date".to_string(),
        };
        let project = action.project_name.as_deref().unwrap_or("-");
        println!("{} [{}] {} ({})", marker, due, action.name, project);
    }

    let count = notify::notification_count(&outcome.actions, now);
    println!(
        "\n{} actions, {} needing attention",
        outcome.actions.len(),
        count
    );
}
