// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};

mod app;
mod config;
mod data;
mod error;
mod events;
mod source;
mod ui;

use app::App;
use config::DashboardConfig;
use source::{CsvFileSource, RowSource};

#[derive(Parser, Debug)]
#[command(name = "phasewatch")]
#[command(about = "Diagnostic TUI for monitoring per-node phase temperatures")]
struct Args {
    /// Path to the CSV feed file
    #[cfg_attr(
        feature = "remote",
        arg(short, long, default_value = "phasewatch.csv", conflicts_with = "url")
    )]
    #[cfg_attr(
        not(feature = "remote"),
        arg(short, long, default_value = "phasewatch.csv")
    )]
    file: PathBuf,

    /// Poll a CSV document from a URL (e.g. a spreadsheet export)
    #[cfg(feature = "remote")]
    #[arg(short, long)]
    url: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Refresh interval in milliseconds
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Initial node count (1-60)
    #[arg(short, long)]
    nodes: Option<u16>,

    /// Default high threshold for new nodes (°C)
    #[arg(long)]
    high: Option<f64>,

    /// Default over threshold for new nodes (°C)
    #[arg(long)]
    over: Option<f64>,

    /// Parse ambiguous dates day-first instead of month-first
    #[arg(long)]
    day_first: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = DashboardConfig::load(args.config.as_deref())?;
    if let Some(refresh) = args.refresh {
        config.refresh_ms = refresh;
    }
    if let Some(nodes) = args.nodes {
        config.node_count = nodes;
    }
    if let Some(high) = args.high {
        config.high = high;
    }
    if let Some(over) = args.over {
        config.over = over;
    }
    if args.day_first {
        config.date_order = data::DateOrder::DayFirst;
    }
    config.sanitize();

    let refresh = Duration::from_millis(config.refresh_ms);

    #[cfg(feature = "remote")]
    if let Some(ref url) = args.url {
        return run_with_url(url, config, refresh);
    }

    run_with_file(&args.file, config, refresh)
}

/// Run with a file-based row source
fn run_with_file(path: &PathBuf, config: DashboardConfig, refresh: Duration) -> Result<()> {
    let source = Box::new(CsvFileSource::new(path));
    run_tui(source, config, refresh)
}

/// Run with a remote CSV feed
#[cfg(feature = "remote")]
fn run_with_url(url: &str, config: DashboardConfig, refresh: Duration) -> Result<()> {
    let source = Box::new(source::HttpSource::spawn(url, refresh));
    run_tui(source, config, refresh)
}

/// Run the TUI with the given row source
fn run_tui(source: Box<dyn RowSource>, config: DashboardConfig, refresh: Duration) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Create app and load initial data
    let mut app = App::new(source, config);
    app.refresh();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, refresh);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// Vertically centered strip for the "terminal too small" notice.
fn size_notice_area(area: ratatui::layout::Rect) -> ratatui::layout::Rect {
    let y = (area.height / 2).saturating_sub(2);
    let height = 5.min(area.height.saturating_sub(y));
    ratatui::layout::Rect::new(0, y, area.width, height)
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 50;
    const MIN_HEIGHT: u16 = 10;

    while app.running {
        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                frame.render_widget(paragraph, size_notice_area(area));
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Min(6),    // Node grid
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::grid::render(frame, app, chunks[1]);
            ui::common::render_status_bar(frame, app, chunks[2]);

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => {
                    events::handle_key_event(app, key);
                    // Operator input takes effect immediately, without
                    // waiting for the next fetch tick.
                    app.apply_pending();
                }
                Event::Mouse(mouse) => {
                    events::handle_mouse_event(app, mouse);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Auto-refresh data periodically
        if last_refresh.elapsed() >= refresh_interval {
            app.refresh();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;

    #[test]
    fn test_size_notice_fits_tiny_terminals() {
        // Shorter than the notice itself must not underflow or overflow.
        for height in 0..12 {
            let area = Rect::new(0, 0, 40, height);
            let notice = size_notice_area(area);
            assert!(notice.y + notice.height <= height);
        }

        let notice = size_notice_area(Rect::new(0, 0, 40, 9));
        assert_eq!(notice.y, 2);
        assert_eq!(notice.height, 5);
    }
}
