use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Terminal,
};
use std::io::{self, Write};
use tokio::time::{interval, Duration, Instant, MissedTickBehavior};

use crate::cli::TraceArgs;
use crate::config::ProgressBarConfig;
use crate::error::ProgressError;
use crate::ui::geometry::Size;
use crate::ui::host::{ContainerId, HostWindow};
use crate::ui::linear_bar::LinearBar;
use crate::ui::progress_indicator::{IndicatorEvent, ProgressIndicator};

const HELP_HEIGHT: u16 = 3;
const MODAL_HEIGHT: u16 = 5;

/// Interactive terminal host for a single progress indicator
pub struct App {
    should_quit: bool,
    config: ProgressBarConfig,
    host: HostWindow,
    indicator: ProgressIndicator,
    modal: Option<ContainerId>,
    status: String,
}

impl App {
    pub fn new(config: ProgressBarConfig) -> Self {
        Self {
            should_quit: false,
            indicator: ProgressIndicator::with_config(config.clone()),
            config,
            host: HostWindow::new(Size::ZERO),
            modal: None,
            status: "Idle".to_string(),
        }
    }

    pub fn indicator(&self) -> &ProgressIndicator {
        &self.indicator
    }

    pub fn host(&self) -> &HostWindow {
        &self.host
    }

    pub fn modal(&self) -> Option<ContainerId> {
        self.modal
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub async fn run(&mut self) -> Result<()> {
        // Check if we're running in a proper terminal
        if !io::stdout().is_tty() {
            return Err(ProgressError::terminal(
                "linear-progress demo requires a terminal (TTY); try the `trace` command instead",
            )
            .into());
        }

        // Setup terminal
        enable_raw_mode()
            .map_err(|e| anyhow::anyhow!("Failed to enable raw mode: {}", e))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)
            .map_err(|e| anyhow::anyhow!("Failed to setup terminal: {}", e))?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)
            .map_err(|e| anyhow::anyhow!("Failed to create terminal: {}", e))?;

        // Run the main loop
        let result = self.run_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn run_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let mut ticker = interval(self.config.tick_rate);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_tick = Instant::now();

        loop {
            ticker.tick().await;
            let now = Instant::now();
            let elapsed = now.duration_since(last_tick);
            last_tick = now;

            self.resize(terminal.size()?);
            for event in self.indicator.tick(elapsed) {
                self.record(event);
            }

            terminal.draw(|f| {
                let area = f.size();
                self.render(area, f.buffer_mut());
            })?;

            while event::poll(Duration::ZERO)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    /// Apply a key press
    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('s') => {
                tracing::info!("Start requested");
                self.indicator.start(&mut self.host, None);
            }
            KeyCode::Char('x') => {
                tracing::info!("Stop requested");
                self.indicator.stop(None);
            }
            KeyCode::Char('c') => {
                tracing::info!("Stop after completion requested");
                self.indicator.stop_after_completion();
            }
            KeyCode::Char('m') => self.toggle_modal(),
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
        self.status = format!("{:?}", self.indicator.state());
    }

    /// Present a modal container, or dismiss the one that is showing
    pub fn toggle_modal(&mut self) {
        match self.modal.take() {
            Some(_) => {
                self.host.dismiss_top();
            }
            None => {
                let size = self
                    .host
                    .root()
                    .map(|root| modal_size(root.size))
                    .unwrap_or(Size::ZERO);
                self.modal = Some(self.host.present(size));
            }
        }
        self.indicator.layout_in(&self.host);
    }

    /// Propagate the terminal size into the host and lay the indicator out
    pub fn resize(&mut self, area: Rect) {
        let root = root_area(area);
        let root_size = Size::new(root.width as f64, root.height as f64);
        if let Some(root) = self.host.root_id() {
            self.host.resize(root, root_size);
        }
        if let Some(modal) = self.modal {
            self.host.resize(modal, modal_size(root_size));
        }
        self.indicator.layout_in(&self.host);
    }

    fn record(&mut self, event: IndicatorEvent) {
        tracing::debug!("Indicator event: {:?}", event);
        self.status = match event {
            IndicatorEvent::Attached(container) => format!("Attached to {}", container),
            IndicatorEvent::GrowCompleted => "Sweeping".to_string(),
            IndicatorEvent::SweepIterationCompleted { iteration } => {
                format!("Sweeping (iteration {})", iteration)
            }
            IndicatorEvent::ShrinkCompleted => "Idle".to_string(),
        };
    }

    pub fn render(&self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        use ratatui::widgets::Widget;

        let main = main_area(area);
        let root = root_area(area);
        let footer = Rect::new(area.x, main.y + main.height, area.width, area.height - main.height);

        Block::default()
            .borders(Borders::ALL)
            .title("linear-progress")
            .render(main, buf);

        let mut modal_area = None;
        if self.modal.is_some() {
            let outer = centered(root, MODAL_HEIGHT);
            Clear.render(outer, buf);
            let block = Block::default().borders(Borders::ALL).title("modal");
            modal_area = Some(block.inner(outer));
            block.render(outer, buf);
        }

        let target = match self.indicator.attached_container() {
            Some(id) if Some(id) == self.modal => modal_area,
            Some(id) if Some(id) == self.host.root_id() => Some(root),
            _ => None,
        };
        if let Some(target) = target {
            LinearBar::new(&self.indicator).render(target, buf);
        }

        let help = Line::from(vec![
            Span::styled("s", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" start  "),
            Span::styled("x", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" stop  "),
            Span::styled("c", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" stop after sweep  "),
            Span::styled("m", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" modal  "),
            Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" quit"),
        ]);
        let status = Line::from(Span::styled(
            self.status.clone(),
            Style::default().fg(Color::DarkGray),
        ));
        Paragraph::new(vec![help, status])
            .block(Block::default().borders(Borders::TOP))
            .render(footer, buf);
    }
}

fn main_area(area: Rect) -> Rect {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(HELP_HEIGHT)])
        .split(area)[0]
}

/// Area of the root container: inside the main block's border
fn root_area(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(main_area(area))
}

fn centered(area: Rect, height: u16) -> Rect {
    let width = (u32::from(area.width) * 3 / 5) as u16;
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Inner size of the modal for a given root size
fn modal_size(root: Size) -> Size {
    let outer = centered(
        Rect::new(0, 0, root.width as u16, root.height as u16),
        MODAL_HEIGHT,
    );
    Size::new(
        outer.width.saturating_sub(2) as f64,
        outer.height.saturating_sub(2) as f64,
    )
}

/// Runs an indicator against a fixed container and writes one line per tick
pub struct TraceRunner {
    config: ProgressBarConfig,
    args: TraceArgs,
}

impl TraceRunner {
    pub fn new(config: ProgressBarConfig, args: TraceArgs) -> Self {
        Self { config, args }
    }

    pub fn run(&mut self, out: &mut impl Write) -> Result<()> {
        let mut host = HostWindow::new(Size::new(self.args.width, self.args.height));
        let mut indicator = ProgressIndicator::with_config(self.config.clone());
        let step = Duration::from_millis(self.args.step_ms);

        indicator.start(&mut host, None);
        writeln!(out, "{:>5} {:>8}  {:<12} {:<24} {:<34} events", "tick", "ms", "state", "bar", "fill")?;

        for tick in 1..=self.args.steps {
            if self.args.stop_at == Some(tick) {
                indicator.stop(None);
            }
            if self.args.stop_after_completion_at == Some(tick) {
                indicator.stop_after_completion();
            }

            let events = indicator.tick(step);
            let bar = indicator.frame();
            let fill = indicator.fill_frame();
            writeln!(
                out,
                "{:>5} {:>8}  {:<12} {:<24} {:<34} {}",
                tick,
                tick as u64 * self.args.step_ms,
                format!("{:?}", indicator.state()),
                format!("{:.2}x{:.2}", bar.width, bar.height),
                format!("({:.2},{:.2}) {:.2}x{:.2}", fill.x, fill.y, fill.width, fill.height),
                events
                    .iter()
                    .map(|event| format!("{:?}", event))
                    .collect::<Vec<_>>()
                    .join(", "),
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::progress_indicator::IndicatorState;

    fn trace_args(steps: u32) -> TraceArgs {
        TraceArgs {
            steps,
            step_ms: 100,
            width: 40.0,
            height: 10.0,
            stop_at: None,
            stop_after_completion_at: None,
        }
    }

    #[test]
    fn test_keys_drive_indicator() {
        let mut app = App::new(ProgressBarConfig::default());
        app.resize(Rect::new(0, 0, 80, 24));

        app.handle_key(KeyCode::Char('s'));
        assert!(app.indicator().is_running());
        assert_eq!(app.indicator().attached_container(), app.host().root_id());
        assert_eq!(app.indicator().bar_width(), 78.0);

        app.handle_key(KeyCode::Char('x'));
        assert_eq!(app.indicator().state(), IndicatorState::ShrinkingOut);

        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_dismissing_modal_detaches_indicator() {
        let mut app = App::new(ProgressBarConfig::default());
        app.resize(Rect::new(0, 0, 80, 24));
        app.handle_key(KeyCode::Char('m'));
        let modal = app.modal().unwrap();

        app.handle_key(KeyCode::Char('s'));
        assert_eq!(app.indicator().attached_container(), Some(modal));

        app.handle_key(KeyCode::Char('m'));
        assert!(app.modal().is_none());
        assert!(app.indicator().attached_container().is_none());
    }

    #[test]
    fn test_render_does_not_panic_on_small_area() {
        let mut app = App::new(ProgressBarConfig::default());
        let area = Rect::new(0, 0, 10, 4);
        app.resize(area);
        app.handle_key(KeyCode::Char('m'));
        app.handle_key(KeyCode::Char('s'));
        let mut buf = ratatui::buffer::Buffer::empty(area);
        app.render(area, &mut buf);
    }

    #[test]
    fn test_modal_fits_very_wide_terminals() {
        let area = Rect {
            x: 0,
            y: 0,
            width: u16::MAX,
            height: 1,
        };
        let modal = centered(area, MODAL_HEIGHT);
        assert_eq!(modal.width, 39321);
        assert_eq!(modal.height, 1);
        assert!(modal.x + modal.width <= area.width);
    }

    #[test]
    fn test_trace_runs_to_idle() {
        let mut args = trace_args(20);
        args.stop_at = Some(10);
        let mut runner = TraceRunner::new(ProgressBarConfig::default(), args);
        let mut out = Vec::new();
        runner.run(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 21);
        assert!(lines[5].contains("GrowCompleted"));
        assert!(lines[14].contains("ShrinkCompleted"));
        assert!(lines[20].contains("Idle"));
    }
}
