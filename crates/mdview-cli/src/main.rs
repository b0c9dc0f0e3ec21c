mod args;
mod plain;
mod render;
mod viewport;

use anyhow::{Context, Result};
use args::{Args, Mode};
use clap::{CommandFactory, Parser};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use mdview_config::Config;
use mdview_syntax::{ParseOptions, Token, parse};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};
use render::RenderedDocument;
use std::{
    fs::File,
    io::{self, BufReader, Stdout, Write, stdout},
    ops::ControlFlow,
    path::{Path, PathBuf},
    process,
};
use viewport::Viewport;

struct App {
    path: PathBuf,
    mode: Mode,
    config: Config,
    /// Width forced on the command line; otherwise the terminal decides.
    fixed_width: Option<usize>,
    document: RenderedDocument,
    viewport: Viewport,
}

impl App {
    fn new(path: PathBuf, mode: Mode, config: Config, fixed_width: Option<usize>) -> Self {
        Self {
            path,
            mode,
            config,
            fixed_width,
            document: RenderedDocument::default(),
            viewport: Viewport::new(0, 0),
        }
    }

    /// Re-parses the document for a terminal of `columns` x `rows`.
    fn layout(&mut self, columns: u16, rows: u16) -> Result<()> {
        // One column for the scroll bar, one row for the status line.
        let width = self
            .fixed_width
            .unwrap_or_else(|| usize::from(columns.saturating_sub(1)).max(1));
        let height = usize::from(rows.saturating_sub(1));

        self.document = match self.mode {
            Mode::Plain => {
                let bytes = std::fs::read(&self.path)
                    .with_context(|| format!("Failed to read {}", self.path.display()))?;
                let text = String::from_utf8_lossy(&bytes);
                RenderedDocument::from_plain(plain::wrap_text(&text, width))
            }
            _ => {
                let options = self.config.parse_options(Some(width));
                RenderedDocument::parse(open(&self.path)?, &options)
                    .with_context(|| format!("Failed to parse {}", self.path.display()))?
            }
        };
        log::debug!(
            "{} lines ({} from the document) at width {width}",
            self.document.lines().len(),
            self.document.parsed_lines()
        );

        self.viewport.resize(self.document.lines().len(), height);
        Ok(())
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let mode = args.mode();

    let config = load_config(&args);
    let Some(path) = args.file.clone().or_else(|| config.document.clone()) else {
        eprintln!("Error: No document given and no default document configured");
        eprintln!("{}", Args::command().render_usage());
        eprintln!(
            "Or set `document` in {}",
            args.config.clone().unwrap_or_else(Config::config_path).display()
        );
        process::exit(1);
    };
    log::info!("Viewing {} ({mode:?})", path.display());

    if mode == Mode::Tokens {
        let options = config.parse_options(args.width);
        return dump_tokens(&path, &options);
    }

    run_viewer(App::new(path, mode, config, args.width))
}

fn load_config(args: &Args) -> Config {
    let loaded = match &args.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    match loaded {
        Ok(Some(config)) => config,
        Ok(None) => {
            if let Some(path) = &args.config {
                log::warn!("Config file {} not found, using defaults", path.display());
            }
            Config::default()
        }
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    }
}

/// Prints one token per line followed by the display line count.
fn dump_tokens(path: &Path, options: &ParseOptions) -> Result<()> {
    let mut out = stdout().lock();
    let lines = parse(open(path)?, options, |token: Token| {
        match writeln!(out, "{token}") {
            Ok(()) => ControlFlow::Continue(()),
            Err(_) => ControlFlow::Break(()),
        }
    })
    .with_context(|| format!("Failed to parse {}", path.display()))?;
    writeln!(out, "lines: {lines}")?;
    Ok(())
}

fn run_viewer(mut app: App) -> Result<()> {
    let (columns, rows) = crossterm::terminal::size()?;
    app.layout(columns, rows)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let view = &mut app.viewport;
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => {
                        view.scroll(-1);
                    }
                    KeyCode::Down | KeyCode::Right | KeyCode::Char('j') => {
                        view.scroll(1);
                    }
                    KeyCode::PageUp => {
                        view.page_up();
                    }
                    KeyCode::PageDown | KeyCode::Char(' ') => {
                        view.page_down();
                    }
                    KeyCode::Home => {
                        view.jump_to_begin();
                    }
                    KeyCode::End => {
                        view.jump_to_end();
                    }
                    _ => {}
                }
            }
            Event::Resize(columns, rows) => app.layout(columns, rows)?,
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(chunks[0]);

    let visible = app.document.lines()[app.viewport.visible()].to_vec();
    f.render_widget(Paragraph::new(visible), content[0]);

    let mut scroll_state =
        ScrollbarState::new(app.viewport.max_offset() + 1).position(app.viewport.offset());
    f.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight),
        content[1],
        &mut scroll_state,
    );

    let name = app
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let status = Line::from(vec![
        Span::styled(
            format!(" {name} "),
            Style::default().bg(Color::Blue).fg(Color::White),
        ),
        Span::raw(format!(
            " {}/{} | q: Quit | ↑/↓: Scroll | PgUp/PgDn: Page | Home/End",
            app.viewport.offset() + 1,
            app.viewport.lines().max(1),
        )),
    ]);
    f.render_widget(Paragraph::new(status), chunks[1]);
}
