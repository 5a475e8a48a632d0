mod fetcher;
mod terminal;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use fetcher::FsImageFetcher;
use log::{info, warn};
use markdown_viewer_config::Config;
use markdown_viewer_core::render::OutlineBackend;
use markdown_viewer_core::{MarkdownParser, ParseOptions, Refresh, RenderedDocument, Renderer};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    env, fs,
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
    sync::{
        Arc,
        mpsc::{self, Receiver, Sender},
    },
    time::{Duration, SystemTime},
};
use terminal::{LinkTarget, TerminalBackend, VisualId};

/// How long to wait for a key before checking the file and image loads.
const TICK: Duration = Duration::from_millis(250);

/// Settings shared by every document the app opens.
struct Settings {
    parser: MarkdownParser,
    images_enabled: bool,
    image_dir: Option<PathBuf>,
    activated: Sender<String>,
}

impl Settings {
    fn renderer(&self, document_dir: &Path) -> Renderer<TerminalBackend> {
        let activated = self.activated.clone();
        let mut renderer = Renderer::new(TerminalBackend::new())
            .with_parser(self.parser)
            .on_link_activated(move |url| {
                info!("link activated: {url}");
                let _ = activated.send(url.to_string());
            });
        if self.images_enabled {
            let base = self.image_dir.as_deref().unwrap_or(document_dir);
            renderer = renderer.with_image_fetcher(Arc::new(FsImageFetcher::new(base)));
        }
        renderer
    }
}

struct App {
    settings: Settings,
    activated: Receiver<String>,
    path: PathBuf,
    renderer: Renderer<TerminalBackend>,
    document: RenderedDocument<VisualId>,
    modified: Option<SystemTime>,
    history: Vec<PathBuf>,
    scroll: u16,
    selected_link: Option<usize>,
    status: String,
}

impl App {
    fn new(path: PathBuf, settings: Settings, activated: Receiver<String>) -> Result<Self> {
        let (renderer, document, modified) = Self::open(&settings, &path)?;
        Ok(Self {
            settings,
            activated,
            path,
            renderer,
            document,
            modified,
            history: vec![],
            scroll: 0,
            selected_link: None,
            status: String::new(),
        })
    }

    fn open(
        settings: &Settings,
        path: &Path,
    ) -> Result<(Renderer<TerminalBackend>, RenderedDocument<VisualId>, Option<SystemTime>)> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let dir = path.parent().unwrap_or(Path::new("."));
        let mut renderer = settings.renderer(dir);
        let document = renderer.render_document(&text)?;
        info!("opened {}", path.display());
        Ok((renderer, document, modified_time(path)))
    }

    fn navigate(&mut self, path: PathBuf) -> Result<()> {
        let (renderer, document, modified) = Self::open(&self.settings, &path)?;
        let previous = std::mem::replace(&mut self.path, path);
        self.history.push(previous);
        self.show(renderer, document, modified);
        Ok(())
    }

    fn back(&mut self) -> Result<()> {
        let Some(path) = self.history.pop() else {
            return Ok(());
        };
        let (renderer, document, modified) = Self::open(&self.settings, &path)?;
        self.path = path;
        self.show(renderer, document, modified);
        Ok(())
    }

    fn show(
        &mut self,
        renderer: Renderer<TerminalBackend>,
        document: RenderedDocument<VisualId>,
        modified: Option<SystemTime>,
    ) {
        self.renderer = renderer;
        self.document = document;
        self.modified = modified;
        self.scroll = 0;
        self.selected_link = None;
        self.status = String::new();
    }

    /// Re-reads the file and pushes the new content through the update path.
    fn reload(&mut self) -> Result<()> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let refresh = self.renderer.refresh(&mut self.document, &text)?;
        self.modified = modified_time(&self.path);
        if self.selected_link.is_some_and(|i| i >= self.links().len()) {
            self.selected_link = None;
        }
        self.status = match refresh {
            Refresh::InPlace => "Reloaded".to_string(),
            Refresh::Rebuilt => "Reloaded (layout changed)".to_string(),
        };
        Ok(())
    }

    fn reload_if_changed(&mut self) -> Result<()> {
        let modified = modified_time(&self.path);
        if modified.is_some() && modified != self.modified {
            info!("{} changed on disk", self.path.display());
            self.reload()?;
        }
        Ok(())
    }

    fn lines(&self) -> Vec<Line<'static>> {
        self.renderer.backend().lines(*self.document.root())
    }

    fn links(&self) -> Vec<LinkTarget> {
        self.renderer.backend().links(*self.document.root())
    }

    fn scroll_by(&mut self, delta: i32) {
        let max = self.lines().len().saturating_sub(1);
        let next = (i64::from(self.scroll) + i64::from(delta)).clamp(0, max as i64);
        self.scroll = u16::try_from(next).unwrap_or(u16::MAX);
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
            KeyCode::PageDown | KeyCode::Char(' ') => self.scroll_by(20),
            KeyCode::PageUp => self.scroll_by(-20),
            KeyCode::Tab => self.next_link(),
            KeyCode::Enter => self.activate_selected_link(),
            _ => {}
        }
    }

    fn next_link(&mut self) {
        let count = self.links().len();
        if count == 0 {
            self.status = "No links in this document".to_string();
            return;
        }
        self.selected_link = Some(match self.selected_link {
            Some(i) => (i + 1) % count,
            None => 0,
        });
    }

    fn activate_selected_link(&self) {
        let links = self.links();
        if let Some(link) = self.selected_link.and_then(|i| links.get(i)) {
            link.activate();
        }
    }

    /// Follows links activated since the last tick.
    fn follow_activated_links(&mut self) -> Result<()> {
        while let Ok(url) = self.activated.try_recv() {
            match local_document(&self.path, &url) {
                Some(target) => self.navigate(target)?,
                None => self.status = format!("Link: {url}"),
            }
        }
        Ok(())
    }

    fn title(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// A relative link to an existing Markdown file next to `current`.
fn local_document(current: &Path, url: &str) -> Option<PathBuf> {
    if url.contains("://") || url.starts_with('#') {
        return None;
    }
    let target = url.split('#').next().unwrap_or(url);
    if !target.ends_with(".md") {
        return None;
    }
    let path = current.parent().unwrap_or(Path::new(".")).join(target);
    path.is_file().then_some(path)
}

fn parse_options(config: &Config) -> ParseOptions {
    ParseOptions {
        tables: config.parser.tables,
        strikethrough: config.parser.strikethrough,
        footnotes: config.parser.footnotes,
        smart_punctuation: config.parser.smart_punctuation,
    }
}

/// `RUST_LOG` when set, otherwise the configured level. The TUI owns the
/// screen, so its log output goes to a file in the temp directory.
fn init_logging(config: &Config, to_file: bool) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    if env::var_os("RUST_LOG").is_none() {
        builder.parse_filters(&config.log_level);
    }
    if to_file {
        let log_path = env::temp_dir().join("markdown-viewer.log");
        let file = fs::File::create(&log_path)
            .with_context(|| format!("Failed to create log file {}", log_path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn dump(path: &Path, parser: MarkdownParser) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut renderer = Renderer::new(OutlineBackend::new()).with_parser(parser);
    let document = renderer.render_document(&text)?;
    print!("{}", renderer.backend().write(*document.root()));
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    View(PathBuf),
    Dump(PathBuf),
    WriteConfig,
}

/// Arguments after the program name.
fn parse_args(args: &[String]) -> Option<Command> {
    match args {
        [flag] if flag == "--write-config" => Some(Command::WriteConfig),
        [flag, path] if flag == "--dump" => Some(Command::Dump(PathBuf::from(path))),
        [path] if !path.starts_with('-') => Some(Command::View(PathBuf::from(path))),
        _ => None,
    }
}

/// Writes the settings in effect so they can be edited.
fn write_config(config: &Config, path: &Path) -> Result<()> {
    config.save_to_path(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "markdown-viewer".into());
    let rest: Vec<String> = args.collect();
    let Some(command) = parse_args(&rest) else {
        eprintln!("Usage: {program} [--dump] <file.md>");
        eprintln!("       {program} --write-config");
        process::exit(1);
    };

    let config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Fix or remove {}", Config::config_path().display());
            process::exit(1);
        }
    };
    let (dump_mode, path) = match command {
        Command::WriteConfig => return write_config(&config, &Config::config_path()),
        Command::Dump(path) => (true, path),
        Command::View(path) => (false, path),
    };
    init_logging(&config, !dump_mode)?;
    info!("markdown-viewer starting up");

    let parser = MarkdownParser::new(parse_options(&config));
    if dump_mode {
        return dump(&path, parser);
    }

    // Image loads run on this runtime while the UI loop stays synchronous.
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let (sender, activated) = mpsc::channel();
    let settings = Settings {
        parser,
        images_enabled: config.images.enabled,
        image_dir: config.images.base_dir.clone(),
        activated: sender,
    };
    let mut app = match App::new(path, settings, activated) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        warn!("exiting with error: {err:#}");
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Err(e) = app.follow_activated_links() {
            app.status = format!("{e:#}");
        }
        if !event::poll(TICK)? {
            if let Err(e) = app.reload_if_changed() {
                app.status = format!("{e:#}");
            }
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let result = match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Backspace => app.back(),
                KeyCode::Char('r') => app.reload(),
                code => {
                    app.handle_key(code);
                    Ok(())
                }
            };
            if let Err(e) = result {
                app.status = format!("{e:#}");
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0), Constraint::Length(2)].as_ref())
        .split(f.area());

    // Content panel
    let content = Paragraph::new(app.lines())
        .block(Block::default().borders(Borders::ALL).title(app.title()))
        .wrap(ratatui::widgets::Wrap { trim: false })
        .scroll((app.scroll, 0));

    f.render_widget(content, chunks[0]);

    let links = app.links();
    let status = match app.selected_link.and_then(|i| links.get(i)) {
        Some(link) => Line::from(vec![
            Span::styled("→ ", Style::default().fg(Color::Blue)),
            Span::raw(format!("{} <{}>", link.text, link.url)),
        ]),
        None => Line::raw(app.status.clone()),
    };
    let help_text = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k ↓/j: Scroll | "),
        Span::raw("Tab: Next link | Enter: Open link | "),
        Span::raw("Backspace: Back | r: Reload"),
    ]);

    let help = Paragraph::new(vec![status, help_text]).block(Block::default());
    f.render_widget(help, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn settings() -> (Settings, Receiver<String>) {
        let (sender, activated) = mpsc::channel();
        let settings = Settings {
            parser: MarkdownParser::default(),
            images_enabled: false,
            image_dir: None,
            activated: sender,
        };
        (settings, activated)
    }

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn parser_config_maps_onto_parse_options() {
        let mut config = Config::default();
        config.parser.tables = false;
        config.parser.footnotes = true;

        let options = parse_options(&config);

        assert_eq!(
            options,
            ParseOptions {
                tables: false,
                footnotes: true,
                ..ParseOptions::default()
            }
        );
    }

    #[test]
    fn local_markdown_links_resolve_next_to_document() {
        let dir = TempDir::new().unwrap();
        let current = dir.path().join("index.md");
        fs::write(dir.path().join("other.md"), "# other").unwrap();

        assert_eq!(
            local_document(&current, "other.md#section"),
            Some(dir.path().join("other.md"))
        );
        assert_eq!(local_document(&current, "missing.md"), None);
        assert_eq!(local_document(&current, "https://example.org/a.md"), None);
        assert_eq!(local_document(&current, "notes.txt"), None);
    }

    #[test]
    fn activating_a_local_link_opens_it_and_back_returns() {
        let dir = TempDir::new().unwrap();
        let index = dir.path().join("index.md");
        fs::write(&index, "# Index\n\nsee [next](next.md)\n").unwrap();
        fs::write(dir.path().join("next.md"), "# Next\n").unwrap();
        let (settings, activated) = settings();
        let mut app = App::new(index.clone(), settings, activated).unwrap();

        app.next_link();
        app.activate_selected_link();
        app.follow_activated_links().unwrap();

        assert_eq!(app.path, dir.path().join("next.md"));
        assert_eq!(plain(&app.lines()), vec!["Next", "════"]);

        app.back().unwrap();
        assert_eq!(app.path, index);
        assert_eq!(app.selected_link, None);
    }

    #[test]
    fn external_link_is_reported_in_status() {
        let dir = TempDir::new().unwrap();
        let index = dir.path().join("index.md");
        fs::write(&index, "[site](https://example.org)\n").unwrap();
        let (settings, activated) = settings();
        let mut app = App::new(index, settings, activated).unwrap();

        app.next_link();
        app.activate_selected_link();
        app.follow_activated_links().unwrap();

        assert_eq!(app.status, "Link: https://example.org");
    }

    #[test]
    fn reload_updates_the_rendered_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.md");
        fs::write(&path, "# One\n\nfirst\n").unwrap();
        let (settings, activated) = settings();
        let mut app = App::new(path.clone(), settings, activated).unwrap();

        fs::write(&path, "# One\n\nsecond\n").unwrap();
        app.reload().unwrap();
        assert_eq!(app.status, "Reloaded");
        assert_eq!(plain(&app.lines()), vec!["One", "═══", "", "second"]);

        fs::write(&path, "- a list now\n").unwrap();
        app.reload().unwrap();
        assert_eq!(app.status, "Reloaded (layout changed)");
    }

    #[test]
    fn scrolling_stays_within_the_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.md");
        fs::write(&path, "a\n\nb\n").unwrap();
        let (settings, activated) = settings();
        let mut app = App::new(path, settings, activated).unwrap();

        app.scroll_by(-5);
        assert_eq!(app.scroll, 0);
        app.scroll_by(50);
        assert_eq!(app.scroll, 2);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let (settings, activated) = settings();
        let err = App::new(dir.path().join("nope.md"), settings, activated)
            .err()
            .unwrap();
        assert!(err.to_string().contains("nope.md"));
    }

    #[test]
    fn command_line_forms() {
        let args = |list: &[&str]| list.iter().map(|a| a.to_string()).collect::<Vec<_>>();

        assert_eq!(
            parse_args(&args(&["notes.md"])),
            Some(Command::View(PathBuf::from("notes.md")))
        );
        assert_eq!(
            parse_args(&args(&["--dump", "notes.md"])),
            Some(Command::Dump(PathBuf::from("notes.md")))
        );
        assert_eq!(parse_args(&args(&["--write-config"])), Some(Command::WriteConfig));
        assert_eq!(parse_args(&args(&[])), None);
        assert_eq!(parse_args(&args(&["--verbose"])), None);
    }

    #[test]
    fn written_config_loads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("markdown-viewer").join("config.toml");
        let mut config = Config::default();
        config.images.enabled = false;

        write_config(&config, &path).unwrap();

        assert_eq!(Config::load_from_path(&path).unwrap(), Some(config));
    }
}
