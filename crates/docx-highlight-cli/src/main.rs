use anyhow::{Context, Result, bail};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use docx_highlight_config::{Config, NoiseConfig};
use docx_highlight_engine::indexing::noise::{CJK_PUNCTUATION, LATIN_PUNCTUATION, SEPARATORS};
use docx_highlight_engine::{
    Document, FragmentLocation, HighlightColor, IndexRow, NoiseFilter, RangeRequest,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::{
    env,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};

const USAGE: &str = "Usage: docx-highlight-cli <document.json> [--range S:E]... [--color NAME] \
                     [--filter-noise] [--output PATH] [--config PATH]";

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    document: PathBuf,
    ranges: Vec<RangeRequest>,
    color: Option<HighlightColor>,
    filter_noise: bool,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs> {
    let mut args = args.into_iter();
    let mut parsed = CliArgs::default();
    let mut document = None;

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .with_context(|| format!("{flag} expects a value"))
        };
        match arg.as_str() {
            "--range" => parsed.ranges.push(parse_range(&value("--range")?)?),
            "--color" => parsed.color = Some(value("--color")?.parse()?),
            "--filter-noise" => parsed.filter_noise = true,
            "--output" => parsed.output = Some(PathBuf::from(value("--output")?)),
            "--config" => parsed.config = Some(PathBuf::from(value("--config")?)),
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ if document.is_some() => bail!("unexpected argument {arg}"),
            _ => document = Some(PathBuf::from(&arg)),
        }
    }

    parsed.document = document.context("no document given")?;
    Ok(parsed)
}

/// `S:E`, 0-based and inclusive. Either side may be left empty, which makes
/// the range a no-op.
fn parse_range(text: &str) -> Result<RangeRequest> {
    let (start, end) = text
        .split_once(':')
        .with_context(|| format!("range {text:?} is not of the form START:END"))?;
    let endpoint = |s: &str| -> Result<Option<usize>> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(None);
        }
        s.parse()
            .map(Some)
            .with_context(|| format!("invalid range endpoint {s:?}"))
    };
    Ok(RangeRequest {
        start: endpoint(start)?,
        end: endpoint(end)?,
    })
}

fn noise_filter(config: Option<&NoiseConfig>) -> NoiseFilter {
    let Some(config) = config else {
        return NoiseFilter::default();
    };
    let latin = config
        .latin_punctuation
        .as_deref()
        .unwrap_or(LATIN_PUNCTUATION);
    let cjk = config.cjk_punctuation.as_deref().unwrap_or(CJK_PUNCTUATION);
    let separators = config
        .separators
        .clone()
        .unwrap_or_else(|| SEPARATORS.to_vec());
    NoiseFilter::from_parts([latin, cjk], separators)
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let loaded = match path {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    Ok(loaded.unwrap_or_default())
}

fn highlight(args: &CliArgs, config: &Config, mut document: Document) -> Result<()> {
    let color = match args.color {
        Some(color) => color,
        None => config.default_color.parse()?,
    };
    let filter_noise = args.filter_noise || config.filter_noise;

    let patch = document.highlight(args.ranges.iter().copied(), color, filter_noise)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.output_path_for(&args.document));
    document.save(&output)?;

    log::info!(
        "highlighted {} range(s) in {color}, split {} run(s), skipped {}; wrote {}",
        patch.changed.len(),
        patch.runs_split,
        patch.skipped,
        output.display()
    );
    Ok(())
}

struct App {
    path: PathBuf,
    document: Document,
    filtered: bool,
    lines: Vec<String>,
    details: Vec<Vec<String>>,
    list_state: ListState,
}

impl App {
    fn new(path: PathBuf, document: Document) -> Result<Self> {
        let mut app = Self {
            path,
            document,
            filtered: false,
            lines: Vec::new(),
            details: Vec::new(),
            list_state: ListState::default(),
        };
        app.refresh()?;
        Ok(app)
    }

    fn refresh(&mut self) -> Result<()> {
        let rows = self.document.position_index()?.rows().to_vec();
        let (lines, details): (Vec<String>, Vec<Vec<String>>) = if self.filtered {
            self.document
                .filtered_fragments()?
                .into_iter()
                .map(|f| {
                    let row = &rows[f.source_row];
                    (
                        format!("{:>6}  {:?}", f.source_row, f.text),
                        self.describe_row(f.source_row, row),
                    )
                })
                .unzip()
        } else {
            rows.iter()
                .enumerate()
                .map(|(i, row)| {
                    (
                        format!(
                            "{:>6}  [{}..{}] {:?}",
                            i,
                            row.first_num,
                            row.last_num,
                            row.string()
                        ),
                        self.describe_row(i, row),
                    )
                })
                .unzip()
        };
        self.lines = lines;
        self.details = details;
        self.list_state
            .select(if self.lines.is_empty() { None } else { Some(0) });
        Ok(())
    }

    fn describe_row(&self, index: usize, row: &IndexRow) -> Vec<String> {
        let fragment = &row.fragment;
        let location = match fragment.location {
            FragmentLocation::Paragraph { paragraph_id } => format!("paragraph {paragraph_id}"),
            FragmentLocation::TableCell {
                table_id,
                row_id,
                cell_id,
                paragraph_id,
            } => format!(
                "table {table_id}, row {row_id}, cell {cell_id}, paragraph {paragraph_id}"
            ),
        };
        let mut details = vec![
            format!("Row:       {index}"),
            format!("Block:     {}", fragment.block_id),
            format!("Location:  {location}"),
            format!("Run:       {}", fragment.run_id),
            format!(
                "Bounds:    {}..{} ({} chars)",
                row.first_num, row.last_num, row.len_string
            ),
            String::new(),
            format!("{:?}", row.string()),
        ];
        if let Some(run) = self.document.run_at(fragment) {
            details.push(String::new());
            details.push(format!(
                "Highlight: {}",
                run.highlight.map_or("none".to_string(), |c| c.to_string())
            ));
            if let Some(style) = &run.style {
                details.push(format!("Style:     {style}"));
            }
            if let Some(break_type) = run.break_type {
                details.push(format!("Break:     {break_type:?}"));
            }
        }
        details
    }

    fn toggle_filtered(&mut self) -> Result<()> {
        self.filtered = !self.filtered;
        self.refresh()
    }

    fn next_row(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1) % self.lines.len(),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn previous_row(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => self.lines.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    let config = load_config(args.config.as_ref())?;
    let document = Document::open(&args.document)
        .with_context(|| format!("failed to open {}", args.document.display()))?
        .with_noise_filter(noise_filter(config.noise.as_ref()));

    if !args.ranges.is_empty() {
        return highlight(&args, &config, document);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = App::new(args.document.clone(), document)
        .and_then(|mut app| run_app(&mut terminal, &mut app));

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_row(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_row(),
                KeyCode::Char('f') => app.toggle_filtered()?,
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)].as_ref())
        .split(rows[0]);

    let title = format!(
        "{} ({})",
        app.path.display(),
        if app.filtered { "filtered" } else { "raw" }
    );
    let items: Vec<ListItem> = app
        .lines
        .iter()
        .map(|line| ListItem::new(vec![Line::from(vec![Span::raw(line.clone())])]))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));
    f.render_stateful_widget(list, chunks[0], &mut app.list_state);

    let details: Vec<Line> = match app.list_state.selected().and_then(|i| app.details.get(i)) {
        Some(details) => details.iter().map(|l| Line::from(l.clone())).collect(),
        None => vec![Line::from("The document has no runs")],
    };
    let content = Paragraph::new(details)
        .block(Block::default().borders(Borders::ALL).title("Fragment"))
        .wrap(ratatui::widgets::Wrap { trim: false });
    f.render_widget(content, chunks[1]);

    let help_text = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k: Previous | "),
        Span::raw("↓/j: Next | "),
        Span::raw("f: Toggle filtered view"),
    ]);
    f.render_widget(Paragraph::new(vec![help_text]).block(Block::default()), rows[1]);
}
