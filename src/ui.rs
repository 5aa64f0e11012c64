//! Terminal control panel using ratatui.
//!
//! One screen: URL field, document list, question field, output pane. Each
//! action runs the full fetch → assemble → prompt chain synchronously and
//! repaints the output pane with the result.

use crate::actions;
use crate::config::Config;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::io;
use std::path::PathBuf;

const GREETING: &str = "Paste a URL and/or add documents (.pdf, .txt, .docx), \
then press Ctrl-S to summarise or type a question and press Ctrl-A.";

const HELP: &str =
    " Tab switch field | Enter add document / run | Ctrl-S summarise | Ctrl-A answer | Esc quit ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Url,
    Files,
    Question,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Url => Focus::Files,
            Focus::Files => Focus::Question,
            Focus::Question => Focus::Url,
        }
    }
}

struct Panel {
    url: String,
    file_input: String,
    files: Vec<PathBuf>,
    question: String,
    output: String,
    output_scroll: u16,
    focus: Focus,
}

impl Panel {
    fn new() -> Self {
        Self {
            url: String::new(),
            file_input: String::new(),
            files: Vec::new(),
            question: String::new(),
            output: GREETING.to_string(),
            output_scroll: 0,
            focus: Focus::Url,
        }
    }

    fn focused_buffer(&mut self) -> &mut String {
        match self.focus {
            Focus::Url => &mut self.url,
            Focus::Files => &mut self.file_input,
            Focus::Question => &mut self.question,
        }
    }

    fn add_file(&mut self) {
        let path = self.file_input.trim();
        if !path.is_empty() {
            self.files.push(PathBuf::from(path));
            self.file_input.clear();
        }
    }
}

/// Run the interactive panel until the user quits
pub async fn run(config: &Config) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_panel(&mut terminal, config).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

async fn run_panel(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &Config,
) -> Result<()> {
    let mut panel = Panel::new();

    loop {
        terminal.draw(|frame| draw(frame, &panel))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Esc => return Ok(()),
            KeyCode::Tab => panel.focus = panel.focus.next(),
            KeyCode::Up => panel.output_scroll = panel.output_scroll.saturating_sub(1),
            KeyCode::Down => panel.output_scroll = panel.output_scroll.saturating_add(1),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                show_working(terminal, &mut panel)?;
                panel.output = actions::on_summarize(&panel.url, &panel.files, config).await;
            }
            KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                show_working(terminal, &mut panel)?;
                panel.output =
                    actions::on_qa(&panel.url, &panel.files, &panel.question, config).await;
            }
            KeyCode::Enter => match panel.focus {
                Focus::Files => panel.add_file(),
                Focus::Url => {
                    show_working(terminal, &mut panel)?;
                    panel.output = actions::on_summarize(&panel.url, &panel.files, config).await;
                }
                Focus::Question => {
                    show_working(terminal, &mut panel)?;
                    panel.output =
                        actions::on_qa(&panel.url, &panel.files, &panel.question, config).await;
                }
            },
            KeyCode::Backspace => {
                let removed = panel.focused_buffer().pop();
                // An empty document field deletes the last added document
                if removed.is_none() && panel.focus == Focus::Files {
                    panel.files.pop();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                panel.focused_buffer().push(c);
            }
            _ => {}
        }
    }
}

/// Paint one frame with a progress message before a blocking request
fn show_working(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    panel: &mut Panel,
) -> Result<()> {
    panel.output = "Working…".to_string();
    panel.output_scroll = 0;
    terminal.draw(|frame| draw(frame, panel))?;
    Ok(())
}

fn draw(frame: &mut Frame, panel: &Panel) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(3), // url
            Constraint::Length(4), // documents
            Constraint::Length(3), // question
            Constraint::Min(3),    // output
            Constraint::Length(1), // help
        ])
        .split(frame.area());

    let title = Paragraph::new(Line::from(Span::styled(
        " SUMA - document & web summariser ",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, rows[0]);

    let url = Paragraph::new(panel.url.as_str()).block(titled_block(
        "URL",
        panel.focus == Focus::Url,
    ));
    frame.render_widget(url, rows[1]);

    let file_names: Vec<String> = panel
        .files
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    let documents = Paragraph::new(vec![
        Line::from(panel.file_input.as_str()),
        Line::from(Span::styled(
            file_names.join(", "),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(titled_block("Documents", panel.focus == Focus::Files));
    frame.render_widget(documents, rows[2]);

    let question = Paragraph::new(panel.question.as_str()).block(titled_block(
        "Question",
        panel.focus == Focus::Question,
    ));
    frame.render_widget(question, rows[3]);

    let output = Paragraph::new(panel.output.as_str())
        .wrap(Wrap { trim: false })
        .scroll((panel.output_scroll, 0))
        .block(titled_block("Output", false));
    frame.render_widget(output, rows[4]);

    let help = Paragraph::new(Span::styled(HELP, Style::default().fg(Color::DarkGray)));
    frame.render_widget(help, rows[5]);
}

fn titled_block(title: &str, focused: bool) -> Block<'_> {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style)
}
