use std::io;
use std::path::Path;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use tracing::info;

use deckgen_common::{Config, Style};
use deckgen_core::{format_content, write_outline, ContentPlanner};
use deckgen_outline::OutlineClient;

use crate::preview::SlidePreview;

const MAX_PAGES: usize = 20;
const DEFAULT_OUTPUT: &str = "presentation.pptx";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Topic,
    Pages,
    Style,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::Topic => Field::Pages,
            Field::Pages => Field::Style,
            Field::Style => Field::Topic,
        }
    }
}

struct FormResult {
    topic: String,
    num_pages: usize,
    style: Style,
}

pub struct InteractiveApp {
    running: bool,
    submitted: bool,
    focus: Field,
    topic: String,
    pages: String,
    style: String,
    error: Option<String>,
}

impl Default for InteractiveApp {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractiveApp {
    pub fn new() -> Self {
        Self {
            running: true,
            submitted: false,
            focus: Field::Topic,
            topic: String::new(),
            pages: "5".to_string(),
            style: "default".to_string(),
            error: None,
        }
    }

    /// Run the form until the user submits or quits.
    fn collect(&mut self) -> Result<Option<FormResult>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        while self.running {
            terminal.draw(|f| self.draw(f))?;

            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Esc => {
                        self.running = false;
                    }
                    KeyCode::Tab | KeyCode::Down => {
                        self.focus = self.focus.next();
                    }
                    KeyCode::Enter => {
                        if self.validate() {
                            self.submitted = true;
                            self.running = false;
                        }
                    }
                    KeyCode::Char(c) => {
                        self.active_field_mut().push(c);
                        self.error = None;
                    }
                    KeyCode::Backspace => {
                        self.active_field_mut().pop();
                        self.error = None;
                    }
                    _ => {}
                }
            }
        }

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        if !self.submitted {
            return Ok(None);
        }
        let num_pages = self.pages.trim().parse().unwrap_or(5);
        Ok(Some(FormResult {
            topic: self.topic.trim().to_string(),
            num_pages,
            style: Style::parse_lenient(&self.style),
        }))
    }

    fn validate(&mut self) -> bool {
        if self.topic.trim().is_empty() {
            self.error = Some("Topic must not be empty".to_string());
            return false;
        }
        match self.pages.trim().parse::<usize>() {
            Ok(n) if (1..=MAX_PAGES).contains(&n) => true,
            _ => {
                self.error = Some(format!("Pages must be a number between 1 and {MAX_PAGES}"));
                false
            }
        }
    }

    fn active_field_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Topic => &mut self.topic,
            Field::Pages => &mut self.pages,
            Field::Style => &mut self.style,
        }
    }

    fn draw(&self, f: &mut Frame) {
        let size = f.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(2),
            ])
            .split(size);

        self.draw_field(f, chunks[0], Field::Topic, "Topic", &self.topic);
        self.draw_field(f, chunks[1], Field::Pages, "Pages (1-20)", &self.pages);
        self.draw_field(
            f,
            chunks[2],
            Field::Style,
            "Style (default | minimal | business)",
            &self.style,
        );

        let help = match &self.error {
            Some(message) => format!("Error: {message}"),
            None => "Tab: next field  Enter: generate  Esc: quit".to_string(),
        };
        let footer = Paragraph::new(help).block(Block::default().borders(Borders::ALL));
        f.render_widget(footer, chunks[3]);
    }

    fn draw_field(&self, f: &mut Frame, area: Rect, field: Field, title: &str, value: &str) {
        let marker = if self.focus == field { "> " } else { "  " };
        let paragraph = Paragraph::new(format!("{marker}{value}"))
            .block(Block::default().title(title).borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }
}

pub async fn run_interactive(config: Config) -> Result<()> {
    let mut form = InteractiveApp::new();
    let Some(request) = form.collect()? else {
        return Ok(());
    };

    info!(topic = %request.topic, pages = request.num_pages, "planning outline");
    println!("Generating outline for \"{}\"...", request.topic);

    let planner = ContentPlanner::new(OutlineClient::new(&config));
    let outline = planner
        .plan_content(&request.topic, request.num_pages)
        .await;
    let normalized = format_content(&outline);

    let mut preview = SlidePreview::from_outline(&normalized);
    if !preview.run()? {
        println!("Discarded.");
        return Ok(());
    }

    let path = write_outline(
        &outline,
        request.style,
        None,
        Path::new(DEFAULT_OUTPUT),
    )?;
    println!("Presentation saved to: {}", path.display());
    Ok(())
}
