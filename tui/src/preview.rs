use std::io;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use deckgen_common::NormalizedOutline;

pub struct SlidePreview {
    slides: Vec<String>,
    current_slide: usize,
    running: bool,
    accepted: bool,
}

impl SlidePreview {
    pub fn new(slides: Vec<String>) -> Self {
        Self {
            slides,
            current_slide: 0,
            running: true,
            accepted: false,
        }
    }

    pub fn from_outline(outline: &NormalizedOutline) -> Self {
        Self::new(outline.iter().map(slide_text).collect())
    }

    /// Browse the planned slides; returns true when the user accepts the
    /// deck for writing.
    pub fn run(&mut self) -> Result<bool> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        while self.running {
            terminal.draw(|f| self.draw(f))?;

            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        self.running = false;
                    }
                    KeyCode::Enter | KeyCode::Char('w') => {
                        self.accepted = true;
                        self.running = false;
                    }
                    KeyCode::Left | KeyCode::Char('h') => {
                        self.previous_slide();
                    }
                    KeyCode::Right | KeyCode::Char('l') => {
                        self.next_slide();
                    }
                    _ => {}
                }
            }
        }

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(self.accepted)
    }

    fn draw(&self, f: &mut Frame) {
        let size = f.area();

        let default_content = "No slide content".to_string();
        let current_content = self
            .slides
            .get(self.current_slide)
            .unwrap_or(&default_content);

        let title = format!(
            "Outline Preview ({}/{}) - Enter: save, q: discard",
            self.current_slide + 1,
            self.slides.len()
        );

        let block = Block::default().title(title).borders(Borders::ALL);

        let paragraph = Paragraph::new(current_content.as_str())
            .block(block)
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, size);
    }

    fn next_slide(&mut self) {
        if self.current_slide < self.slides.len().saturating_sub(1) {
            self.current_slide += 1;
        }
    }

    fn previous_slide(&mut self) {
        if self.current_slide > 0 {
            self.current_slide -= 1;
        }
    }
}

fn slide_text(slide: &deckgen_common::NormalizedSlide) -> String {
    let mut text = format!("{}\n\n", slide.title);
    if !slide.summary.is_empty() {
        text.push_str(&format!("{}\n\n", slide.summary));
    }
    for (i, point) in slide.points.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, point.heading));
        for fact in &point.facts {
            text.push_str(&format!("   - {}\n", fact.rendered()));
        }
    }
    text
}
