use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use crate::catalog::Catalog;
use crate::controller::Controller;
use crate::ratings::MAX_RATING;
use crate::surface::TermSurface;
use crate::ui::draw_ui;

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};

pub enum Mode {
    PickingPage,
    Browsing,
}

pub struct App {
    pub mode: Mode,
    pub selected_page: usize,
    pub scroll_offset: usize,
    /// Highlighted entry in the grid, an id into the surface's render.
    pub selected_entry: Option<usize>,
    pub controller: Controller,
    pub surface: TermSurface,
    pub out_path: PathBuf,
    pub status: Option<String>,
}

impl App {
    pub fn new(catalog: Catalog, out_path: PathBuf) -> Self {
        let mut controller = Controller::new(catalog);
        let mut surface = TermSurface::new();
        if controller.page_count() > 0 {
            controller.select_page(0, &mut surface);
        }
        App {
            mode: Mode::PickingPage,
            selected_page: 0,
            scroll_offset: 0,
            selected_entry: None,
            controller,
            surface,
            out_path,
            status: None,
        }
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = ratatui::backend::CrosstermBackend::new(stdout);
        let mut terminal = ratatui::Terminal::new(backend)?;

        loop {
            terminal.draw(|f| draw_ui(f, self))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        if self.handle_key(key.code)? {
                            break;
                        }
                    }
                }
            }
        }

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> anyhow::Result<bool> {
        let page_count = self.controller.page_count();
        match self.mode {
            Mode::PickingPage => match code {
                KeyCode::Char('q') => return Ok(true), // quit
                // the pages pane keeps scroll_offset in step with the
                // selection when it draws
                KeyCode::Down | KeyCode::Char('j') if page_count > 0 => {
                    self.selected_page = (self.selected_page + 1) % page_count;
                }
                KeyCode::Up | KeyCode::Char('k') if page_count > 0 => {
                    self.selected_page = (self.selected_page + page_count - 1) % page_count;
                }
                KeyCode::Enter if page_count > 0 => {
                    self.controller
                        .select_page(self.selected_page, &mut self.surface);
                    self.selected_entry = None;
                    self.mode = Mode::Browsing;
                }
                KeyCode::Char('e') => self.export()?,
                _ => {}
            },
            Mode::Browsing => match code {
                KeyCode::Esc => self.mode = Mode::PickingPage,
                KeyCode::Tab | KeyCode::Right => self.click_next(1),
                KeyCode::BackTab | KeyCode::Left => self.click_next(-1),
                KeyCode::Up => self.nudge_rating(1),
                KeyCode::Down => self.nudge_rating(-1),
                KeyCode::Char(c @ '0'..='9') => {
                    let value = c as u8 - b'0';
                    self.controller.slider_input(value, &mut self.surface);
                }
                // the slider goes one past the digit keys
                KeyCode::Char('=') => {
                    self.controller.slider_input(MAX_RATING, &mut self.surface);
                }
                KeyCode::Char('e') => self.export()?,
                _ => {}
            },
        }
        Ok(false)
    }

    /// Move the grid highlight and "click" the entry it lands on.
    fn click_next(&mut self, step: isize) {
        let count = self.surface.entry_count();
        if count == 0 {
            return;
        }
        let next = match self.selected_entry {
            None => 0,
            Some(id) => (id as isize + step).rem_euclid(count as isize) as usize,
        };
        self.selected_entry = Some(next);
        self.controller.activate(next, &mut self.surface);
    }

    fn nudge_rating(&mut self, delta: i8) {
        let Some(current) = self.controller.active_rating() else {
            return;
        };
        let value = current.saturating_add_signed(delta).min(MAX_RATING);
        self.controller.slider_input(value, &mut self.surface);
    }

    /// Write the rating store to the output path, the terminal stand-in for
    /// the browser's `data.json` download.
    pub fn export(&mut self) -> anyhow::Result<()> {
        let json = self.controller.export_json()?;
        std::fs::write(&self.out_path, json)
            .with_context(|| format!("failed to write {}", self.out_path.display()))?;
        self.status = Some(format!("saved {}", self.out_path.display()));
        Ok(())
    }
}
