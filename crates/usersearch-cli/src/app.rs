use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use usersearch_core::orchestration::SearchController;

use crate::ui;

const TICK: Duration = Duration::from_millis(100);

pub struct App {
    controller: SearchController,
    input: String,
    tick: usize,
    should_quit: bool,
}

impl App {
    pub fn new(controller: SearchController) -> Self {
        Self {
            controller,
            input: String::new(),
            tick: 0,
            should_quit: false,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if control => self.should_quit = true,
            KeyCode::Char('u') if control => {
                if !self.input.is_empty() {
                    self.input.clear();
                    self.query_changed().await;
                }
            }
            KeyCode::Esc => {
                if self.controller.dismiss_notification().await.is_none() {
                    self.should_quit = true;
                }
            }
            KeyCode::Backspace => {
                if self.input.pop().is_some() {
                    self.query_changed().await;
                }
            }
            KeyCode::Char(c) if !control => {
                self.input.push(c);
                self.query_changed().await;
            }
            _ => {}
        }
    }

    async fn query_changed(&self) {
        self.controller.on_query_changed(self.input.clone()).await;
    }
}

pub async fn run(controller: SearchController) -> io::Result<()> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, App::new(controller)).await;
    ratatui::restore();
    result
}

async fn event_loop(terminal: &mut DefaultTerminal, mut app: App) -> io::Result<()> {
    while !app.should_quit {
        let snapshot = app.controller.snapshot().await;
        terminal.draw(|frame| ui::render(frame, &app.input, &snapshot, app.tick))?;

        // Terminal input is blocking; keep it off the async workers.
        let next = tokio::task::block_in_place(|| -> io::Result<Option<Event>> {
            if event::poll(TICK)? {
                event::read().map(Some)
            } else {
                Ok(None)
            }
        })?;

        if let Some(Event::Key(key)) = next {
            app.handle_key(key).await;
        }
        app.tick = app.tick.wrapping_add(1);
    }
    Ok(())
}
