//! Terminal host for the counter program.
//!
//! The host owns everything the runtime treats as external: the terminal,
//! input polling, the click target and drawing the view output.

pub mod counter;
pub mod document;
pub mod terminal_guard;

use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, MouseEventKind};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use crate::config::Config;
use crate::mvu::{AppRuntime, MessageChannel, MountTarget};
use crate::ui::counter::{Counter, CounterView};
use crate::ui::document::{Click, Document};
use crate::ui::terminal_guard::setup_terminal;

/// Mount target that keeps the latest rendered view for drawing.
#[derive(Default)]
pub struct Screen {
    latest: Option<Rc<CounterView>>,
    renders: usize,
    detached: bool,
}

impl Screen {
    pub fn latest(&self) -> Option<Rc<CounterView>> {
        self.latest.clone()
    }

    pub fn renders(&self) -> usize {
        self.renders
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }
}

impl MountTarget<CounterView> for Screen {
    fn render(&mut self, output: CounterView) {
        self.latest = Some(Rc::new(output));
        self.renders += 1;
    }

    fn detach(&mut self) {
        self.latest = None;
        self.detached = true;
    }
}

fn draw(frame: &mut Frame<'_>, view: Option<&CounterView>) {
    let block = Block::bordered().title(" counter ");
    let paragraph = match view {
        Some(view) => Paragraph::new(view.to_text()),
        None => Paragraph::new("not mounted"),
    };
    frame.render_widget(paragraph.block(block), frame.area());
}

/// Runs the counter until `q` or Esc.
pub fn run(config: Config) -> anyhow::Result<()> {
    let (mut terminal, guard) = setup_terminal()?;
    let tick_rate = Duration::from_millis(config.counter.tick_ms);

    let document = Document::new();
    let channel = MessageChannel::new();
    let program = Counter::new(document.clone(), channel.clone(), config.counter);
    let instance = AppRuntime::new(program)
        .with_config(config.runtime)
        .with_channel(channel)
        .mount(Screen::default())?;

    loop {
        let view = instance.with_target(Screen::latest).flatten();
        terminal.draw(|frame| draw(frame, view.as_deref()))?;

        if !event::poll(tick_rate)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char(c) => {
                    if let Some(view) = &view {
                        view.press(c)?;
                    }
                }
                _ => {}
            },
            Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => {
                document.click(Click {
                    column: mouse.column,
                    row: mouse.row,
                })?;
            }
            _ => {}
        }
    }

    instance.unmount()?;
    drop(guard);
    Ok(())
}
