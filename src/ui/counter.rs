//! The counter program: plus, minus, reset and document clicks.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

use crate::config::CounterConfig;
use crate::error::{RuntimeError, UpdateError};
use crate::mvu::{
    Effect, MessageChannel, Program, Sender, Subscription, SubscriptionId, Tagged, Transition,
};
use crate::ui::document::Document;

pub type CounterMsg = Tagged;

pub const PLUS: &str = "plus";
pub const MINUS: &str = "minus";
pub const RESET: &str = "reset";
pub const DOCUMENT_CLICK: &str = "documentClick";

/// A key-bound control that sends one message kind.
pub struct Button {
    pub key: char,
    pub label: &'static str,
    kind: &'static str,
    sender: Sender<CounterMsg>,
}

impl Button {
    fn new(key: char, label: &'static str, kind: &'static str, sender: Sender<CounterMsg>) -> Self {
        Self {
            key,
            label,
            kind,
            sender,
        }
    }

    pub fn press(&self) -> Result<(), RuntimeError> {
        self.sender.msg(self.kind)
    }

    pub fn sender(&self) -> &Sender<CounterMsg> {
        &self.sender
    }
}

/// Output of [`Counter::view`].
pub struct CounterView {
    pub count: i64,
    /// Whether document clicks are currently wanted.
    pub listening: bool,
    pub buttons: Vec<Button>,
}

impl CounterView {
    /// Presses the button bound to `key`. Returns false if none is.
    pub fn press(&self, key: char) -> Result<bool, RuntimeError> {
        match self.buttons.iter().find(|button| button.key == key) {
            Some(button) => button.press().map(|()| true),
            None => Ok(false),
        }
    }

    pub fn to_text(&self) -> Text<'static> {
        let heading = Line::from(Span::styled(
            format!(" {}", self.count),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        let buttons = Line::from(
            self.buttons
                .iter()
                .map(|button| {
                    Span::styled(
                        format!("[{}] {}  ", button.key, button.label),
                        Style::default().fg(Color::Cyan),
                    )
                })
                .collect::<Vec<_>>(),
        );
        let status = if self.listening {
            Line::from(Span::styled(
                "click anywhere to add",
                Style::default().fg(Color::Green),
            ))
        } else {
            Line::from(Span::styled(
                "clicks ignored",
                Style::default().fg(Color::DarkGray),
            ))
        };
        Text::from(vec![heading, Line::default(), buttons, status])
    }
}

/// Counter that listens to document clicks while below a limit.
pub struct Counter {
    document: Document,
    channel: MessageChannel<CounterMsg>,
    config: CounterConfig,
}

impl Counter {
    /// `channel` must be the one the runtime publishes into; the reset button
    /// takes its sender from there rather than from `view`.
    pub fn new(
        document: Document,
        channel: MessageChannel<CounterMsg>,
        config: CounterConfig,
    ) -> Self {
        Self {
            document,
            channel,
            config,
        }
    }
}

fn log_effect(text: &'static str) -> Effect<CounterMsg> {
    Effect::new(move |_| tracing::info!(target: "counter", "{}", text))
}

impl Program for Counter {
    type Model = i64;
    type Msg = CounterMsg;
    type Output = CounterView;

    fn init(&self) -> Transition<i64, CounterMsg> {
        Transition::new(0)
    }

    fn update(
        &self,
        msg: CounterMsg,
        model: &i64,
    ) -> Result<Transition<i64, CounterMsg>, UpdateError> {
        // The count pins at the i64 bounds.
        match msg.kind() {
            PLUS => Ok(Transition::new(model.saturating_add(1)).effect(log_effect(PLUS))),
            MINUS => Ok(Transition::new(model.saturating_sub(1)).effect(log_effect(MINUS))),
            RESET => Ok(Transition::new(0)),
            DOCUMENT_CLICK => Ok(Transition::new(model.saturating_add(self.config.click_step))),
            _ => Err(msg.unknown()),
        }
    }

    fn view(&self, model: &i64, sender: &Sender<CounterMsg>) -> CounterView {
        CounterView {
            count: *model,
            listening: *model < self.config.click_limit,
            buttons: vec![
                Button::new('+', "+", PLUS, sender.clone()),
                Button::new('-', "-", MINUS, sender.clone()),
                Button::new('r', "Reset", RESET, self.channel.sender()),
            ],
        }
    }

    fn subscriptions(&self, model: &i64) -> Vec<Option<Subscription<CounterMsg>>> {
        let listening = *model < self.config.click_limit;
        vec![listening.then(|| {
            self.document
                .on_click(SubscriptionId::new("document-click"), |_| {
                    Tagged::new(DOCUMENT_CLICK)
                })
        })]
    }
}
