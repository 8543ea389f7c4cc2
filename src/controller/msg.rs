//! Messages for the view-state controller
//!
//! A message describes what happened in the host page. Host events arrive as
//! JSON (`{"type": "click", "name": "Meat"}`) and are converted here, so the
//! update function never sees the event-dispatch mechanism.

use serde::Deserialize;

/// All events the controller reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// A tile was clicked
    Click(String),
    /// Pointer entered a tile
    Hover(String),
    /// Pointer left a tile
    Unhover,
    /// The comparison chart was requested for a product
    Compare(String),
    /// The host asked to go back to the category view
    Reset,
    Noop,
}

/// Event payload as posted by the viewer page
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HostEvent {
    Click { name: String },
    Mouseover { name: String },
    Mouseout,
    Compare { product: String },
    Reset,
    #[serde(other)]
    Unknown,
}

impl From<HostEvent> for Msg {
    fn from(event: HostEvent) -> Self {
        match event {
            HostEvent::Click { name } => Msg::Click(name),
            HostEvent::Mouseover { name } => Msg::Hover(name),
            HostEvent::Mouseout => Msg::Unhover,
            HostEvent::Compare { product } => Msg::Compare(product),
            HostEvent::Reset => Msg::Reset,
            HostEvent::Unknown => Msg::Noop,
        }
    }
}

/// Parse a posted event body
pub fn parse_event(body: &str) -> crate::Result<Msg> {
    let event: HostEvent = serde_json::from_str(body)?;
    Ok(event.into())
}
