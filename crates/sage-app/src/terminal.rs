//! Terminal renderer.

use std::io::Write;

use sage_chat::{RenderedMessage, Renderer};
use sage_core::types::Sender;

/// Prints messages to stdout, one block per message.
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl TerminalRenderer {
    pub fn new() -> Self {
        Self
    }
}

/// Text block for one message.
pub fn format_message(message: &RenderedMessage) -> String {
    let who = match message.sender {
        Sender::User => "you",
        Sender::Assistant => "sage",
    };
    let mut out = format!("{who}: {}", message.text);
    if let Some(ref thumbnail) = message.thumbnail_url {
        out.push_str(&format!("\n      🖼  {thumbnail}"));
    }
    if let Some(ref source) = message.source {
        out.push_str(&format!("\n      {}: {}", source.label, source.url));
    }
    out
}

/// Write one whole block and flush it.
fn write_block(out: &mut impl Write, block: &str) -> std::io::Result<()> {
    writeln!(out, "{block}")?;
    out.flush()
}

fn emit(block: &str) {
    // Lookups finish on other tasks; keep each block whole.
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = write_block(&mut stdout, block) {
        tracing::debug!(error = %e, "Failed to write to terminal");
    }
}

impl Renderer for TerminalRenderer {
    fn render(&self, message: &RenderedMessage) {
        emit(&format_message(message));
    }

    fn clear(&self) {
        emit(&"─".repeat(40));
    }
}
