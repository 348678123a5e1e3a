//! Shared UI icons and emojis.
//!
//! Each icon carries a plain-text fallback for terminals without emoji
//! support.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[WARN]");

// Board indicators
pub static CARD: Emoji<'_, '_> = Emoji("▪ ", "- ");
pub static ORPHAN: Emoji<'_, '_> = Emoji("👻 ", "[?]");
pub static OFFLINE: Emoji<'_, '_> = Emoji("📴 ", "[OFFLINE]");
