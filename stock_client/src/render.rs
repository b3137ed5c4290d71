//! Text rendering of the widget.
//!
//! Draws the credential or symbol placeholder, the error view with its retry
//! hint, or the quote grid, depending on the `WidgetView`.
use std::fmt::Write;

use chrono::Local;
use stock_common::quote::Direction;
use stock_common::settings::symbols_help;
use stock_common::{Locale, Message, WidgetConfig};
use stock_tracker::{GridRow, WidgetView};

/// Renders `view` as a block of text.
pub fn render(view: &WidgetView, config: &WidgetConfig, locale: Locale) -> String {
    let mut out = format!("== {} ==\n", locale.text(Message::WidgetTitle));
    match view {
        WidgetView::CredentialMissing => {
            out.push_str(locale.text(Message::CredentialMissing));
        }
        WidgetView::NoSymbols => {
            out.push_str(locale.text(Message::NoSymbols));
        }
        WidgetView::Error { message } => {
            let _ = write!(out, "! {}\n{}", message, locale.text(Message::Retry));
        }
        WidgetView::Grid {
            rows,
            loading,
            last_updated_at,
        } => {
            for row in rows {
                out.push_str(&render_row(row));
                out.push('\n');
            }
            if let Some(at) = last_updated_at {
                let _ = write!(
                    out,
                    "{}: {}",
                    locale.text(Message::LastUpdated),
                    at.with_timezone(&Local).format("%H:%M:%S")
                );
            }
            if *loading {
                let _ = write!(out, " {}", locale.text(Message::Loading));
            }
        }
    }
    if let Some(help) = symbols_help(config, locale) {
        let _ = write!(out, "\n({})", help);
    }
    out
}

fn render_row(row: &GridRow) -> String {
    let label = row.ticker.label();
    let Some(quote) = &row.quote else {
        return format!("{:<18} {:>10}", label, "n/a");
    };
    let arrow = match quote.direction() {
        Direction::Up => "▲",
        Direction::Down => "▼",
        Direction::Flat => "=",
    };
    let change = match (quote.change, quote.percent_change) {
        (Some(change), Some(pct)) => format!("{:+.2} ({:+.2}%)", change, pct),
        (Some(change), None) => format!("{:+.2}", change),
        _ => "n/a".to_string(),
    };
    format!("{:<18} {:>10.2} {} {}", label, quote.price, arrow, change)
}
