/// file: src/ui.rs
/// description: terminal presentation layer consuming client events
use crate::{
    events::{ClientEvent, EventReceiver},
    formatter::{Colors, OutputFormat, TradeFormatter},
};
use tracing::{debug, info};

pub struct UiController {
    event_receiver: EventReceiver,
    trade_formatter: TradeFormatter,
    quiet_mode: bool,
    header_printed: bool,
    max_trades: Option<u64>,
}

pub struct UiOptions {
    pub colored: bool,
    pub quiet: bool,
    pub max_trades: u64,
}

impl UiController {
    pub fn new(event_receiver: EventReceiver, format: OutputFormat, options: UiOptions) -> Self {
        Self {
            event_receiver,
            trade_formatter: TradeFormatter::new(format, options.colored, options.quiet),
            quiet_mode: options.quiet,
            header_printed: false,
            max_trades: if options.max_trades == 0 {
                None
            } else {
                Some(options.max_trades)
            },
        }
    }

    pub async fn run(&mut self) {
        self.print_startup_banner();
        while let Some(event) = self.event_receiver.recv().await {
            if !self.handle_event(event) {
                break;
            }
        }
    }

    fn handle_event(&mut self, event: ClientEvent) -> bool {
        match event {
            ClientEvent::Starting => {
                info!("Client starting...");
            }
            ClientEvent::Connecting { url } => {
                self.print_connection_status("CONNECTING", &url);
            }
            ClientEvent::Connected { connection_id } => {
                self.print_connection_status("LIVE", &format!("ID: {}", connection_id));
                if !self.header_printed {
                    self.trade_formatter.print_header();
                    self.header_printed = true;
                }
            }
            ClientEvent::TradeReceived(trade) => {
                // Fallback safety: header before the first trade
                if !self.header_printed {
                    self.trade_formatter.print_header();
                    self.header_printed = true;
                }
                self.trade_formatter.print_trade(&trade);

                if let Some(max_trades) = self.max_trades {
                    if self.trade_formatter.trade_count() >= max_trades {
                        self.print_connection_status(
                            "STOPPING",
                            &format!("Reached configured max trades ({max_trades})"),
                        );
                        return false;
                    }
                }
            }
            ClientEvent::EnvelopeIgnored { kind } => {
                debug!("Ignored envelope type: {}", kind);
            }
            ClientEvent::MalformedFrame { error } => {
                debug!("Dropped malformed frame: {}", error);
            }
            ClientEvent::Disconnected => {
                self.print_connection_status("RECONNECTING", "Connection closed");
            }
            ClientEvent::Reconnecting { attempt, delay_ms } => {
                self.print_reconnect_info(delay_ms, attempt);
            }
            ClientEvent::GaveUp { attempts } => {
                self.print_error(
                    "OFFLINE",
                    &format!("Gave up after {} reconnection attempts", attempts),
                );
            }
            ClientEvent::Stopping => {
                self.print_connection_status("STOPPING", "Client shutting down");
            }
        }

        true
    }

    fn print_startup_banner(&self) {
        if self.quiet_mode {
            return;
        }

        println!();
        println!(
            "{}{}╔══════════════════════════════════════════════════════════════╗{}",
            Colors::BOLD,
            Colors::BRIGHT_CYAN,
            Colors::RESET
        );
        println!(
            "{}{}║                 PAPER-TRADING STREAM CLIENT                  ║{}",
            Colors::BOLD,
            Colors::BRIGHT_CYAN,
            Colors::RESET
        );
        println!(
            "{}{}║{}  Version: {}{:<8}{}                        Status: {}STARTING{}  {}║{}",
            Colors::BOLD,
            Colors::BRIGHT_CYAN,
            Colors::RESET,
            Colors::BRIGHT_GREEN,
            env!("CARGO_PKG_VERSION"),
            Colors::RESET,
            Colors::BRIGHT_MAGENTA,
            Colors::RESET,
            Colors::BRIGHT_CYAN,
            Colors::RESET
        );
        println!(
            "{}{}╚══════════════════════════════════════════════════════════════╝{}",
            Colors::BOLD,
            Colors::BRIGHT_CYAN,
            Colors::RESET
        );
        println!();
    }

    fn print_connection_status(&self, status: &str, message: &str) {
        if self.quiet_mode && status != "ERROR" {
            return;
        }

        let (color, symbol) = match status {
            "CONNECTING" => (Colors::BRIGHT_YELLOW, "*"),
            "LIVE" => (Colors::BRIGHT_GREEN, "+"),
            "RECONNECTING" => (Colors::BRIGHT_RED, "X"),
            "STOPPING" => (Colors::BRIGHT_MAGENTA, "!"),
            _ => (Colors::WHITE, "-"),
        };

        println!(
            "{}{}[{}]{} {} {}{}{}",
            Colors::BOLD,
            color,
            status,
            Colors::RESET,
            symbol,
            Colors::WHITE,
            message,
            Colors::RESET
        );
    }

    fn print_error(&self, error_type: &str, message: &str) {
        println!(
            "{}{}[{}]{} ! {}{}{}",
            Colors::BOLD,
            Colors::BRIGHT_RED,
            error_type,
            Colors::RESET,
            Colors::RED,
            message,
            Colors::RESET
        );
    }

    fn print_reconnect_info(&self, delay_ms: u64, attempt: u32) {
        println!(
            "{}{}[RECONNECTING]{} > Attempt {} in {}ms...",
            Colors::BOLD,
            Colors::BRIGHT_YELLOW,
            Colors::RESET,
            attempt,
            delay_ms
        );
    }
}
