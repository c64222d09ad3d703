use crate::types::{Side, TradeEvent};
use chrono::Local;

// ANSI color codes
pub struct Colors;

impl Colors {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const DIM: &'static str = "\x1b[2m";

    // Colors
    pub const RED: &'static str = "\x1b[31m";
    pub const GREEN: &'static str = "\x1b[32m";
    pub const WHITE: &'static str = "\x1b[37m";
    pub const GRAY: &'static str = "\x1b[90m";

    // Bright colors
    pub const BRIGHT_RED: &'static str = "\x1b[91m";
    pub const BRIGHT_GREEN: &'static str = "\x1b[92m";
    pub const BRIGHT_YELLOW: &'static str = "\x1b[93m";
    pub const BRIGHT_BLUE: &'static str = "\x1b[94m";
    pub const BRIGHT_MAGENTA: &'static str = "\x1b[95m";
    pub const BRIGHT_CYAN: &'static str = "\x1b[96m";
}

#[derive(Debug, Clone)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
    Minimal,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "csv" => OutputFormat::Csv,
            "json" => OutputFormat::Json,
            "minimal" => OutputFormat::Minimal,
            _ => OutputFormat::Table,
        }
    }
}

pub struct TradeFormatter {
    format: OutputFormat,
    colored: bool,
    quiet: bool,
    trade_count: u64,
}

impl TradeFormatter {
    pub fn new(format: OutputFormat, colored: bool, quiet: bool) -> Self {
        Self {
            format,
            colored,
            quiet,
            trade_count: 0,
        }
    }

    pub fn trade_count(&self) -> u64 {
        self.trade_count
    }

    pub fn print_header(&self) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Table => self.print_table_header(),
            OutputFormat::Csv => println!("time,symbol,side,quantity,price,pnl,explanation"),
            OutputFormat::Json => {}
            OutputFormat::Minimal => {}
        }
    }

    pub fn print_trade(&mut self, trade: &TradeEvent) {
        self.trade_count += 1;

        match self.format {
            OutputFormat::Table => self.print_table_row(trade),
            OutputFormat::Csv => self.print_csv_row(trade),
            OutputFormat::Json => self.print_json_row(trade),
            OutputFormat::Minimal => self.print_minimal_row(trade),
        }
    }

    fn timestamp(&self, trade: &TradeEvent) -> String {
        match trade.created_at_local() {
            Some(ts) => ts.format("%H:%M:%S").to_string(),
            None => Local::now().format("%H:%M:%S").to_string(),
        }
    }

    fn print_table_header(&self) {
        if self.colored {
            println!(
                "{}{}┌──────────┬────────────┬──────┬────────────┬────────────┬────────────┐{}",
                Colors::BOLD,
                Colors::GRAY,
                Colors::RESET
            );
            println!(
                "{}{}│ TIME     │ SYMBOL     │ SIDE │ QUANTITY   │ PRICE      │ PNL        │{}",
                Colors::BOLD,
                Colors::GRAY,
                Colors::RESET
            );
            println!(
                "{}{}└──────────┴────────────┴──────┴────────────┴────────────┴────────────┘{}",
                Colors::BOLD,
                Colors::GRAY,
                Colors::RESET
            );
        } else {
            println!("TIME       SYMBOL       SIDE  QUANTITY     PRICE        PNL");
        }
    }

    fn print_table_row(&self, trade: &TradeEvent) {
        let time = self.timestamp(trade);
        if self.colored {
            let side_color = match trade.side {
                Side::Buy => Colors::BRIGHT_GREEN,
                Side::Sell => Colors::BRIGHT_RED,
            };
            let pnl_color = if trade.pnl >= 0.0 {
                Colors::GREEN
            } else {
                Colors::RED
            };
            println!(
                "  {}{}{}  {}{:<10}{}  {}{:<4}{}  {:<10.4}  {:<10.2}  {}{:<+10.2}{}",
                Colors::DIM,
                time,
                Colors::RESET,
                Colors::BRIGHT_CYAN,
                trade.symbol,
                Colors::RESET,
                side_color,
                trade.side.formatted(),
                Colors::RESET,
                trade.quantity,
                trade.price,
                pnl_color,
                trade.pnl,
                Colors::RESET
            );
        } else {
            println!(
                "  {}  {:<10}  {:<4}  {:<10.4}  {:<10.2}  {:<+10.2}",
                time,
                trade.symbol,
                trade.side.formatted(),
                trade.quantity,
                trade.price,
                trade.pnl
            );
        }
    }

    fn print_csv_row(&self, trade: &TradeEvent) {
        println!(
            "{},{},{},{},{},{},{}",
            trade
                .created_at
                .map(|ts| ts.to_rfc3339())
                .unwrap_or_default(),
            trade.symbol,
            trade.side,
            trade.quantity,
            trade.price,
            trade.pnl,
            trade.explanation.as_deref().unwrap_or_default()
        );
    }

    fn print_json_row(&self, trade: &TradeEvent) {
        if let Ok(json) = serde_json::to_string(trade) {
            println!("{}", json);
        }
    }

    fn print_minimal_row(&self, trade: &TradeEvent) {
        println!(
            "{} {} {} @ {} pnl {:+.2}",
            trade.side.formatted(),
            trade.quantity,
            trade.symbol,
            trade.price,
            trade.pnl
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_strings_map_to_variants() {
        assert!(matches!(OutputFormat::from("csv"), OutputFormat::Csv));
        assert!(matches!(OutputFormat::from("JSON"), OutputFormat::Json));
        assert!(matches!(OutputFormat::from("minimal"), OutputFormat::Minimal));
        assert!(matches!(OutputFormat::from("table"), OutputFormat::Table));
        assert!(matches!(OutputFormat::from("anything"), OutputFormat::Table));
    }

    #[test]
    fn formatter_counts_printed_trades() {
        let mut formatter = TradeFormatter::new(OutputFormat::Minimal, false, true);
        let trade = TradeEvent {
            symbol: "SPY".into(),
            side: Side::Buy,
            quantity: 1.0,
            price: 500.0,
            pnl: 2.5,
            explanation: None,
            created_at: None,
        };
        formatter.print_trade(&trade);
        formatter.print_trade(&trade);
        assert_eq!(formatter.trade_count(), 2);
    }
}
