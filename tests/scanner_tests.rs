// Ranking and scan orchestration tests with mock collaborators.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use utbot_scanner::config::AppCfg;
use utbot_scanner::connection::MarketData;
use utbot_scanner::error::ScanError;
use utbot_scanner::notify::Notifier;
use utbot_scanner::scanner::{rank_top_gainers, run_scan, SymbolOutcome};
use utbot_scanner::types::{Candle, TickerStats};

mod test_utils {
    use super::*;

    pub fn ticker(symbol: &str, pct: Option<f64>) -> TickerStats {
        TickerStats {
            symbol: symbol.to_string(),
            price_change_pct: pct,
        }
    }

    pub fn candle(open: f64, high: f64, low: f64, close: f64) -> Candle {
        let t = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        Candle {
            open_time: t,
            close_time: t,
            open,
            high,
            low,
            close,
            volume: 1.0,
        }
    }

    pub fn flat(value: f64) -> Candle {
        candle(value, value, value, value)
    }

    /// 15 candles that end in a long crossover (see strategy tests).
    pub fn signal_window() -> Vec<Candle> {
        let mut candles: Vec<Candle> = (0..14).map(|_| flat(100.0)).collect();
        candles[8] = candle(100.0, 100.0, 95.0, 100.0);
        candles.push(candle(100.0, 112.0, 100.0, 112.0));
        candles
    }

    /// 15 candles that never cross the trailing stop.
    pub fn quiet_window() -> Vec<Candle> {
        (0..15).map(|_| flat(100.0)).collect()
    }

    pub fn test_config() -> AppCfg {
        let mut cfg = AppCfg::default();
        cfg.scanner.candle_limit = 15;
        cfg.scanner.top_n = 10;
        cfg.scanner.symbol_pause_ms = 0;
        cfg.strategy.atr_period = 3;
        cfg.strategy.key_value = 2.0;
        cfg.strategy.sl_lookback = 10;
        cfg.strategy.risk_reward = 2.0;
        cfg
    }

    pub struct MockMarket {
        pub tickers: Vec<TickerStats>,
        pub fail_tickers: bool,
        pub klines: HashMap<String, Vec<Candle>>,
        pub fail_symbols: HashSet<String>,
    }

    impl MockMarket {
        pub fn new(tickers: Vec<TickerStats>) -> Self {
            Self {
                tickers,
                fail_tickers: false,
                klines: HashMap::new(),
                fail_symbols: HashSet::new(),
            }
        }
    }

    #[async_trait]
    impl MarketData for MockMarket {
        async fn fetch_tickers(&self) -> Result<Vec<TickerStats>, ScanError> {
            if self.fail_tickers {
                return Err(ScanError::DataFetch("ticker endpoint down".into()));
            }
            Ok(self.tickers.clone())
        }

        async fn fetch_klines(
            &self,
            symbol: &str,
            _interval: &str,
            _limit: u32,
        ) -> Result<Vec<Candle>, ScanError> {
            if self.fail_symbols.contains(symbol) {
                return Err(ScanError::DataFetch(format!("timeout for {symbol}")));
            }
            Ok(self.klines.get(symbol).cloned().unwrap_or_default())
        }
    }

    pub struct MockNotifier {
        pub sent: Mutex<Vec<String>>,
        pub fail: bool,
    }

    impl MockNotifier {
        pub fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: false,
            }
        }
    }

    #[async_trait]
    impl Notifier for MockNotifier {
        async fn notify(&self, text: &str) -> Result<(), ScanError> {
            if self.fail {
                return Err(ScanError::Notification("delivery refused".into()));
            }
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }
}

use test_utils::*;

#[test]
fn ranking_missing_change_sorts_last_but_stays_in() {
    let tickers = vec![
        ticker("AAAUSDT", Some(5.0)),
        ticker("BBBUSDT", None),
        ticker("CCCUSDT", Some(10.0)),
    ];
    let ranked = rank_top_gainers(&tickers, "USDT", 2);
    assert_eq!(ranked, vec!["CCCUSDT", "AAAUSDT"]);

    // With room for all three, the unknown-change symbol ranks last.
    let ranked = rank_top_gainers(&tickers, "USDT", 5);
    assert_eq!(ranked, vec!["CCCUSDT", "AAAUSDT", "BBBUSDT"]);
}

#[test]
fn ranking_filters_quote_and_leveraged_variants() {
    let tickers = vec![
        ticker("ETHUSDT", Some(1.0)),
        ticker("ETHBTC", Some(50.0)),
        ticker("ETHUPUSDT", Some(40.0)),
        ticker("ETHDOWNUSDT", Some(30.0)),
        ticker("USDT", Some(20.0)),
    ];
    let ranked = rank_top_gainers(&tickers, "USDT", 10);
    assert_eq!(ranked, vec!["ETHUSDT"]);
}

#[test]
fn ranking_returns_all_when_fewer_than_k() {
    let tickers = vec![ticker("AAAUSDT", Some(1.0)), ticker("BBBUSDT", Some(2.0))];
    assert_eq!(rank_top_gainers(&tickers, "USDT", 25).len(), 2);
}

#[tokio::test]
async fn scan_isolates_per_symbol_failures() {
    let mut market = MockMarket::new(vec![
        ticker("FAILUSDT", Some(30.0)),
        ticker("SIGUSDT", Some(20.0)),
        ticker("QUIETUSDT", Some(10.0)),
    ]);
    market.fail_symbols.insert("FAILUSDT".to_string());
    market.klines.insert("SIGUSDT".to_string(), signal_window());
    market
        .klines
        .insert("QUIETUSDT".to_string(), quiet_window());

    let notifier = MockNotifier::new();
    let cfg = test_config();
    let reports = run_scan(&cfg, &market, &notifier).await.unwrap();

    assert_eq!(reports.len(), 3);
    assert!(matches!(
        reports[0].outcome,
        SymbolOutcome::Skipped(ScanError::DataFetch(_))
    ));
    assert!(matches!(reports[1].outcome, SymbolOutcome::Signal(_)));
    assert!(matches!(reports[2].outcome, SymbolOutcome::NoSignal));

    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("SIGUSDT"));
    assert!(sent[0].contains("LONG"));
}

#[tokio::test]
async fn scan_skips_short_series() {
    let mut market = MockMarket::new(vec![ticker("SHORTUSDT", Some(5.0))]);
    market
        .klines
        .insert("SHORTUSDT".to_string(), quiet_window()[..10].to_vec());

    let notifier = MockNotifier::new();
    let cfg = test_config();
    let reports = run_scan(&cfg, &market, &notifier).await.unwrap();

    assert_eq!(reports.len(), 1);
    assert!(matches!(
        reports[0].outcome,
        SymbolOutcome::Skipped(ScanError::InsufficientData { got: 10, need: 15 })
    ));
    assert!(notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn notification_failure_does_not_abort_the_scan() {
    let mut market = MockMarket::new(vec![
        ticker("SIGUSDT", Some(20.0)),
        ticker("QUIETUSDT", Some(10.0)),
    ]);
    market.klines.insert("SIGUSDT".to_string(), signal_window());
    market
        .klines
        .insert("QUIETUSDT".to_string(), quiet_window());

    let mut notifier = MockNotifier::new();
    notifier.fail = true;

    let cfg = test_config();
    let reports = run_scan(&cfg, &market, &notifier).await.unwrap();

    // The signal is still reported and the remaining symbol is still scanned.
    assert_eq!(reports.len(), 2);
    assert!(matches!(reports[0].outcome, SymbolOutcome::Signal(_)));
    assert!(matches!(reports[1].outcome, SymbolOutcome::NoSignal));
}

#[tokio::test]
async fn ticker_failure_ends_the_scan_with_nothing_processed() {
    let mut market = MockMarket::new(Vec::new());
    market.fail_tickers = true;

    let notifier = MockNotifier::new();
    let cfg = test_config();
    let result = run_scan(&cfg, &market, &notifier).await;

    assert!(matches!(result, Err(ScanError::DataFetch(_))));
    assert!(notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn scan_emits_signals_in_ranking_order() {
    let mut market = MockMarket::new(vec![
        ticker("BBBUSDT", Some(5.0)),
        ticker("AAAUSDT", Some(15.0)),
    ]);
    market.klines.insert("AAAUSDT".to_string(), signal_window());
    market.klines.insert("BBBUSDT".to_string(), signal_window());

    let notifier = MockNotifier::new();
    let cfg = test_config();
    let reports = run_scan(&cfg, &market, &notifier).await.unwrap();

    assert_eq!(reports[0].symbol, "AAAUSDT");
    assert_eq!(reports[1].symbol, "BBBUSDT");

    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].contains("AAAUSDT"));
    assert!(sent[1].contains("BBBUSDT"));
}
