//! SMC CLI: analyze candle files, inspect the signal log, map tickers.
//!
//! Commands:
//! - `analyze`: run one analysis pass over a candle file or data directory
//! - `scan`: analyze a watchlist of symbols and timeframes from a data directory
//! - `signals`: list signals recorded in a JSONL log
//! - `ticker`: print the provider ticker (and interval) for trading symbols

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use smc_core::data::{load_candles, provider_ticker, CandleProvider, FileProvider};
use smc_core::signal::format_price;
use smc_core::sizing::size_signal;
use smc_core::{
    analyze, Analysis, AnalyzerConfig, CandleOrder, CandleSeries, ConfidenceModel, PositionSize,
    RiskBudget, Scanner, Signal, SignalLog, Timeframe, Watchlist,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "smc",
    about = "SMC CLI: market-structure signals from OHLC candles"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a candle history and print the resulting signal.
    Analyze {
        /// Trading symbol (e.g., EUR/USD, BTCUSDT, SPY).
        #[arg(long)]
        symbol: String,

        /// Timeframe: 1m, 5m, 15m, 30m, 1h, 4h, 1d, 1wk, 1mo.
        #[arg(long)]
        timeframe: Timeframe,

        /// Candle file (.json connector format or .csv).
        #[arg(long, conflicts_with = "data_dir")]
        input: Option<PathBuf>,

        /// Directory holding `{SYMBOL}_{timeframe}.json|.csv` files.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Ordering of the candles in --input.
        #[arg(long, value_enum, default_value_t = OrderArg::OldestFirst)]
        order: OrderArg,

        /// Path to a TOML analyzer config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Pivot lookback (overrides the config file).
        #[arg(long)]
        lookback: Option<usize>,

        /// Risk/reward ratio for the first target (overrides the config file).
        #[arg(long)]
        risk_reward: Option<f64>,

        /// Confidence model (overrides the config file).
        #[arg(long, value_enum)]
        confidence_model: Option<ConfidenceArg>,

        /// Account balance used to size the position (requires --risk-pct).
        #[arg(long, requires = "risk_pct")]
        balance: Option<f64>,

        /// Percent of the balance risked on the trade (requires --balance).
        #[arg(long, requires = "balance")]
        risk_pct: Option<f64>,

        /// Append new signals to this JSONL log.
        #[arg(long)]
        log: Option<PathBuf>,

        /// Print the full analysis as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Analyze every symbol/timeframe pair of a watchlist from a data directory.
    Scan {
        /// Directory holding `{SYMBOL}_{timeframe}.json|.csv` files.
        #[arg(long)]
        data_dir: PathBuf,

        /// Symbols, comma-separated or repeated.
        #[arg(long, required = true, value_delimiter = ',')]
        symbols: Vec<String>,

        /// Timeframes, comma-separated or repeated.
        #[arg(long, required = true, value_delimiter = ',')]
        timeframes: Vec<Timeframe>,

        /// Path to a TOML analyzer config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Append new signals to this JSONL log.
        #[arg(long)]
        log: Option<PathBuf>,

        /// Run pairs one at a time.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// Print signals as JSON lines.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List signals recorded in a JSONL log, newest first.
    Signals {
        /// Signal log path.
        #[arg(long)]
        log: PathBuf,

        /// Maximum number of signals to show.
        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Print signals as JSON lines.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the provider ticker for each symbol.
    Ticker {
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Also print the interval requested from the provider for this timeframe.
        #[arg(long)]
        timeframe: Option<Timeframe>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderArg {
    OldestFirst,
    NewestFirst,
    Unordered,
}

impl From<OrderArg> for CandleOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::OldestFirst => CandleOrder::OldestFirst,
            OrderArg::NewestFirst => CandleOrder::NewestFirst,
            OrderArg::Unordered => CandleOrder::Unordered,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConfidenceArg {
    Additive,
    StructureTagged,
}

impl From<ConfidenceArg> for ConfidenceModel {
    fn from(arg: ConfidenceArg) -> Self {
        match arg {
            ConfidenceArg::Additive => ConfidenceModel::Additive,
            ConfidenceArg::StructureTagged => ConfidenceModel::StructureTagged,
        }
    }
}

/// Overrides applied on top of the config file.
#[derive(Default)]
struct ConfigOverrides {
    lookback: Option<usize>,
    risk_reward: Option<f64>,
    confidence_model: Option<ConfidenceArg>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("smc=info,smc_core=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            symbol,
            timeframe,
            input,
            data_dir,
            order,
            config,
            lookback,
            risk_reward,
            confidence_model,
            balance,
            risk_pct,
            log,
            json,
        } => {
            let overrides = ConfigOverrides {
                lookback,
                risk_reward,
                confidence_model,
            };
            let config = build_config(config.as_deref(), overrides)?;
            let budget = balance
                .zip(risk_pct)
                .map(|(balance, pct)| RiskBudget::new(balance, pct))
                .transpose()?;
            let series = load_series(&symbol, timeframe, input, data_dir, order.into())?;
            run_analyze(
                &symbol,
                timeframe,
                &series,
                &config,
                budget.as_ref(),
                log.as_deref(),
                json,
            )
        }
        Commands::Scan {
            data_dir,
            symbols,
            timeframes,
            config,
            log,
            sequential,
            json,
        } => {
            let config = build_config(config.as_deref(), ConfigOverrides::default())?;
            let watchlist = Watchlist::new(symbols, timeframes);
            run_scan(&data_dir, &watchlist, config, log.as_deref(), sequential, json)
        }
        Commands::Signals { log, limit, json } => run_signals(&log, limit, json),
        Commands::Ticker { symbols, timeframe } => {
            for symbol in &symbols {
                println!("{}", ticker_line(symbol, timeframe));
            }
            Ok(())
        }
    }
}

fn build_config(path: Option<&Path>, overrides: ConfigOverrides) -> Result<AnalyzerConfig> {
    let mut config = match path {
        Some(p) => AnalyzerConfig::load(p)?,
        None => AnalyzerConfig::default(),
    };
    if let Some(lookback) = overrides.lookback {
        config.lookback = lookback;
    }
    if let Some(ratio) = overrides.risk_reward {
        config.risk_reward_ratio = ratio;
    }
    if let Some(model) = overrides.confidence_model {
        config.confidence_model = model.into();
    }
    config.validate()?;
    tracing::debug!(config_hash = %config.config_hash(), "analyzer config ready");
    Ok(config)
}

fn load_series(
    symbol: &str,
    timeframe: Timeframe,
    input: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    order: CandleOrder,
) -> Result<CandleSeries> {
    let (candles, order) = match (input, data_dir) {
        (Some(path), None) => {
            let candles = load_candles(&path)
                .with_context(|| format!("failed to load candles from {}", path.display()))?;
            (candles, order)
        }
        (None, Some(dir)) => {
            let fetched = FileProvider::new(dir).fetch(symbol, timeframe)?;
            tracing::info!(
                symbol,
                %timeframe,
                candles = fetched.candles.len(),
                source = ?fetched.source,
                "fetched candles"
            );
            (fetched.candles, fetched.order)
        }
        (Some(_), Some(_)) => bail!("--input and --data-dir are mutually exclusive"),
        (None, None) => bail!("one of --input or --data-dir is required"),
    };

    Ok(CandleSeries::new(candles, order)?)
}

fn run_analyze(
    symbol: &str,
    timeframe: Timeframe,
    series: &CandleSeries,
    config: &AnalyzerConfig,
    budget: Option<&RiskBudget>,
    log_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let analysis = analyze(symbol, timeframe, series, config)?;
    let position = match (&analysis.signal, budget) {
        (Some(signal), Some(budget)) => Some(size_signal(signal, budget)?),
        _ => None,
    };

    if json {
        let body = match &position {
            Some(size) => serde_json::json!({ "analysis": &analysis, "positionSize": size }),
            None => serde_json::to_value(&analysis)?,
        };
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print_analysis(symbol, timeframe, &analysis);
        if let Some(size) = &position {
            println!("  {}", position_line(size));
        }
    }

    if let (Some(signal), Some(path)) = (&analysis.signal, log_path) {
        let mut log = SignalLog::load_jsonl(path)?;
        if !log.record_and_append(signal.clone(), path)? {
            tracing::info!(id = %signal.id(), "signal already logged");
        }
    }

    Ok(())
}

fn run_scan(
    data_dir: &Path,
    watchlist: &Watchlist,
    config: AnalyzerConfig,
    log_path: Option<&Path>,
    sequential: bool,
    json: bool,
) -> Result<()> {
    if watchlist.size() == 0 {
        bail!("watchlist is empty");
    }
    let provider = FileProvider::new(data_dir);
    let scanner = Scanner::new(&provider, config)?.with_parallelism(!sequential);
    let results = scanner.scan(&watchlist.requests());

    for signal in results.signals() {
        if json {
            println!("{}", serde_json::to_string(signal)?);
        } else {
            print_signal(signal);
        }
    }
    if !json {
        for (request, err) in results.failures() {
            eprintln!("Error for {} ({}): {err}", request.symbol, request.timeframe);
        }
        println!(
            "{} pairs scanned, {} signals, {} failed",
            results.len(),
            results.signals().count(),
            results.failures().count()
        );
    }

    if let Some(path) = log_path {
        let mut log = SignalLog::load_jsonl(path)?;
        let mut written = 0usize;
        for signal in results.signals() {
            if log.record_and_append(signal.clone(), path)? {
                written += 1;
            }
        }
        tracing::info!(written, path = %path.display(), "scan signals logged");
    }

    Ok(())
}

fn print_analysis(symbol: &str, timeframe: Timeframe, analysis: &Analysis) {
    println!("=== {symbol} ({timeframe}) ===");
    println!(
        "Bias: {}  Range: {} - {}  ATR: {}",
        analysis.bias,
        format_price(analysis.lower_threshold),
        format_price(analysis.upper_threshold),
        format_price(analysis.atr)
    );
    match &analysis.signal {
        Some(signal) => print_signal(signal),
        None => println!("{}", Analysis::NEUTRAL_MESSAGE),
    }
}

fn print_signal(signal: &Signal) {
    println!(
        "{} {} {} ({}), confidence {}%",
        signal.direction, signal.symbol, signal.timeframe, signal.structure, signal.confidence
    );
    println!("  Entry:      {}", format_price(signal.entry));
    println!("  Stop loss:  {}", format_price(signal.stop_loss));
    for (i, target) in signal.targets.as_array().iter().enumerate() {
        println!("  Target {}:   {}", i + 1, format_price(*target));
    }
    match signal.risk_reward_ratio {
        Some(rr) => println!("  R:R:        1:{rr:.2}"),
        None => println!("  R:R:        n/a"),
    }
    println!("  {}", signal.analysis);
}

fn position_line(size: &PositionSize) -> String {
    format!(
        "Position:   {:.2} lots ({:.1} pips, risking {:.2})",
        size.lots, size.stop_pips, size.risk_amount
    )
}

fn ticker_line(symbol: &str, timeframe: Option<Timeframe>) -> String {
    let ticker = provider_ticker(symbol);
    match timeframe {
        Some(tf) => format!("{symbol} -> {ticker} (interval {})", tf.provider_interval()),
        None => format!("{symbol} -> {ticker}"),
    }
}

fn run_signals(path: &Path, limit: usize, json: bool) -> Result<()> {
    let log = SignalLog::load_jsonl(path)
        .with_context(|| format!("failed to read signal log {}", path.display()))?;
    if log.is_empty() {
        println!("No signals logged in {}", path.display());
        return Ok(());
    }

    for signal in log.latest(limit) {
        if json {
            println!("{}", serde_json::to_string(signal)?);
        } else {
            println!(
                "{}  {} {} {} @ {}  SL {}  TP1 {}  {}%",
                signal.timestamp,
                signal.direction,
                signal.symbol,
                signal.timeframe,
                format_price(signal.entry),
                format_price(signal.stop_loss),
                format_price(signal.targets.target1),
                signal.confidence
            );
        }
    }
    if !json {
        println!("{} of {} signals shown", limit.min(log.len()), log.len());
    }
    Ok(())
}
