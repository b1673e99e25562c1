use {
    anyhow::Result,
    chrono::{Datelike, Local, Weekday},
    rank_scope::{
        codec::{checksum, encode},
        models::{Expiry, LicenseStatus},
        utils::DateUtils,
    },
};

// Small enough to eyeball in a pager, big enough to exercise windows and
// the moving-average columns.
const DEMO_TRADING_DAYS: usize = 60;
const OUTPUT_PATH: &str = "demo_rank_snapshot.csv";
const DEMO_USER_ID: &str = "90001";

struct DemoInstrument {
    id: &'static str,
    name: &'static str,
    base_price: f64,
    base_rank: f64,
}

const DEMO_INSTRUMENTS: &[DemoInstrument] = &[
    DemoInstrument {
        id: "2330.TW",
        name: "TSMC",
        base_price: 600.0,
        base_rank: 92.0,
    },
    DemoInstrument {
        id: "2454.TW",
        name: "MediaTek",
        base_price: 900.0,
        base_rank: 75.0,
    },
    DemoInstrument {
        id: "2603.TW",
        name: "Evergreen",
        base_price: 150.0,
        base_rank: 55.0,
    },
    DemoInstrument {
        id: "1101.TW",
        name: "TaiwanCement",
        base_price: 35.0,
        base_rank: 22.0,
    },
];

/// Trading dates (weekdays only), newest first, compact yyyymmdd.
fn demo_dates() -> Vec<String> {
    let mut dates = Vec::with_capacity(DEMO_TRADING_DAYS);
    let mut day = Local::now().date_naive();
    while dates.len() < DEMO_TRADING_DAYS {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            dates.push(day.format(DateUtils::COMPACT_FORMAT).to_string());
        }
        day = day.pred_opt().expect("date underflow");
    }
    dates
}

fn join(values: impl Iterator<Item = String>) -> String {
    values.collect::<Vec<_>>().join("/")
}

/// Deterministic price wiggle so the demo renders interesting ranks
/// without pulling in a rng.
fn wave(seed: f64, i: usize) -> f64 {
    ((i as f64) * 0.37 + seed).sin()
}

fn instrument_row(inst: &DemoInstrument, dates: &[String]) -> String {
    let n = dates.len();
    let seed = inst.base_price;

    let close: Vec<f64> = (0..n)
        .map(|i| inst.base_price * (1.0 + 0.02 * wave(seed, i) - 0.001 * i as f64))
        .collect();
    let open: Vec<f64> = close.iter().map(|c| c * 0.995).collect();
    let high: Vec<f64> = close.iter().map(|c| c * 1.01).collect();
    let low: Vec<f64> = close.iter().map(|c| c * 0.99).collect();
    let volume: Vec<f64> = (0..n)
        .map(|i| (8000.0 + 4000.0 * wave(seed * 2.0, i)).round())
        .collect();

    let rank = |offset: f64, i: usize| -> f64 {
        (inst.base_rank + 8.0 * wave(seed + offset, i)).clamp(0.0, 100.0)
    };
    let price_rank: Vec<f64> = (0..n).map(|i| rank(1.0, i).round()).collect();
    let vol_rank: Vec<f64> = (0..n).map(|i| rank(2.0, i).round()).collect();

    let sma = |w: usize, i: usize| -> f64 {
        let end = (i + w).min(n);
        let slice = &close[i..end];
        slice.iter().sum::<f64>() / slice.len() as f64
    };

    let vol_high = (0..n).map(|i| {
        if volume[i] > 11_500.0 {
            "600".to_string()
        } else if volume[i] > 11_000.0 {
            "200".to_string()
        } else {
            "0".to_string()
        }
    });

    let fmt = |v: &[f64]| join(v.iter().map(|x| format!("{x:.2}")));
    let fmt_int = |v: &[f64]| join(v.iter().map(|x| format!("{x:.0}")));

    format!(
        "1,\"{id}\",{name},{dates},{open},{high},{low},{close},{volume},{pr},{vr},{sma20},{sma50},{sma150},{sma200},{vh}",
        id = inst.id,
        name = inst.name,
        dates = dates.join("/"),
        open = fmt(&open),
        high = fmt(&high),
        low = fmt(&low),
        close = fmt(&close),
        volume = fmt_int(&volume),
        pr = fmt_int(&price_rank),
        vr = fmt_int(&vol_rank),
        sma20 = fmt(&(0..n).map(|i| sma(20, i)).collect::<Vec<_>>()),
        sma50 = fmt(&(0..n).map(|i| sma(50, i)).collect::<Vec<_>>()),
        sma150 = fmt(&(0..n).map(|i| sma(150, i)).collect::<Vec<_>>()),
        sma200 = fmt(&(0..n).map(|i| sma(200, i)).collect::<Vec<_>>()),
        vh = join(vol_high),
    )
}

fn main() -> Result<()> {
    // 1. Setup Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2. Build a token that passes the gate for today's snapshot
    let dates = demo_dates();
    let first_date: u64 = dates[0].parse()?;
    let signature = checksum(first_date);
    let token = encode(signature, LicenseStatus::Vip, &Expiry::Permanent, DEMO_USER_ID);

    log::info!("🚀 Building demo snapshot for data date {}", dates[0]);
    log::info!("Signature for that date: {:04}", signature);

    // 3. Assemble the file
    let mut out = String::new();
    out.push_str("exported by rank-scope demo generator\n");
    out.push_str(&format!(
        "Seq,Code,Name,{token},Open,High,Low,Close,Volume,PriceRank,VolRank,Sma20,Sma50,Sma150,Sma200,VolHigh\n"
    ));
    for inst in DEMO_INSTRUMENTS {
        out.push_str(&instrument_row(inst, &dates));
        out.push('\n');
    }

    std::fs::write(OUTPUT_PATH, &out)?;

    log::info!(
        "✅ Wrote {} ({} instruments, {} trading days)",
        OUTPUT_PATH,
        DEMO_INSTRUMENTS.len(),
        dates.len()
    );
    log::info!("Try it:  rank-scope {}", OUTPUT_PATH);

    Ok(())
}
