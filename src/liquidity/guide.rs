// One-line explanations for the metrics and the snapshot fields

pub const FALLBACK: &str = "No explanation available.";

const GUIDE: &[(&str, &str)] = &[
    (
        "bid-ask spread",
        "The bid-ask spread shows how tight the market is. Smaller = more liquid.",
    ),
    (
        "amihud illiquidity",
        "Amihud Illiquidity measures price impact per unit volume. Lower = more liquid.",
    ),
    (
        "order book imbalance",
        "Shows which side dominates the market. Positive = more bids, negative = more asks.",
    ),
    (
        "kyle's lambda",
        "Estimates how much price moves per unit of signed volume. Lower = more liquid.",
    ),
    ("bid", "Highest price buyers are willing to pay."),
    ("ask", "Lowest price sellers will accept."),
    ("spread", "Ask - Bid (tighter = more liquid)."),
    ("volume", "Total traded quantity."),
    ("depth", "Quantity at top bid/ask levels."),
    ("execution price", "Simulated trade price."),
    ("expected price", "Midpoint of bid and ask or last traded price."),
];

/// Case-insensitive lookup by metric or field name.
pub fn explain(metric: &str) -> &'static str {
    let key = metric.trim().to_lowercase();
    GUIDE
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, text)| *text)
        .unwrap_or(FALLBACK)
}

/// Every name `explain` knows, metrics first.
pub fn topics() -> impl Iterator<Item = &'static str> {
    GUIDE.iter().map(|(name, _)| *name)
}
