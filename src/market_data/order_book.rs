use serde::Serialize;

/// One price level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Level {
    pub price: f64,
    pub quantity: f64,
}

/// One side of a venue book, kept in the order the venue sent it
/// (best price first).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderBookSide {
    levels: Vec<Level>,
}

impl OrderBookSide {
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self {
            levels: pairs
                .iter()
                .map(|&(price, quantity)| Level { price, quantity })
                .collect(),
        }
    }

    pub fn best(&self) -> Option<Level> {
        self.levels.first().copied()
    }

    pub fn total_quantity(&self) -> f64 {
        self.levels.iter().map(|l| l.quantity).sum()
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

// Both sides of one orderbook fetch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderBook {
    pub bids: OrderBookSide,
    pub asks: OrderBookSide,
}

impl OrderBook {
    pub fn new(bids: OrderBookSide, asks: OrderBookSide) -> Self {
        Self { bids, asks }
    }

    pub fn bbo(&self) -> (Option<Level>, Option<Level>) {
        (self.bids.best(), self.asks.best())
    }

    /// Top-of-book spread, `None` when either side is empty.
    pub fn spread(&self) -> Option<f64> {
        match self.bbo() {
            (Some(bid), Some(ask)) => Some(ask.price - bid.price),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() || self.asks.is_empty()
    }
}
