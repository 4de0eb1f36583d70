use std::fmt;

use serde::Serialize;

use crate::market_data::snapshot::InstrumentSnapshot;

/// Coarse completeness tag for a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Quality {
    Full,
    Partial,
    Missing,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Full => "Full",
            Quality::Partial => "Partial",
            Quality::Missing => "Missing",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag a snapshot by which core fields it carries.
///
/// `Full` needs bid, ask and volume. Anything with a close or a volume is
/// at least `Partial`.
pub fn classify(snapshot: &InstrumentSnapshot) -> Quality {
    classify_fields(
        snapshot.bid(),
        snapshot.ask(),
        snapshot.close(),
        snapshot.volume(),
    )
}

pub(crate) fn classify_fields(
    bid: Option<f64>,
    ask: Option<f64>,
    close: Option<f64>,
    volume: Option<f64>,
) -> Quality {
    if bid.is_some() && ask.is_some() && volume.is_some() {
        Quality::Full
    } else if close.is_some() || volume.is_some() {
        Quality::Partial
    } else {
        Quality::Missing
    }
}
