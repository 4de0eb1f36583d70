use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Which venue family a command talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Market {
    Us,
    India,
    Forex,
}

#[derive(Debug, Error)]
#[error("unknown market `{0}` (expected us, india or forex)")]
pub struct UnknownMarket(pub String);

impl Market {
    pub const ALL: [Market; 3] = [Market::Us, Market::India, Market::Forex];

    pub fn label(&self) -> &'static str {
        match self {
            Market::Us => "US Market (Polygon)",
            Market::India => "India Market (DhanHQ)",
            Market::Forex => "Forex Market (FX)",
        }
    }

    /// Built-in (display name, venue symbol) pairs, in display order.
    pub fn instruments(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Market::Us => US_COMPANIES,
            Market::India => INDIA_COMPANIES,
            Market::Forex => FOREX_PAIRS,
        }
    }

    pub fn symbol_for(&self, name: &str) -> Option<&'static str> {
        self.instruments()
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, s)| *s)
    }

    /// Subset of the universe by display name, keeping universe order.
    /// Unknown names are returned separately.
    pub fn select<'a>(
        &self,
        names: &'a [String],
    ) -> (Vec<(&'static str, &'static str)>, Vec<&'a str>) {
        let unknown = names
            .iter()
            .filter(|n| self.symbol_for(n).is_none())
            .map(String::as_str)
            .collect();
        let picked = self
            .instruments()
            .iter()
            .filter(|(n, _)| names.iter().any(|w| n.eq_ignore_ascii_case(w)))
            .copied()
            .collect();
        (picked, unknown)
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Market {
    type Err = UnknownMarket;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" | "polygon" => Ok(Market::Us),
            "india" | "in" | "dhan" => Ok(Market::India),
            "forex" | "fx" => Ok(Market::Forex),
            other => Err(UnknownMarket(other.to_string())),
        }
    }
}

pub const US_COMPANIES: &[(&str, &str)] = &[
    ("Apple Inc. (AAPL)", "AAPL"),
    ("Alphabet Inc. (GOOGL)", "GOOGL"),
    ("Microsoft Corporation (MSFT)", "MSFT"),
    ("NVIDIA Corporation (NVDA)", "NVDA"),
    ("Tesla, Inc. (TSLA)", "TSLA"),
    ("Amazon.com, Inc. (AMZN)", "AMZN"),
    ("Meta Platforms, Inc. (META)", "META"),
    ("Intel Corporation (INTC)", "INTC"),
    ("Advanced Micro Devices, Inc. (AMD)", "AMD"),
    ("Oracle Corporation (ORCL)", "ORCL"),
    ("Cisco Systems, Inc. (CSCO)", "CSCO"),
    ("IBM Corporation (IBM)", "IBM"),
    ("Netflix, Inc. (NFLX)", "NFLX"),
    ("Broadcom Inc. (AVGO)", "AVGO"),
    ("Qualcomm Inc. (QCOM)", "QCOM"),
    ("Salesforce, Inc. (CRM)", "CRM"),
    ("PayPal Holdings, Inc. (PYPL)", "PYPL"),
    ("Adobe Inc. (ADBE)", "ADBE"),
    ("Costco Wholesale (COST)", "COST"),
    ("Walmart Inc. (WMT)", "WMT"),
    ("The Coca-Cola Company (KO)", "KO"),
    ("PepsiCo, Inc. (PEP)", "PEP"),
    ("McDonald's Corporation (MCD)", "MCD"),
    ("Boeing Company (BA)", "BA"),
    ("JPMorgan Chase & Co. (JPM)", "JPM"),
    ("Bank of America (BAC)", "BAC"),
    ("Visa Inc. (V)", "V"),
    ("Mastercard Inc. (MA)", "MA"),
    ("Exxon Mobil Corporation (XOM)", "XOM"),
    ("Chevron Corporation (CVX)", "CVX"),
    ("Pfizer Inc. (PFE)", "PFE"),
    ("Johnson & Johnson (JNJ)", "JNJ"),
];

pub const INDIA_COMPANIES: &[(&str, &str)] = &[
    ("Reliance Industries (RELIANCE)", "RELIANCE"),
    ("Tata Consultancy Services (TCS)", "TCS"),
    ("HDFC Bank (HDFCBANK)", "HDFCBANK"),
    ("Infosys (INFY)", "INFY"),
    ("ICICI Bank (ICICIBANK)", "ICICIBANK"),
    ("State Bank of India (SBIN)", "SBIN"),
    ("Larsen & Toubro (LT)", "LT"),
    ("Bharti Airtel (AIRTEL)", "AIRTEL"),
    ("Hindustan Unilever (HINDUNILVR)", "HINDUNILVR"),
    ("ITC Limited (ITC)", "ITC"),
    ("Kotak Mahindra Bank (KOTAKBANK)", "KOTAKBANK"),
    ("Axis Bank (AXISBANK)", "AXISBANK"),
    ("Bajaj Finance (BAJFINANCE)", "BAJFINANCE"),
    ("Bajaj Finserv (BAJAJFINSV)", "BAJAJFINSV"),
    ("Maruti Suzuki (MARUTI)", "MARUTI"),
    ("Mahindra & Mahindra (M&M)", "M&M"),
    ("UltraTech Cement (ULTRACEMCO)", "ULTRACEMCO"),
    ("Asian Paints (ASIANPAINT)", "ASIANPAINT"),
    ("Titan Company (TITAN)", "TITAN"),
    ("Sun Pharma (SUNPHARMA)", "SUNPHARMA"),
    ("Wipro (WIPRO)", "WIPRO"),
    ("Tech Mahindra (TECHM)", "TECHM"),
    ("Power Grid Corporation (POWERGRID)", "POWERGRID"),
    ("NTPC Limited (NTPC)", "NTPC"),
    ("Coal India (COALINDIA)", "COALINDIA"),
    ("Adani Enterprises (ADANIENT)", "ADANIENT"),
    ("Adani Ports (ADANIPORTS)", "ADANIPORTS"),
    ("JSW Steel (JSWSTEEL)", "JSWSTEEL"),
    ("Tata Steel (TATASTEEL)", "TATASTEEL"),
    ("HCL Technologies (HCLTECH)", "HCLTECH"),
    ("Nestle India (NESTLEIND)", "NESTLEIND"),
    ("SBI Life Insurance (SBILIFE)", "SBILIFE"),
    ("HDFC Life Insurance (HDFCLIFE)", "HDFCLIFE"),
    ("Divi's Laboratories (DIVISLAB)", "DIVISLAB"),
    ("Dr. Reddy's Laboratories (DRREDDY)", "DRREDDY"),
    ("Eicher Motors (EICHERMOT)", "EICHERMOT"),
    ("Hero MotoCorp (HEROMOTOCO)", "HEROMOTOCO"),
    ("Tata Motors (TATAMOTORS)", "TATAMOTORS"),
    ("Britannia Industries (BRITANNIA)", "BRITANNIA"),
    ("Grasim Industries (GRASIM)", "GRASIM"),
    ("Havells India (HAVELLS)", "HAVELLS"),
    ("Zomato (ZOMATO)", "ZOMATO"),
    ("Paytm (PAYTM)", "PAYTM"),
    ("IRCTC (IRCTC)", "IRCTC"),
    ("Adani Green Energy (ADANIGREEN)", "ADANIGREEN"),
    ("Adani Total Gas (ATGL)", "ATGL"),
    ("Tata Power (TATAPOWER)", "TATAPOWER"),
    ("Tata Elxsi (TATAELXSI)", "TATAELXSI"),
    ("Persistent Systems (PERSISTENT)", "PERSISTENT"),
    ("Coforge (COFORGE)", "COFORGE"),
    ("Mphasis (MPHASIS)", "MPHASIS"),
    ("DLF Limited (DLF)", "DLF"),
    ("Godrej Properties (GODREJPROP)", "GODREJPROP"),
    ("Hindalco Industries (HINDALCO)", "HINDALCO"),
    ("Vedanta (VEDL)", "VEDL"),
    ("Bank of Baroda (BANKBARODA)", "BANKBARODA"),
    ("Punjab National Bank (PNB)", "PNB"),
];

// Binance quotes most majors against USDT
pub const FOREX_PAIRS: &[(&str, &str)] = &[
    ("EUR/USD (EURUSD)", "EURUSDT"),
    ("GBP/USD (GBPUSD)", "GBPUSDT"),
    ("USD/JPY (USDJPY)", "USDJPY"),
    ("USD/CHF (USDCHF)", "USDCHF"),
    ("AUD/USD (AUDUSD)", "AUDUSDT"),
    ("NZD/USD (NZDUSD)", "NZDUSDT"),
    ("USD/CAD (USDCAD)", "USDCAD"),
    ("EUR/GBP (EURGBP)", "EURGBP"),
    ("EUR/JPY (EURJPY)", "EURJPY"),
    ("GBP/JPY (GBPJPY)", "GBPJPY"),
    ("AUD/JPY (AUDJPY)", "AUDJPY"),
    ("CHF/JPY (CHFJPY)", "CHFJPY"),
];
