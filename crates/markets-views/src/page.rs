//! Dashboard pages.

use serde::{Deserialize, Serialize};

/// The two selectable dashboard pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Page {
    #[default]
    StockPrices,
    FxRates,
}

impl Page {
    /// Page name shown in the selector.
    pub fn title(&self) -> &'static str {
        match self {
            Page::StockPrices => "Daily Stock Performance Data",
            Page::FxRates => "Exchange (FX) Rates",
        }
    }

    /// Heading shown above the chart.
    pub fn subheader(&self) -> &'static str {
        match self {
            Page::StockPrices => "Stock Performance on the Nasdaq for the Magnificent 7",
            Page::FxRates => "EUR Exchange (FX) Rates by Currency Over Time",
        }
    }

    /// The other page.
    pub fn next(&self) -> Page {
        match self {
            Page::StockPrices => Page::FxRates,
            Page::FxRates => Page::StockPrices,
        }
    }

    /// Position in [`Page::all`].
    pub fn index(&self) -> usize {
        match self {
            Page::StockPrices => 0,
            Page::FxRates => 1,
        }
    }

    /// All pages in selector order.
    pub fn all() -> &'static [Page] {
        &[Page::StockPrices, Page::FxRates]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_cycle() {
        assert_eq!(Page::default(), Page::StockPrices);
        assert_eq!(Page::StockPrices.next(), Page::FxRates);
        assert_eq!(Page::FxRates.next(), Page::StockPrices);
        for (i, page) in Page::all().iter().enumerate() {
            assert_eq!(page.index(), i);
        }
    }
}
