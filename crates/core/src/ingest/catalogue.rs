/// A commodity tracked by the built-in feeds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommoditySpec {
    pub name: &'static str,
    pub grade: &'static str,
    pub current_price: f64,
    pub price_change: f64,
    /// Long-run level the synthetic history oscillates around.
    pub base_price: f64,
    pub volume: u64,
    pub high: f64,
    pub low: f64,
}

pub const TRACKED_COMMODITIES: &[CommoditySpec] = &[
    CommoditySpec {
        name: "White Maize",
        grade: "WMAZ",
        current_price: 4250.0,
        price_change: 50.0,
        base_price: 4000.0,
        volume: 1850,
        high: 4275.0,
        low: 4190.0,
    },
    CommoditySpec {
        name: "Yellow Maize",
        grade: "YMAZ",
        current_price: 4110.0,
        price_change: -25.0,
        base_price: 3950.0,
        volume: 1320,
        high: 4150.0,
        low: 4095.0,
    },
    CommoditySpec {
        name: "Wheat",
        grade: "WEAT",
        current_price: 5820.0,
        price_change: 40.0,
        base_price: 5600.0,
        volume: 940,
        high: 5840.0,
        low: 5770.0,
    },
    CommoditySpec {
        name: "Soybeans",
        grade: "SOYA",
        current_price: 7950.0,
        price_change: -60.0,
        base_price: 8200.0,
        volume: 610,
        high: 8020.0,
        low: 7930.0,
    },
    CommoditySpec {
        name: "Sunflower Seed",
        grade: "SUNS",
        current_price: 9020.0,
        price_change: 85.0,
        base_price: 9100.0,
        volume: 385,
        high: 9050.0,
        low: 8920.0,
    },
    CommoditySpec {
        name: "Sorghum",
        grade: "SORG",
        current_price: 3650.0,
        price_change: 0.0,
        base_price: 3500.0,
        volume: 120,
        high: 3660.0,
        low: 3630.0,
    },
];

/// Looks up a tracked commodity by name or grade code, ignoring case.
pub fn find(commodity: &str) -> Option<&'static CommoditySpec> {
    let wanted = commodity.trim();
    TRACKED_COMMODITIES
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(wanted) || c.grade.eq_ignore_ascii_case(wanted))
}
