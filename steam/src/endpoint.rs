use strum_macros::{Display, EnumString};

/// Steam Community endpoints, relative to the community base URL
#[derive(EnumString, Display, Copy, Clone, Debug)]
pub enum Endpoint {
    #[strum(serialize = "/market/priceoverview/")]
    PriceOverview,
    #[strum(serialize = "/inventory")]
    Inventory,
}
