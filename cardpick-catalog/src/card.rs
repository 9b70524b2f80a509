use serde::{Deserialize, Serialize};

/// Category labels carried by catalog cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tag {
    Rewards,
    Cashback,
    Travel,
    Fuel,
    Shopping,
    Dining,
    Groceries,
    DomesticLounge,
    InternationalLounge,
    LifetimeFree,
    Premium,
    UltraPremium,
    Secured,
}

/// A recommendable credit card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    /// Brand/grouping label, e.g. the issuing bank
    pub issuer: String,
    pub tags: Vec<Tag>,
    /// Annual fee; 0 means lifetime free
    pub annual_fee: u32,
}

impl Card {
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn is_lifetime_free(&self) -> bool {
        self.annual_fee == 0
    }
}
