use std::collections::HashMap;

use crate::card::Card;

/// Immutable in-memory card catalog with lookup by id
#[derive(Debug, Clone)]
pub struct Catalog {
    cards: Vec<Card>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate card ids and untagged cards.
    /// Every card must carry at least one tag to take part in tag-based
    /// filtering.
    pub fn new(cards: Vec<Card>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(cards.len());
        for (idx, card) in cards.iter().enumerate() {
            if card.tags.is_empty() {
                return Err(CatalogError::UntaggedCard(card.id.clone()));
            }
            if by_id.insert(card.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateCardId(card.id.clone()));
            }
        }
        Ok(Self { cards, by_id })
    }

    pub fn get(&self, id: &str) -> Option<&Card> {
        self.by_id.get(id).map(|&idx| &self.cards[idx])
    }

    /// All cards in declaration order
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Duplicate card id in catalog: {0}")]
    DuplicateCardId(String),

    #[error("Card {0} has no tags")]
    UntaggedCard(String),
}
