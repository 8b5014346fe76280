//! Which cards can still be picked for an encounter. A card held by one side is unavailable to both.

use crate::model::{Card, Encounter, Hand, Role, ALL_CARDS};

/// All cards, in catalog order, that neither hand holds.
pub fn available_cards(attacker_hand: &Hand, defender_hand: &Hand) -> Vec<Card> {
    ALL_CARDS
        .iter()
        .copied()
        .filter(|card| !attacker_hand.contains(*card) && !defender_hand.contains(*card))
        .collect()
}

pub fn hand_is_full(hand: &Hand) -> bool {
    hand.is_full()
}

/// Cards that `role` may add right now: nothing once its own hand is full.
pub fn selectable_cards(encounter: &Encounter, role: Role) -> Vec<Card> {
    if hand_is_full(&encounter.side(role).hand) {
        return Vec::new();
    }
    available_cards(&encounter.attacker().hand, &encounter.defender().hand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Side;

    #[test]
    fn nothing_selected_leaves_every_card() {
        assert_eq!(available_cards(&Hand::empty(), &Hand::empty()), ALL_CARDS.to_vec());
    }

    #[test]
    fn attacker_card_is_hidden_from_defender() {
        let attacker = Hand::new([Card::Cruel]).unwrap();
        let defender = Hand::new([Card::Stubborn]).unwrap();
        let available = available_cards(&attacker, &defender);
        assert!(!available.contains(&Card::Cruel));
        assert!(!available.contains(&Card::Stubborn));
        assert_eq!(available.len(), 5);
        assert_eq!(available[0], Card::Ferocious);
    }

    #[test]
    fn full_hand_disables_its_side_only() {
        let encounter = Encounter::unresolved(
            Side::from_parts(3, &[Card::Cruel, Card::Scrappy, Card::Rational]).unwrap(),
            Side::default(),
        )
        .unwrap();
        assert!(selectable_cards(&encounter, Role::Attacker).is_empty());
        assert_eq!(
            selectable_cards(&encounter, Role::Defender),
            vec![Card::Ferocious, Card::Relentless, Card::Strategic, Card::Stubborn]
        );
    }
}
