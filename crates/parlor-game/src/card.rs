//! The card catalog.
//!
//! The catalog is the fixed definition of every card in the game: each
//! entry expands into `count` identical [`Card`] values when a deck is
//! built. Card effects are resolved socially at the table — the server
//! only tracks the cards themselves.

use parlor_protocol::Card;

/// One catalog entry: a card definition plus how many copies the deck
/// contains.
#[derive(Debug, Clone, Copy)]
pub struct CardSpec {
    pub name: &'static str,
    pub desc: &'static str,
    pub color: &'static str,
    pub count: usize,
}

impl CardSpec {
    /// Produces one playable copy of this card.
    pub fn to_card(&self) -> Card {
        Card {
            name: self.name.to_string(),
            desc: self.desc.to_string(),
            color: self.color.to_string(),
        }
    }
}

/// The full card catalog. Deterministic; only the shuffle is random.
pub const CATALOG: &[CardSpec] = &[
    CardSpec {
        name: "Detour",
        desc: "Move straight to the Gauntlet.",
        color: "#d32f2f",
        count: 2,
    },
    CardSpec {
        name: "Guilty Verdict",
        desc: "Everyone moves to the Gauntlet together.",
        color: "#7b1fa2",
        count: 1,
    },
    CardSpec {
        name: "Kitten Curse",
        desc: "Pick a player: they must end every sentence with 'meow'. \
               Each slip costs one composure point. Stacks with similar \
               curses instead of replacing them.",
        color: "#f06292",
        count: 1,
    },
    CardSpec {
        name: "Noble Curse",
        desc: "Pick a player: they must end every sentence with 'indeed'. \
               Each slip costs one composure point. Stacks with similar \
               curses instead of replacing them.",
        color: "#f06292",
        count: 1,
    },
    CardSpec {
        name: "Time Stop",
        desc: "Pick a player and skip their next turn.",
        color: "#1976d2",
        count: 2,
    },
    CardSpec {
        name: "Demolition",
        desc: "Pick a player and destroy one of their claimed venues; it \
               must be re-earned. If they hold several, you choose which.",
        color: "#388e3c",
        count: 1,
    },
    CardSpec {
        name: "Mirror",
        desc: "Reflect the most recent curse or skip played on you back at \
               its caster. If you are holding a curse, it is lifted instead.",
        color: "#fbc02d",
        count: 1,
    },
    CardSpec {
        name: "Windfall",
        desc: "Good news: your composure total drops by 5.",
        color: "#0097a7",
        count: 2,
    },
    CardSpec {
        name: "Once in a Lifetime",
        desc: "Teleport one space away from an unfinished challenge and end \
               your turn. If every challenge is done, move beside the Summit.",
        color: "#e64a19",
        count: 1,
    },
];

/// Total number of cards a freshly built deck contains.
pub fn catalog_size() -> usize {
    CATALOG.iter().map(|spec| spec.count).sum()
}
