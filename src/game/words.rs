use rand::seq::IndexedRandom;

// Topics the citizens receive at round start. The odd-one-out never sees the
// drawn topic and has to bluff around it.
const DEFAULT_TOPICS: [&str; 32] = [
    "pizza",
    "subway",
    "library",
    "campfire",
    "umbrella",
    "aquarium",
    "karaoke",
    "telescope",
    "waterfall",
    "skateboard",
    "lighthouse",
    "chopsticks",
    "trampoline",
    "snowman",
    "hammock",
    "vending machine",
    "rollercoaster",
    "bakery",
    "parachute",
    "fireworks",
    "escalator",
    "greenhouse",
    "accordion",
    "submarine",
    "scarecrow",
    "windmill",
    "igloo",
    "fountain",
    "treadmill",
    "origami",
    "bonfire",
    "drone",
];

/// Read-only set of candidate topics, fixed at construction time.
#[derive(Debug, Clone)]
pub struct WordPool {
    topics: Vec<String>,
}

impl WordPool {
    pub fn new(topics: Vec<String>) -> Self {
        Self { topics }
    }

    /// Draws one topic uniformly at random. `None` only for an empty pool.
    pub fn pick_topic(&self) -> Option<String> {
        self.topics.choose(&mut rand::rng()).cloned()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

impl Default for WordPool {
    fn default() -> Self {
        Self::new(DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect())
    }
}
