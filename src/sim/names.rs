//! Unique display names for enemies and bosses
//!
//! Names are two words drawn from separate pools. Each pool tracks the words
//! already handed out and only refills once it runs dry, so names stay
//! varied; the full names handed out are tracked for the whole session so
//! no two enemies ever share one.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::IndexedRandom;

/// First words for regular enemies
pub const FIRST_WORDS: [&str; 20] = [
    "Rusty", "Grim", "Sly", "Crooked", "Mad", "Lanky", "Gloomy", "Shifty", "Rowdy", "Grumpy",
    "Sneaky", "Brash", "Feral", "Scrappy", "Surly", "Dusty", "Jittery", "Greasy", "Wiry", "Cranky",
];

/// Second words for regular enemies
pub const SECOND_WORDS: [&str; 19] = [
    "Badger", "Weasel", "Jackal", "Buzzard", "Ferret", "Hyena", "Vulture", "Rat", "Stoat",
    "Mongrel", "Goblin", "Gremlin", "Toad", "Lizard", "Viper", "Crow", "Magpie", "Boar", "Mole",
];

/// Rank titles for bosses (never used by regular enemies)
pub const BOSS_TITLES: [&str; 5] = ["Warlord", "Commander", "Overlord", "Baron", "Tyrant"];

/// Redraws allowed before a numeric suffix is used to force uniqueness
const MAX_REDRAWS: u32 = 1024;

/// Tracks word and name usage across a whole session
#[derive(Debug, Clone, Default)]
pub struct NameAllocator {
    used_first: HashSet<String>,
    used_second: HashSet<String>,
    /// Boss pools are tracked apart from the regular ones
    used_titles: HashSet<String>,
    used_boss_words: HashSet<String>,
    used_names: HashSet<String>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name for a regular enemy, e.g. "Rusty Badger"
    pub fn regular<R: Rng>(&mut self, rng: &mut R) -> String {
        allocate_name(
            rng,
            &FIRST_WORDS,
            &SECOND_WORDS,
            &mut self.used_first,
            &mut self.used_second,
            &mut self.used_names,
            str::to_string,
        )
    }

    /// Name for a boss, e.g. "Warlord Grim"
    ///
    /// The second word comes from the regular first-word pool, capitalized.
    pub fn boss<R: Rng>(&mut self, rng: &mut R) -> String {
        allocate_name(
            rng,
            &BOSS_TITLES,
            &FIRST_WORDS,
            &mut self.used_titles,
            &mut self.used_boss_words,
            &mut self.used_names,
            capitalize,
        )
    }

    /// True if the name was handed out this session
    pub fn is_used(&self, name: &str) -> bool {
        self.used_names.contains(name)
    }

    /// Number of names handed out this session
    pub fn len(&self) -> usize {
        self.used_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used_names.is_empty()
    }
}

/// Draw a word from `pool` that is not in `used`, refilling the pool first
/// when every word has been taken
fn draw_word<R: Rng>(
    rng: &mut R,
    pool: &[&str],
    used: &mut HashSet<String>,
    shape: fn(&str) -> String,
) -> String {
    let mut available: Vec<&str> = pool
        .iter()
        .copied()
        .filter(|w| !used.contains(&shape(w)))
        .collect();
    if available.is_empty() {
        used.clear();
        available = pool.to_vec();
    }
    // Pools are compile-time constants and never empty
    shape(available.choose(rng).copied().unwrap_or_default())
}

/// Allocate a fresh "{first} {second}" name
///
/// Words are drawn from the unused part of each pool; an exhausted pool is
/// refilled without touching the other one. Combinations that were already
/// handed out are redrawn. After `MAX_REDRAWS` collisions a numeric suffix
/// guarantees termination.
pub fn allocate_name<R: Rng>(
    rng: &mut R,
    pool_a: &[&str],
    pool_b: &[&str],
    used_a: &mut HashSet<String>,
    used_b: &mut HashSet<String>,
    used_names: &mut HashSet<String>,
    shape_b: fn(&str) -> String,
) -> String {
    let mut redraws = 0;
    let (first, second, name) = loop {
        let first = draw_word(rng, pool_a, used_a, str::to_string);
        let second = draw_word(rng, pool_b, used_b, shape_b);
        let name = format!("{first} {second}");
        if !used_names.contains(&name) {
            break (first, second, name);
        }
        redraws += 1;
        if redraws >= MAX_REDRAWS {
            let mut n = 2;
            let name = loop {
                let candidate = format!("{name} {n}");
                if !used_names.contains(&candidate) {
                    break candidate;
                }
                n += 1;
            };
            log::warn!("Name pools saturated, using suffixed name '{}'", name);
            break (first, second, name);
        }
    };

    used_a.insert(first);
    used_b.insert(second);
    used_names.insert(name.clone());
    name
}

/// Uppercase the first character, lowercase the rest
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
