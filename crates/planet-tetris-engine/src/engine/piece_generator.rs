use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Seed for deterministic piece generation.
///
/// This is a 128-bit (16-byte) seed used to initialize the random number
/// generator of a [`PieceGenerator`]. Using the same seed produces the same
/// sequence of pieces, which makes sessions replayable and tests deterministic.
///
/// Seeds are written as 32 hex digits, both in JSON and on the command line.
///
/// # Example
///
/// ```
/// use planet_tetris_engine::{PieceGenerator, PieceSeed, SelectionPolicy};
/// use rand::Rng as _;
///
/// // Generate a random seed
/// let seed: PieceSeed = rand::rng().random();
///
/// let mut first = PieceGenerator::with_seed(seed, SelectionPolicy::Uniform);
/// let mut second = PieceGenerator::with_seed(seed, SelectionPolicy::Uniform);
/// for _ in 0..20 {
///     assert_eq!(first.pop_next(), second.pop_next());
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSeed([u8; 16]);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: expected 32 hex digits")]
pub struct ParsePieceSeedError {
    input: String,
}

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    /// Derives `count` independent seeds from this one.
    ///
    /// The result only depends on `self`, so a seeded planet always hands the
    /// same seed to each of its sides.
    #[must_use]
    pub fn split(self, count: usize) -> Vec<PieceSeed> {
        let mut rng = Pcg32::from_seed(self.0);
        (0..count).map(|_| rng.random()).collect()
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParsePieceSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(error());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| error())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values using the standard random distribution.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// How the next piece kind is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionPolicy {
    /// Every draw picks one of the seven kinds with equal probability.
    #[default]
    Uniform,
    /// Kinds are dealt from shuffled bags holding one of each kind.
    SevenBag,
}

/// Supplies the piece sequence of one side.
///
/// The generator always keeps at least one upcoming piece queued, so the next
/// kind can be previewed before it spawns.
///
/// # Example
///
/// ```
/// use planet_tetris_engine::{PieceGenerator, PieceKind, PieceSeed, SelectionPolicy};
///
/// let seed = PieceSeed::from_bytes([7; 16]);
/// let mut generator =
///     PieceGenerator::with_queue([PieceKind::I, PieceKind::O], seed, SelectionPolicy::SevenBag);
///
/// assert_eq!(generator.peek_next(), PieceKind::I);
/// assert_eq!(generator.pop_next(), PieceKind::I);
/// assert_eq!(generator.pop_next(), PieceKind::O);
///
/// // Afterwards the policy takes over.
/// let upcoming: Vec<_> = generator.next_pieces().take(7).collect();
/// assert_eq!(upcoming.len(), 7);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawPieceGenerator")]
pub struct PieceGenerator {
    rng: Pcg32,
    policy: SelectionPolicy,
    queue: VecDeque<PieceKind>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPieceGenerator {
    rng: Pcg32,
    policy: SelectionPolicy,
    #[serde(default)]
    queue: VecDeque<PieceKind>,
}

impl From<RawPieceGenerator> for PieceGenerator {
    fn from(raw: RawPieceGenerator) -> Self {
        let RawPieceGenerator { rng, policy, queue } = raw;
        let mut this = Self { rng, policy, queue };
        this.refill();
        this
    }
}

impl PieceGenerator {
    /// Creates a generator with a random seed.
    #[must_use]
    pub fn new(policy: SelectionPolicy) -> Self {
        Self::with_seed(rand::rng().random(), policy)
    }

    /// Like [`Self::new`], but with a specific seed for deterministic piece generation.
    #[must_use]
    pub fn with_seed(seed: PieceSeed, policy: SelectionPolicy) -> Self {
        Self::with_queue([], seed, policy)
    }

    /// Creates a generator that deals `queue` first and then continues with `policy`.
    #[must_use]
    pub fn with_queue(
        queue: impl IntoIterator<Item = PieceKind>,
        seed: PieceSeed,
        policy: SelectionPolicy,
    ) -> Self {
        let mut this = Self {
            rng: Pcg32::from_seed(seed.0),
            policy,
            queue: queue.into_iter().collect(),
        };
        this.refill();
        this
    }

    #[must_use]
    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Tops up the queue.
    ///
    /// Afterwards the queue holds at least two pieces under the uniform policy and
    /// at least eight under the bag policy, so one pop still leaves a preview.
    fn refill(&mut self) {
        match self.policy {
            SelectionPolicy::Uniform => {
                while self.queue.len() < 2 {
                    let kind = self.rng.random();
                    self.queue.push_back(kind);
                }
            }
            SelectionPolicy::SevenBag => {
                while self.queue.len() <= PieceKind::LEN {
                    let mut bag = PieceKind::ALL;
                    bag.shuffle(&mut self.rng);
                    self.queue.extend(bag);
                }
            }
        }
    }

    /// Draws the next piece.
    pub fn pop_next(&mut self) -> PieceKind {
        self.refill();
        let kind = self.queue.pop_front().unwrap_or_else(|| self.rng.random());
        self.refill();
        kind
    }

    /// Returns the kind that the next [`Self::pop_next`] yields.
    #[must_use]
    pub fn peek_next(&self) -> PieceKind {
        self.queue.front().copied().unwrap_or(PieceKind::I)
    }

    /// Returns an iterator over the queued pieces.
    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn seed() -> PieceSeed {
        PieceSeed::from_bytes([
            0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66,
            0x77, 0x88,
        ])
    }

    mod piece_seed_serialization {
        use super::*;

        #[test]
        fn test_roundtrip_random_seed() {
            let seed: PieceSeed = rand::rng().random();
            let serialized = serde_json::to_string(&seed).unwrap();
            let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(seed, deserialized);
        }

        #[test]
        fn test_known_value_sequential_bytes() {
            // Big-endian: bytes appear in order as hex pairs
            let seed = PieceSeed::from_bytes([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");
            assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
        }

        #[test]
        fn test_known_value_all_zeros() {
            let seed = PieceSeed::from_bytes([0; 16]);
            assert_eq!(
                serde_json::to_string(&seed).unwrap(),
                "\"00000000000000000000000000000000\""
            );
        }

        #[test]
        fn test_parse_uppercase_hex() {
            let seed: PieceSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
            assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
        }

        #[test]
        fn test_rejects_malformed_hex() {
            for input in [
                "",
                "0123456789abcdef0123456789abcde",
                "0123456789abcdef0123456789abcdef0",
                "ghijklmnopqrstuvwxyzghijklmnopqr",
                "+123456789abcdef0123456789abcdef",
            ] {
                assert!(input.parse::<PieceSeed>().is_err(), "{input}");
                let json = format!("\"{input}\"");
                let err = serde_json::from_str::<PieceSeed>(&json).unwrap_err();
                assert!(err.to_string().contains("invalid hex"), "{err}");
            }
        }
    }

    #[test]
    fn test_split_is_deterministic_and_distinct() {
        let seeds = seed().split(8);
        assert_eq!(seeds, seed().split(8));
        assert_eq!(seeds.iter().collect::<HashSet<_>>().len(), 8);
        assert_eq!(seed().split(3), seeds[..3]);
    }

    #[test]
    fn test_deterministic_piece_generation() {
        for policy in [SelectionPolicy::Uniform, SelectionPolicy::SevenBag] {
            let mut first = PieceGenerator::with_seed(seed(), policy);
            let mut second = PieceGenerator::with_seed(seed(), policy);
            for _ in 0..50 {
                assert_eq!(first.pop_next(), second.pop_next());
            }
        }
    }

    #[test]
    fn test_peek_matches_pop() {
        for policy in [SelectionPolicy::Uniform, SelectionPolicy::SevenBag] {
            let mut generator = PieceGenerator::with_seed(seed(), policy);
            for _ in 0..30 {
                let peeked = generator.peek_next();
                assert_eq!(generator.pop_next(), peeked);
            }
        }
    }

    #[test]
    fn test_seven_bag_deals_each_kind_once_per_bag() {
        let mut generator = PieceGenerator::with_seed(seed(), SelectionPolicy::SevenBag);
        for _ in 0..5 {
            let bag: HashSet<_> = (0..PieceKind::LEN).map(|_| generator.pop_next()).collect();
            assert_eq!(bag.len(), PieceKind::LEN);
        }
    }

    #[test]
    fn test_uniform_draws_every_kind_eventually() {
        let mut generator = PieceGenerator::with_seed(seed(), SelectionPolicy::Uniform);
        let seen: HashSet<_> = (0..500).map(|_| generator.pop_next()).collect();
        assert_eq!(seen.len(), PieceKind::LEN);
    }

    #[test]
    fn test_explicit_queue_comes_first() {
        let queue = [PieceKind::Z, PieceKind::Z, PieceKind::T];
        let mut generator = PieceGenerator::with_queue(queue, seed(), SelectionPolicy::Uniform);
        assert_eq!(generator.pop_next(), PieceKind::Z);
        assert_eq!(generator.pop_next(), PieceKind::Z);
        assert_eq!(generator.peek_next(), PieceKind::T);
        assert_eq!(generator.pop_next(), PieceKind::T);
    }

    #[test]
    fn test_generator_state_survives_serialization() {
        let mut generator = PieceGenerator::with_seed(seed(), SelectionPolicy::SevenBag);
        for _ in 0..3 {
            generator.pop_next();
        }
        let json = serde_json::to_string(&generator).unwrap();
        let mut restored: PieceGenerator = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.policy(), SelectionPolicy::SevenBag);
        for _ in 0..20 {
            assert_eq!(restored.pop_next(), generator.pop_next());
        }
    }

    #[test]
    fn test_restored_empty_queue_keeps_preview_in_sync() {
        for policy in [SelectionPolicy::Uniform, SelectionPolicy::SevenBag] {
            let generator = PieceGenerator::with_seed(seed(), policy);
            let mut value = serde_json::to_value(&generator).unwrap();
            value["queue"] = serde_json::json!([]);

            let mut restored: PieceGenerator = serde_json::from_value(value).unwrap();
            for _ in 0..30 {
                let preview = restored.peek_next();
                assert_eq!(restored.pop_next(), preview, "{policy:?}");
            }
        }
    }
}
