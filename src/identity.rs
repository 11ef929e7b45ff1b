use std::collections::HashSet;
use std::hash::BuildHasherDefault;

use rand::Rng;
use seahash::SeaHasher;

/// The character that marks a token as an identifier rather than a plain value.
pub const ID_INDICATOR: char = '#';

pub type IdHasher = BuildHasherDefault<SeaHasher>;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn base36(mut magnitude: u64) -> String {
    if magnitude == 0 {
        return String::from("0");
    }
    let mut digits = Vec::new();
    while magnitude > 0 {
        digits.push(BASE36[(magnitude % 36) as usize]);
        magnitude /= 36;
    }
    digits.reverse();
    // only base36 digits go in, so this cannot fail
    String::from_utf8(digits).unwrap_or_default()
}

/// Produces process-locally-unique string identifiers.
///
/// Identifiers are the [`ID_INDICATOR`] followed by a base-36 encoding of a
/// 63-bit random magnitude. Externally chosen identifiers may be reserved so
/// that `generate` never collides with them. All state is in memory and lives
/// as long as the generator instance.
#[derive(Debug, Default)]
pub struct IdGenerator {
    issued: HashSet<String, IdHasher>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            issued: HashSet::default(),
        }
    }
    /// Registers an externally supplied identifier so it will never be generated.
    pub fn reserve(&mut self, id: &str) {
        self.issued.insert(id.to_owned());
    }
    /// True if the identifier has been generated or reserved by this instance.
    pub fn is_issued(&self, id: &str) -> bool {
        self.issued.contains(id)
    }
    /// Returns an identifier never before returned or reserved here.
    /// Collisions between 63-bit magnitudes are astronomically unlikely,
    /// so the retry loop is effectively a single pass.
    pub fn generate(&mut self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let magnitude: u64 = rng.r#gen::<u64>() >> 1;
            let id = format!("{}{}", ID_INDICATOR, base36(magnitude));
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }
}
