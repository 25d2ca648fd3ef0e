//! Character pools for the random (scramble) text animation

use rand::Rng;

const ALPHABETIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const NUMERIC: &[u8] = b"0123456789";
const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Set of characters substitutes are drawn from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CharPool {
    #[default]
    Alphanumeric,
    Alphabetic,
    Numeric,
}

impl CharPool {
    /// Pool selected by the random-mode flags
    ///
    /// `number_only` is applied last, so it wins when both flags are set.
    pub fn from_flags(alphabet_only: bool, number_only: bool) -> Self {
        let mut pool = CharPool::Alphanumeric;
        if alphabet_only {
            pool = CharPool::Alphabetic;
        }
        if number_only {
            pool = CharPool::Numeric;
        }
        pool
    }

    fn bytes(&self) -> &'static [u8] {
        match self {
            CharPool::Alphanumeric => ALPHANUMERIC,
            CharPool::Alphabetic => ALPHABETIC,
            CharPool::Numeric => NUMERIC,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }

    pub fn contains(&self, c: char) -> bool {
        c.is_ascii() && self.bytes().contains(&(c as u8))
    }

    /// Draw one character uniformly from the pool
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        let bytes = self.bytes();
        bytes[rng.gen_range(0..bytes.len())] as char
    }
}
