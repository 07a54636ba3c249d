use rand::Rng;

/// Length of the tracking code embedded in `/api/v1/r/{code}` links.
pub const SHORT_CODE_LEN: usize = 7;

const SHORT_CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Random lowercase-alphanumeric code of `len` characters.
///
/// Drawn from the thread-local CSPRNG so codes cannot be guessed from
/// earlier ones. Uniqueness is enforced by the store, not here.
#[must_use]
pub fn generate_short_code(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| char::from(SHORT_CODE_ALPHABET[rng.random_range(0..SHORT_CODE_ALPHABET.len())]))
        .collect()
}
