use crate::cache::errors::Errors;

/// Characters that can not appear in a file name on at least one of the supported filesystems.
const RESERVED_CHARACTERS: [char; 9] = ['/', '\\', '<', '>', ':', '"', '|', '?', '*'];

/// Separates a cache key from the suffix of its policy file, hence it is not allowed inside a key.
pub(crate) const POLICY_SUFFIX_SEPARATOR: char = '.';

/// Validates that the key can be used as a file name inside the working directory.
///
/// A valid key is non-empty, contains no [`POLICY_SUFFIX_SEPARATOR`], no filesystem reserved character
/// and no ASCII control character.
pub fn validate_cache_key(key: &str) -> Result<(), Errors> {
    if key.is_empty() {
        return Err(Errors::EmptyCacheKey);
    }
    for character in key.chars() {
        if character == POLICY_SUFFIX_SEPARATOR {
            return Err(Errors::CacheKeyContainsDot(key.to_string()));
        }
        if RESERVED_CHARACTERS.contains(&character) || character.is_ascii_control() {
            return Err(Errors::CacheKeyContainsReservedCharacter(key.to_string(), character));
        }
    }
    Ok(())
}
