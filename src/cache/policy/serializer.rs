use std::io;

use crate::cache::errors::CacheError;
use crate::cache::policy::cache_policy::CachePolicy;

/// PolicySerializer converts a [`CachePolicy`] to and from the text stored in the policy file.
///
/// The only contract is the round trip: `deserialize(serialize(policy)) == Some(policy)`.
/// `deserialize` returns `None` for text it does not understand, which surfaces as [`CachePolicy::Invalid`].
pub trait PolicySerializer: Send + Sync {
    fn serialize(&self, policy: &CachePolicy) -> Result<String, CacheError>;

    fn deserialize(&self, text: &str) -> Option<CachePolicy>;
}

/// JsonPolicySerializer is the default [`PolicySerializer`], it stores the policy as JSON.
#[derive(Clone, Default)]
pub struct JsonPolicySerializer {}

impl JsonPolicySerializer {
    pub fn boxed() -> Box<dyn PolicySerializer> {
        Box::new(JsonPolicySerializer {})
    }
}

impl PolicySerializer for JsonPolicySerializer {
    fn serialize(&self, policy: &CachePolicy) -> Result<String, CacheError> {
        serde_json::to_string(policy)
            .map_err(|error| CacheError::io("set_cache_policy", &io::Error::from(error)))
    }

    fn deserialize(&self, text: &str) -> Option<CachePolicy> {
        serde_json::from_str(text).ok()
    }
}
