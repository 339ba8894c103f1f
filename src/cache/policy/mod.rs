pub mod cache_policy;
pub mod serializer;
pub(crate) mod policy_store;
