#[macro_export]
macro_rules! payloads {
    ($($key:expr => $payload:expr),+) => {{
        use std::collections::HashMap;
        let mut key_payload_pairs: HashMap<&str, Vec<u8>> = HashMap::new();
        $(key_payload_pairs.insert($key, $payload.to_vec());)+
        key_payload_pairs
    }};
}
