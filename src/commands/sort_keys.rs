use crate::match_key::{parse_match_key, sort_match_keys};

/// `<key>\t<label>` lines in schedule order.
pub fn sorted_key_lines(keys: &[String]) -> Vec<String> {
    let mut keys = keys.to_vec();
    sort_match_keys(&mut keys);
    keys.iter()
        .map(|key| {
            let parsed = parse_match_key(key);
            if !parsed.recognized {
                log::warn!("Unrecognized match key {}; using best-effort parse", key);
            }
            format!("{}\t{}", key, parsed.label())
        })
        .collect()
}

pub fn print_sorted_keys(keys: &[String]) {
    for line in sorted_key_lines(keys) {
        println!("{}", line);
    }
}
