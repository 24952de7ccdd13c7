use std::collections::HashMap;

/// First-seen row for each trimmed (name, brand) key.
///
/// Entries are never overwritten, so a lookup always yields the earliest
/// earlier occurrence, same as a pairwise scan from the top.
#[derive(Debug, Default)]
pub struct DuplicateIndex<'a> {
    first_seen: HashMap<(&'a str, &'a str), usize>,
}

impl<'a> DuplicateIndex<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `row` under the key and return the earlier row holding it, if any.
    pub fn check(&mut self, row: usize, name: &'a str, brand: &'a str) -> Option<usize> {
        match self.first_seen.get(&(name, brand)) {
            Some(&first) => Some(first),
            None => {
                self.first_seen.insert((name, brand), row);
                None
            }
        }
    }
}
