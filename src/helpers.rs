pub trait MaskName {
    /// Keeps the first character and stars out the rest, for public leaderboards.
    fn masked(&self) -> String;
}

impl MaskName for str {
    fn masked(&self) -> String {
        let mut chars = self.chars();
        match chars.next() {
            Some(first) => {
                let hidden = chars.count();
                let mut masked = String::with_capacity(first.len_utf8() + hidden);
                masked.push(first);
                masked.push_str(&"*".repeat(hidden));
                masked
            }
            None => String::new(),
        }
    }
}

impl MaskName for String {
    fn masked(&self) -> String {
        self.as_str().masked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked() {
        assert_eq!("alice".masked(), "a****");
        assert_eq!("b".masked(), "b");
        assert_eq!("".masked(), "");
        assert_eq!("김철수".to_string().masked(), "김**");
    }
}
